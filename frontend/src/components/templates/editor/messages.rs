use common::editor::DebounceTicket;
use common::model::place_holder::EntityPlaceholders;
use common::model::template::{Template, TemplateType};
use common::model::validation::ValidationReport;

use super::state::EditorTab;

pub enum Msg {
    TemplateLoaded(Template),
    TemplateLoadFailed(String),
    SchemaLoaded {
        ticket: DebounceTicket,
        template_type: TemplateType,
        entities: EntityPlaceholders,
    },
    SchemaFailed {
        ticket: DebounceTicket,
        template_type: TemplateType,
        error: String,
    },

    SetName(String),
    SetCode(String),
    SetDescription(String),
    SetActive(bool),
    SetTemplateType(TemplateType),

    SetTab(EditorTab),
    UpdateText(String),
    CaretMoved { start: u32, end: u32 },
    SelectEntity(String),
    InsertPlaceholder(String),

    RunExtraction(DebounceTicket),
    PlaceholdersExtracted {
        ticket: DebounceTicket,
        names: Vec<String>,
    },
    ExtractionFailed {
        ticket: DebounceTicket,
        error: String,
    },

    Save,
    Validated(ValidationReport),
    ValidationUnavailable(String),
    ConfirmSave,
    DismissValidation,
    Saved(Template),
    SaveFailed(String),
    Close,
}
