//! Runtime state of the template editor.
//!
//! Holds the working copy of the template, the caret-aware text buffer, the
//! session deciding schema lookups and extractions, and the save flow.

use common::editor::{EditorBuffer, EditorSession};
use common::model::template::{DraftIssue, TemplateDraft, TemplateType};
use common::model::validation::ValidationReport;
use yew::NodeRef;

use crate::config::EXTRACTION_DEBOUNCE_MS;
use crate::services::api::TemplateApi;
use crate::services::debounce::Debouncer;
use crate::services::store::SignalBus;

use super::helpers::compute_md5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorTab {
    Editor,
    Preview,
}

/// Where the save flow currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStage {
    Idle,
    /// Extraction and validation in flight.
    Checking,
    /// Waiting for the author to proceed or go back.
    Confirming(ValidationOutcome),
    /// Create/update in flight.
    Persisting,
}

/// Why the author is asked before saving.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Invalid(ValidationReport),
    Unavailable(String),
}

pub struct TemplateEditorComponent {
    pub api: TemplateApi,
    pub bus: Option<SignalBus>,

    /// Working copy; `html_content` mirrors `buffer`.
    pub draft: TemplateDraft,
    pub buffer: EditorBuffer,
    pub issues: Vec<DraftIssue>,

    /// Schema of the selected type and the detected placeholder list.
    pub session: EditorSession,
    pub extraction: Debouncer,

    pub active_tab: EditorTab,
    pub textarea_ref: NodeRef,

    pub loading: bool,
    pub save_stage: SaveStage,

    /// MD5 of the text as loaded or last saved, for the unsaved-changes dot.
    pub original_md5: Option<String>,
}

impl TemplateEditorComponent {
    pub fn new(template_type: TemplateType, bus: Option<SignalBus>) -> Self {
        Self {
            api: TemplateApi::default(),
            bus,
            draft: TemplateDraft::new(template_type),
            buffer: EditorBuffer::default(),
            issues: Vec::new(),
            session: EditorSession::new(template_type),
            extraction: Debouncer::new(EXTRACTION_DEBOUNCE_MS),
            active_tab: EditorTab::Editor,
            textarea_ref: NodeRef::default(),
            loading: false,
            save_stage: SaveStage::Idle,
            original_md5: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.original_md5.as_ref().map_or(!self.buffer.text().is_empty(), |orig| {
            orig != &compute_md5(self.buffer.text())
        })
    }

    pub fn is_busy(&self) -> bool {
        self.loading || !matches!(self.save_stage, SaveStage::Idle)
    }

    /// Keeps the draft body in step with the buffer after an edit.
    pub fn sync_draft_text(&mut self) {
        self.draft.html_content = self.buffer.text().to_string();
    }
}
