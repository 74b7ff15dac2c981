//! Properties of the `TemplateEditorComponent`.
//!
//! The editor is mounted by its parent only while the modal is open. It never
//! reuses state from a previous opening: every mount starts from the server
//! copy (or from an empty draft when creating).

use common::model::template::{Template, TemplateType};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TemplateEditorProps {
    /// Template to edit. `None` creates a new one.
    ///
    /// When set, the template is fetched from the server on mount; if that
    /// fails the editor reports it and asks the parent to close.
    #[prop_or_default]
    pub template_id: Option<i64>,

    /// Type preselected for a new template.
    #[prop_or_default]
    pub default_type: TemplateType,

    /// Emitted when the user closes the editor. Unsaved edits are discarded.
    pub on_close: Callback<()>,

    /// Emitted with the server copy after a successful save.
    pub on_saved: Callback<Template>,
}
