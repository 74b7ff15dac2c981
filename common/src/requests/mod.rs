use serde::{Deserialize, Serialize};

use crate::model::template::{TemplateDraft, TemplateType};

/// Request payload for the placeholder extraction endpoint.
/// Carries the raw template body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPlaceholdersRequest {
    pub content: String,
}

/// Request payload for the placeholder validation endpoint.
/// `placeholders` are full tokens, delimiters included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePlaceholdersRequest {
    pub placeholders: Vec<String>,
    pub template_type: TemplateType,
}

/// Body of the create and update template calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTemplateRequest {
    pub name: String,
    pub code: String,
    pub template_type: TemplateType,
    pub html_content: String,
    pub description: Option<String>,
    pub version: i32,
    pub is_active: bool,
}

impl From<&TemplateDraft> for UpsertTemplateRequest {
    fn from(draft: &TemplateDraft) -> Self {
        let description = draft.description.trim();
        Self {
            name: draft.name.trim().to_string(),
            code: draft.code.trim().to_string(),
            template_type: draft.template_type,
            html_content: draft.html_content.clone(),
            description: (!description.is_empty()).then(|| description.to_string()),
            version: draft.version,
            is_active: draft.is_active,
        }
    }
}
