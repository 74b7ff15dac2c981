use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of document; decides which entities and placeholders apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    #[default]
    Contract,
    Quote,
    Email,
    SalaryReport,
    Invoice,
    SalaryNotification,
}

impl TemplateType {
    pub const ALL: [TemplateType; 6] = [
        TemplateType::Contract,
        TemplateType::Quote,
        TemplateType::Email,
        TemplateType::SalaryReport,
        TemplateType::Invoice,
        TemplateType::SalaryNotification,
    ];

    /// Wire name, also used in URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateType::Contract => "contract",
            TemplateType::Quote => "quote",
            TemplateType::Email => "email",
            TemplateType::SalaryReport => "salary_report",
            TemplateType::Invoice => "invoice",
            TemplateType::SalaryNotification => "salary_notification",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemplateType::Contract => "Contrato",
            TemplateType::Quote => "Cotización",
            TemplateType::Email => "Correo",
            TemplateType::SalaryReport => "Reporte de salario",
            TemplateType::Invoice => "Factura",
            TemplateType::SalaryNotification => "Notificación de salario",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown template type `{0}`")]
pub struct UnknownTemplateType(pub String);

impl FromStr for TemplateType {
    type Err = UnknownTemplateType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTemplateType(s.to_string()))
    }
}

/// A document template as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub template_type: TemplateType,
    #[serde(default)]
    pub html_content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "first_version")]
    pub version: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
}

fn first_version() -> i32 {
    1
}

/// Working copy of a template held while the editor is open.
///
/// `id` is `None` for a template that has never been saved. The draft is
/// dropped with the editor; nothing here is persisted client side.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDraft {
    pub id: Option<i64>,
    pub name: String,
    pub code: String,
    pub template_type: TemplateType,
    pub html_content: String,
    pub description: String,
    pub version: i32,
    pub is_active: bool,
    pub is_default: bool,
}

/// A user input problem found before anything is sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftIssue {
    #[error("El nombre es obligatorio")]
    MissingName,
    #[error("El código es obligatorio")]
    MissingCode,
    #[error("El código no puede contener espacios")]
    CodeHasWhitespace,
    #[error("El contenido de la plantilla es obligatorio")]
    MissingContent,
}

impl DraftIssue {
    /// Form field the issue belongs to.
    pub fn field(self) -> &'static str {
        match self {
            DraftIssue::MissingName => "name",
            DraftIssue::MissingCode | DraftIssue::CodeHasWhitespace => "code",
            DraftIssue::MissingContent => "html_content",
        }
    }
}

impl TemplateDraft {
    pub fn new(template_type: TemplateType) -> Self {
        Self {
            id: None,
            name: String::new(),
            code: String::new(),
            template_type,
            html_content: String::new(),
            description: String::new(),
            version: first_version(),
            is_active: true,
            is_default: false,
        }
    }

    /// Checks required fields. An empty result means the draft may be sent.
    pub fn check(&self) -> Vec<DraftIssue> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(DraftIssue::MissingName);
        }
        if self.code.trim().is_empty() {
            issues.push(DraftIssue::MissingCode);
        } else if self.code.chars().any(char::is_whitespace) {
            issues.push(DraftIssue::CodeHasWhitespace);
        }
        if self.html_content.trim().is_empty() {
            issues.push(DraftIssue::MissingContent);
        }
        issues
    }
}

impl From<Template> for TemplateDraft {
    fn from(template: Template) -> Self {
        Self {
            id: Some(template.id),
            name: template.name,
            code: template.code,
            template_type: template.template_type,
            html_content: template.html_content,
            description: template.description.unwrap_or_default(),
            version: template.version,
            is_active: template.is_active,
            is_default: template.is_default,
        }
    }
}
