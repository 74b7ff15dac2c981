use serde::{Deserialize, Serialize};

/// Result of checking a list of `{{token}}` strings against a template type.
///
/// The report is advisory: an invalid result is shown to the author, who may
/// still save the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_placeholders: Option<Vec<String>>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            invalid_placeholders: None,
        }
    }

    /// Builds a report from the unknown tokens; an empty list is valid.
    pub fn from_invalid(invalid: Vec<String>) -> Self {
        if invalid.is_empty() {
            Self::valid()
        } else {
            Self {
                is_valid: false,
                invalid_placeholders: Some(invalid),
            }
        }
    }

    pub fn invalid(&self) -> &[String] {
        self.invalid_placeholders.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_may_omit_invalid_list() {
        let report: ValidationReport = serde_json::from_str(r#"{"isValid":true}"#).unwrap();
        assert_eq!(report, ValidationReport::valid());
        assert!(report.invalid().is_empty());
    }

    #[test]
    fn invalid_report_lists_tokens() {
        let report = ValidationReport::from_invalid(vec!["{{Foo.Bar}}".into()]);
        assert!(!report.is_valid);
        assert_eq!(report.invalid(), ["{{Foo.Bar}}".to_string()]);
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"isValid":false,"invalidPlaceholders":["{{Foo.Bar}}"]}"#);
    }
}
