//! REST endpoints of the template service, relative to a configurable base.
//!
//! | Method | Path                                     | Payload                         |
//! |--------|------------------------------------------|---------------------------------|
//! | GET    | `templates/placeholders/{type}`          | -> `EntityPlaceholders`         |
//! | POST   | `templates/extract-placeholders`         | `ExtractPlaceholdersRequest`    |
//! | POST   | `templates/validate-placeholders`        | `ValidatePlaceholdersRequest`   |
//! | GET    | `templates[?templateType=]`              | -> `Vec<Template>`              |
//! | POST   | `templates`                              | `UpsertTemplateRequest`         |
//! | GET    | `templates/{id}`                         | -> `Template`                   |
//! | PUT    | `templates/{id}`                         | `UpsertTemplateRequest`         |
//! | DELETE | `templates/{id}`                         |                                 |
//! | POST   | `templates/{id}/set-default`             |                                 |
//!
//! Every response is wrapped in `ApiResponse`.

use crate::model::template::TemplateType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    base: String,
}

impl ApiRoutes {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn schema_placeholders(&self, template_type: TemplateType) -> String {
        format!("{}/templates/placeholders/{}", self.base, template_type)
    }

    pub fn extract_placeholders(&self) -> String {
        format!("{}/templates/extract-placeholders", self.base)
    }

    pub fn validate_placeholders(&self) -> String {
        format!("{}/templates/validate-placeholders", self.base)
    }

    pub fn templates(&self, filter: Option<TemplateType>) -> String {
        match filter {
            Some(t) => format!("{}/templates?templateType={}", self.base, t),
            None => format!("{}/templates", self.base),
        }
    }

    pub fn template(&self, id: i64) -> String {
        format!("{}/templates/{}", self.base, id)
    }

    pub fn set_default(&self, id: i64) -> String {
        format!("{}/templates/{}/set-default", self.base, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_join_base_without_double_slash() {
        let routes = ApiRoutes::new("https://erp.example.com/api/");
        assert_eq!(
            routes.schema_placeholders(TemplateType::SalaryReport),
            "https://erp.example.com/api/templates/placeholders/salary_report"
        );
        assert_eq!(
            routes.set_default(9),
            "https://erp.example.com/api/templates/9/set-default"
        );
    }

    #[test]
    fn list_filter_is_a_query_parameter() {
        let routes = ApiRoutes::new("/api");
        assert_eq!(routes.templates(None), "/api/templates");
        assert_eq!(
            routes.templates(Some(TemplateType::Email)),
            "/api/templates?templateType=email"
        );
        assert_eq!(routes.template(3), "/api/templates/3");
    }
}
