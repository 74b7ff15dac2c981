//! Client-side cache of the placeholder schema for one template type.
//!
//! The registry is filled from the schema provider whenever the template type
//! changes and lives only as long as the editing session. Besides holding the
//! entity tab the user is browsing, it answers the same questions the server
//! validator does, with the same rule: exact string match on the full
//! `{{...}}` token, no case or whitespace normalization.

use std::collections::HashSet;

use log::debug;

use crate::model::place_holder::{EntityPlaceholders, PlaceholderField};
use crate::model::template::TemplateType;
use crate::model::validation::ValidationReport;

use super::extract::TOKEN_PATTERN;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderRegistry {
    template_type: Option<TemplateType>,
    entities: EntityPlaceholders,
    active_entity: Option<String>,
}

impl PlaceholderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the schema and resets the active tab to the first entity.
    pub fn load(&mut self, template_type: TemplateType, entities: EntityPlaceholders) {
        debug!(
            "placeholder schema loaded for {}: {} entities",
            template_type,
            entities.len()
        );
        self.active_entity = entities.keys().next().cloned();
        self.entities = entities;
        self.template_type = Some(template_type);
    }

    /// Empty state after a failed lookup: nothing to insert, nothing known.
    pub fn clear(&mut self, template_type: TemplateType) {
        self.entities.clear();
        self.active_entity = None;
        self.template_type = Some(template_type);
    }

    pub fn template_type(&self) -> Option<TemplateType> {
        self.template_type
    }

    pub fn is_empty(&self) -> bool {
        self.entities.values().all(Vec::is_empty)
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn active_entity(&self) -> Option<&str> {
        self.active_entity.as_deref()
    }

    /// Switches tab. Unknown names are ignored; returns whether it changed.
    pub fn select_entity(&mut self, name: &str) -> bool {
        if self.active_entity.as_deref() == Some(name) || !self.entities.contains_key(name) {
            return false;
        }
        self.active_entity = Some(name.to_string());
        true
    }

    pub fn active_fields(&self) -> &[PlaceholderField] {
        self.active_entity
            .as_ref()
            .and_then(|name| self.entities.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn fields(&self) -> impl Iterator<Item = &PlaceholderField> {
        self.entities.values().flatten()
    }

    pub fn field(&self, token: &str) -> Option<&PlaceholderField> {
        self.fields().find(|f| f.placeholder == token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.field(token).is_some()
    }

    /// Reports the tokens that are not part of the schema, once each, in
    /// input order.
    pub fn validate<S: AsRef<str>>(&self, tokens: &[S]) -> ValidationReport {
        let known: HashSet<&str> = self.fields().map(|f| f.placeholder.as_str()).collect();
        let mut reported = HashSet::new();
        let invalid = tokens
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| !known.contains(t) && reported.insert(*t))
            .map(str::to_string)
            .collect();
        ValidationReport::from_invalid(invalid)
    }

    /// Required fields whose token does not appear in `tokens`.
    pub fn missing_required<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<&PlaceholderField> {
        let present: HashSet<&str> = tokens.iter().map(AsRef::as_ref).collect();
        self.fields()
            .filter(|f| f.is_required && !present.contains(f.placeholder.as_str()))
            .collect()
    }

    /// Substitutes every known token with its escaped example value. Tokens
    /// outside the schema are left as written so they stand out.
    pub fn render_preview(&self, text: &str) -> String {
        TOKEN_PATTERN
            .replace_all(text, |caps: &regex::Captures| {
                let token = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                match self.field(token) {
                    Some(field) if !field.example.is_empty() => escape_html(&field.example),
                    _ => token.to_string(),
                }
            })
            .into_owned()
    }
}

/// Escapes the characters that would otherwise be read as markup.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::place_holder::PlaceholderType;

    fn field(name: &str, token: &str, required: bool, example: &str) -> PlaceholderField {
        PlaceholderField {
            name: name.into(),
            placeholder: token.into(),
            description: String::new(),
            placeholder_type: PlaceholderType::String,
            example: example.into(),
            is_required: required,
        }
    }

    fn contract_schema() -> EntityPlaceholders {
        let mut entities = EntityPlaceholders::new();
        entities.insert(
            "Contract".into(),
            vec![
                field("Number", "{{Contract.Number}}", true, "HD-2024-001"),
                field("SignedAt", "{{Contract.SignedAt}}", false, "31/01/2024"),
            ],
        );
        entities.insert(
            "Customer".into(),
            vec![field("Name", "{{Customer.Name}}", true, "Nguyễn & Co")],
        );
        entities
    }

    fn loaded() -> PlaceholderRegistry {
        let mut registry = PlaceholderRegistry::new();
        registry.load(TemplateType::Contract, contract_schema());
        registry
    }

    #[test]
    fn load_selects_first_entity() {
        let registry = loaded();
        assert_eq!(registry.active_entity(), Some("Contract"));
        assert_eq!(registry.active_fields().len(), 2);
        assert_eq!(registry.template_type(), Some(TemplateType::Contract));
    }

    #[test]
    fn reload_resets_tab_to_new_first_key() {
        let mut registry = loaded();
        assert!(registry.select_entity("Customer"));

        let mut quote = EntityPlaceholders::new();
        quote.insert("Quote".into(), vec![field("Total", "{{Quote.Total}}", false, "")]);
        quote.insert("Customer".into(), vec![]);
        registry.load(TemplateType::Quote, quote);

        assert_eq!(registry.active_entity(), Some("Quote"));
    }

    #[test]
    fn unknown_entity_is_not_selected() {
        let mut registry = loaded();
        assert!(!registry.select_entity("Employee"));
        assert!(!registry.select_entity("Contract"));
        assert_eq!(registry.active_entity(), Some("Contract"));
    }

    #[test]
    fn cleared_registry_is_empty() {
        let mut registry = loaded();
        registry.clear(TemplateType::Email);
        assert!(registry.is_empty());
        assert_eq!(registry.active_entity(), None);
        assert!(registry.active_fields().is_empty());
    }

    #[test]
    fn validation_reports_unknown_tokens() {
        let registry = loaded();
        let report = registry.validate(&["{{Contract.Number}}", "{{Foo.Bar}}"]);
        assert!(!report.is_valid);
        assert_eq!(report.invalid_placeholders, Some(vec!["{{Foo.Bar}}".to_string()]));
    }

    #[test]
    fn validation_is_exact_match() {
        let registry = loaded();
        let report = registry.validate(&[
            "{{contract.number}}",
            "{{ Contract.Number }}",
            "{{contract.number}}",
        ]);
        assert_eq!(
            report.invalid(),
            ["{{contract.number}}".to_string(), "{{ Contract.Number }}".to_string()]
        );
    }

    #[test]
    fn all_known_tokens_are_valid() {
        let registry = loaded();
        let report = registry.validate(&["{{Customer.Name}}", "{{Contract.SignedAt}}"]);
        assert_eq!(report, ValidationReport::valid());
    }

    #[test]
    fn missing_required_lists_absent_fields() {
        let registry = loaded();
        let missing: Vec<&str> = registry
            .missing_required(&["{{Contract.Number}}"])
            .into_iter()
            .map(|f| f.placeholder.as_str())
            .collect();
        assert_eq!(missing, vec!["{{Customer.Name}}"]);
    }

    #[test]
    fn preview_substitutes_examples_and_keeps_unknown() {
        let registry = loaded();
        let html = registry.render_preview("<b>{{Customer.Name}}</b> {{Foo.Bar}}");
        assert_eq!(html, "<b>Nguyễn &amp; Co</b> {{Foo.Bar}}");
    }
}
