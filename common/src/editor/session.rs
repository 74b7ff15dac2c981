//! Decisions of one editing session, kept apart from the view.
//!
//! The session knows which template type's schema is wanted, which schema
//! lookup and which extraction are still current, and what the detected
//! placeholder list holds. Every input returns the [`Effect`]s the host has
//! to carry out (network calls, timers); late results come back with their
//! ticket and are dropped when a newer request superseded them.

use log::debug;

use crate::model::place_holder::EntityPlaceholders;
use crate::model::template::TemplateType;
use crate::placeholder::{should_extract, PlaceholderRegistry};

use super::debounce::{DebounceGate, DebounceTicket};

/// Work the host must start on behalf of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FetchSchema {
        ticket: DebounceTicket,
        template_type: TemplateType,
    },
    /// Extract once the input has been quiet for the debounce period.
    ExtractAfterQuiet(DebounceTicket),
    /// Extract right away (freshly loaded text).
    ExtractNow(DebounceTicket),
    /// Drop any pending extraction timer.
    CancelExtraction,
}

#[derive(Debug)]
pub struct EditorSession {
    template_type: TemplateType,
    registry: PlaceholderRegistry,
    schema_gate: DebounceGate,
    schema_loading: bool,
    schema_error: Option<String>,
    extraction_gate: DebounceGate,
    detected: Vec<String>,
}

impl EditorSession {
    pub fn new(template_type: TemplateType) -> Self {
        Self {
            template_type,
            registry: PlaceholderRegistry::new(),
            schema_gate: DebounceGate::new(),
            schema_loading: false,
            schema_error: None,
            extraction_gate: DebounceGate::new(),
            detected: Vec::new(),
        }
    }

    pub fn template_type(&self) -> TemplateType {
        self.template_type
    }

    pub fn registry(&self) -> &PlaceholderRegistry {
        &self.registry
    }

    pub fn select_entity(&mut self, name: &str) -> bool {
        self.registry.select_entity(name)
    }

    pub fn schema_loading(&self) -> bool {
        self.schema_loading
    }

    pub fn schema_error(&self) -> Option<&str> {
        self.schema_error.as_deref()
    }

    /// Names found in the body, without delimiters.
    pub fn detected(&self) -> &[String] {
        &self.detected
    }

    /// A new, empty template: only the schema is needed.
    pub fn start(&mut self) -> Effect {
        self.fetch_schema()
    }

    /// A stored template arrived: fetch its schema and extract from its body
    /// without waiting, unless the body is too short to hold a token.
    pub fn loaded(&mut self, template_type: TemplateType, text: &str) -> Vec<Effect> {
        self.template_type = template_type;
        let schema = self.fetch_schema();
        let extraction = if should_extract(text) {
            Effect::ExtractNow(self.extraction_gate.schedule())
        } else {
            self.clear_detected()
        };
        vec![schema, extraction]
    }

    /// Fetches the schema only when the type really changes.
    pub fn set_template_type(&mut self, template_type: TemplateType) -> Option<Effect> {
        if self.template_type == template_type {
            return None;
        }
        self.template_type = template_type;
        Some(self.fetch_schema())
    }

    pub fn schema_loaded(
        &mut self,
        ticket: DebounceTicket,
        template_type: TemplateType,
        entities: EntityPlaceholders,
    ) -> bool {
        if !self.schema_gate.is_current(ticket) {
            debug!("discarding stale placeholder schema for {template_type}");
            return false;
        }
        self.schema_loading = false;
        self.schema_error = None;
        self.registry.load(template_type, entities);
        true
    }

    pub fn schema_failed(
        &mut self,
        ticket: DebounceTicket,
        template_type: TemplateType,
        error: String,
    ) -> bool {
        if !self.schema_gate.is_current(ticket) {
            return false;
        }
        self.schema_loading = false;
        self.registry.clear(template_type);
        self.schema_error = Some(error);
        true
    }

    /// The body changed. Text too short to hold a token clears the detected
    /// list and cancels pending work instead of asking the server.
    pub fn text_changed(&mut self, text: &str) -> Effect {
        if should_extract(text) {
            Effect::ExtractAfterQuiet(self.extraction_gate.schedule())
        } else {
            self.clear_detected()
        }
    }

    /// Whether a timer or a response for `ticket` may still act.
    pub fn extraction_is_current(&self, ticket: DebounceTicket) -> bool {
        self.extraction_gate.is_current(ticket)
    }

    pub fn extracted(&mut self, ticket: DebounceTicket, names: Vec<String>) -> bool {
        if !self.extraction_gate.is_current(ticket) {
            return false;
        }
        self.detected = names;
        true
    }

    /// Teardown: nothing still in flight may land afterwards.
    pub fn close(&mut self) -> Effect {
        self.schema_gate.cancel();
        self.extraction_gate.cancel();
        Effect::CancelExtraction
    }

    fn fetch_schema(&mut self) -> Effect {
        self.schema_loading = true;
        Effect::FetchSchema {
            ticket: self.schema_gate.schedule(),
            template_type: self.template_type,
        }
    }

    fn clear_detected(&mut self) -> Effect {
        self.extraction_gate.cancel();
        self.detected.clear();
        Effect::CancelExtraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::place_holder::PlaceholderField;
    use rstest::rstest;

    fn schema(entities: &[&str]) -> EntityPlaceholders {
        entities
            .iter()
            .map(|entity| {
                let field = PlaceholderField {
                    name: "Id".into(),
                    placeholder: format!("{{{{{entity}.Id}}}}"),
                    description: String::new(),
                    placeholder_type: Default::default(),
                    example: String::new(),
                    is_required: false,
                };
                (entity.to_string(), vec![field])
            })
            .collect()
    }

    fn extract_ticket(effect: Effect) -> DebounceTicket {
        match effect {
            Effect::ExtractAfterQuiet(ticket) | Effect::ExtractNow(ticket) => ticket,
            other => panic!("expected an extraction, got {other:?}"),
        }
    }

    fn schema_ticket(effect: Effect) -> DebounceTicket {
        match effect {
            Effect::FetchSchema { ticket, .. } => ticket,
            other => panic!("expected a schema fetch, got {other:?}"),
        }
    }

    #[rstest]
    #[case("")]
    #[case("{{")]
    #[case("{{X}")]
    #[case("   {{ ")]
    fn short_text_clears_list_without_extracting(#[case] text: &str) {
        let mut session = EditorSession::new(TemplateType::Contract);
        let ticket = extract_ticket(session.text_changed("Hola {{Customer.Name}}"));
        assert!(session.extracted(ticket, vec!["Customer.Name".into()]));

        assert_eq!(session.text_changed(text), Effect::CancelExtraction);
        assert!(session.detected().is_empty());
        assert!(!session.extraction_is_current(ticket));
    }

    #[rstest]
    #[case("{{")]
    #[case("abc")]
    fn loading_short_body_does_not_extract(#[case] body: &str) {
        let mut session = EditorSession::new(TemplateType::Contract);
        let effects = session.loaded(TemplateType::Invoice, body);

        assert_eq!(effects.len(), 2);
        assert!(matches!(
            effects[0],
            Effect::FetchSchema {
                template_type: TemplateType::Invoice,
                ..
            }
        ));
        assert_eq!(effects[1], Effect::CancelExtraction);
        assert!(session.detected().is_empty());
    }

    #[test]
    fn loading_a_real_body_extracts_immediately() {
        let mut session = EditorSession::new(TemplateType::Contract);
        let effects = session.loaded(TemplateType::Contract, "<p>{{Contract.Number}}</p>");
        assert!(matches!(effects[1], Effect::ExtractNow(_)));
        assert!(session.extraction_is_current(extract_ticket(effects[1])));
    }

    #[test]
    fn same_type_does_not_refetch_schema() {
        let mut session = EditorSession::new(TemplateType::Contract);
        assert_eq!(session.set_template_type(TemplateType::Contract), None);
    }

    #[test]
    fn type_change_fetches_once_and_resets_tab() {
        let mut session = EditorSession::new(TemplateType::Contract);
        let first = schema_ticket(session.start());
        let entities = schema(&["Contract", "Customer"]);
        assert!(session.schema_loaded(first, TemplateType::Contract, entities));
        assert!(session.select_entity("Customer"));

        let effect = session.set_template_type(TemplateType::Invoice);
        let Some(Effect::FetchSchema {
            ticket,
            template_type,
        }) = effect
        else {
            panic!("expected one schema fetch, got {effect:?}");
        };
        assert_eq!(template_type, TemplateType::Invoice);
        assert_eq!(session.set_template_type(TemplateType::Invoice), None);
        assert!(session.schema_loading());

        let entities = schema(&["Invoice", "Customer"]);
        assert!(session.schema_loaded(ticket, TemplateType::Invoice, entities));
        assert_eq!(session.registry().active_entity(), Some("Invoice"));
        assert!(!session.schema_loading());
    }

    #[test]
    fn stale_schema_response_is_discarded() {
        let mut session = EditorSession::new(TemplateType::Contract);
        let old = schema_ticket(session.start());
        let new = schema_ticket(session.set_template_type(TemplateType::Quote).unwrap());

        assert!(!session.schema_loaded(old, TemplateType::Contract, schema(&["Contract"])));
        assert!(!session.schema_failed(old, TemplateType::Contract, "timeout".into()));
        assert!(session.registry().is_empty());

        assert!(session.schema_loaded(new, TemplateType::Quote, schema(&["Quote"])));
        assert_eq!(session.registry().active_entity(), Some("Quote"));
    }

    #[test]
    fn failed_schema_shows_empty_state() {
        let mut session = EditorSession::new(TemplateType::Email);
        let ticket = schema_ticket(session.start());
        assert!(session.schema_failed(ticket, TemplateType::Email, "500".into()));
        assert!(session.registry().is_empty());
        assert_eq!(session.schema_error(), Some("500"));
    }

    #[test]
    fn stale_extraction_is_discarded() {
        let mut session = EditorSession::new(TemplateType::Contract);
        let first = extract_ticket(session.text_changed("{{A}} hola"));
        let second = extract_ticket(session.text_changed("{{A}} {{B}} hola"));

        assert!(!session.extracted(first, vec!["A".into()]));
        assert!(session.extracted(second, vec!["A".into(), "B".into()]));
        assert_eq!(session.detected(), ["A", "B"]);
    }

    #[test]
    fn close_invalidates_everything_in_flight() {
        let mut session = EditorSession::new(TemplateType::Contract);
        let lookup = schema_ticket(session.start());
        let extraction = extract_ticket(session.text_changed("{{Contract.Number}}"));

        assert_eq!(session.close(), Effect::CancelExtraction);
        assert!(!session.extraction_is_current(extraction));
        assert!(!session.schema_loaded(lookup, TemplateType::Contract, schema(&["Contract"])));
    }
}
