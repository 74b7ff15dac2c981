use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One insertable variable offered by the schema provider.
///
/// `placeholder` is the literal token written into the template body, for
/// instance `{{Contract.Number}}`. It is unique across all entities of a
/// template type, which is what lets validation key on exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderField {
    pub name: String,
    pub placeholder: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub placeholder_type: PlaceholderType,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub is_required: bool,
}

/// Display/formatting hint for a placeholder value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderType {
    #[default]
    String,
    Number,
    Date,
    Boolean,
}

impl PlaceholderType {
    pub fn label(self) -> &'static str {
        match self {
            PlaceholderType::String => "Texto",
            PlaceholderType::Number => "Número",
            PlaceholderType::Date => "Fecha",
            PlaceholderType::Boolean => "Sí/No",
        }
    }
}

/// Entity name (`"Contract"`, `"Customer"`, ...) to its fields.
///
/// Key order is the order sent by the schema provider; the first key is the
/// tab selected by default.
pub type EntityPlaceholders = IndexMap<String, Vec<PlaceholderField>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_order_follows_the_payload() {
        let json = r#"{
            "Customer": [{"name":"Name","placeholder":"{{Customer.Name}}","type":"string"}],
            "Contract": [{"name":"Number","placeholder":"{{Contract.Number}}","type":"number","isRequired":true}]
        }"#;
        let entities: EntityPlaceholders = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = entities.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Customer", "Contract"]);

        let number = &entities["Contract"][0];
        assert_eq!(number.placeholder_type, PlaceholderType::Number);
        assert!(number.is_required);
        assert_eq!(number.description, "");
    }

    #[test]
    fn field_serializes_type_under_type_key() {
        let field = PlaceholderField {
            name: "SignedAt".into(),
            placeholder: "{{Contract.SignedAt}}".into(),
            description: "Fecha de firma".into(),
            placeholder_type: PlaceholderType::Date,
            example: "2024-01-31".into(),
            is_required: false,
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "date");
        assert_eq!(value["isRequired"], false);
    }
}
