use serde::{Deserialize, Serialize};

/// Reserved option value that licenses a companion free-text answer
/// on radio and checkbox fields.
pub const OTHER_SENTINEL: &str = "Other";

// Wire suffixes used by the form UI for the free-text companion answers.
// They only exist in the flat submission payload; stored answers are
// structured (see models::answer).
pub const OTHER_SUFFIX: &str = "__other";
pub const OTHER_ENABLED_SUFFIX: &str = "__other_enabled";

// The seven supported question types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    ShortText,
    LongText,
    Email,
    Phone,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    /// Choice types carry an options list; scalar types do not.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

// Authored form schema. Field order is load-bearing: it defines both the
// display order and the export column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub email_field_key: Option<String>,
}

impl FormDefinition {
    /// Look up a field by its key.
    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Whether `email_field_key` points at an existing field of an
    /// email-capable type (`email` or `short_text`).
    pub fn email_pointer_is_valid(&self) -> bool {
        match &self.email_field_key {
            None => true,
            Some(key) => self
                .field(key)
                .map(|f| matches!(f.field_type, FieldType::Email | FieldType::ShortText))
                .unwrap_or(false),
        }
    }
}
