use std::path::Path;

use serde_json::{json, Value};

use crate::models::form::{FieldDefinition, FieldType, FormDefinition};

/// The registration form used across the endpoint tests: two required
/// scalar fields, a required checkbox with an Other option and an
/// optional radio with an Other option.
pub fn registration_form(form_id: &str) -> FormDefinition {
    FormDefinition {
        id: form_id.to_string(),
        title: "Spring open day".to_string(),
        fields: vec![
            FieldDefinition {
                key: "name".to_string(),
                label: "name-label".to_string(),
                field_type: FieldType::ShortText,
                required: true,
                options: vec![],
            },
            FieldDefinition {
                key: "email".to_string(),
                label: "email-label".to_string(),
                field_type: FieldType::Email,
                required: true,
                options: vec![],
            },
            FieldDefinition {
                key: "interests".to_string(),
                label: "Interests".to_string(),
                field_type: FieldType::Checkbox,
                required: true,
                options: vec!["AI".to_string(), "Data".to_string(), "Other".to_string()],
            },
            FieldDefinition {
                key: "source".to_string(),
                label: "How did you hear about us".to_string(),
                field_type: FieldType::Radio,
                required: false,
                options: vec!["Friend".to_string(), "Other".to_string()],
            },
        ],
        email_field_key: None,
    }
}

/// Write a form definition into the definitions directory the way the
/// admin CRUD layer would.
pub fn write_form(dir: &Path, form: &FormDefinition) {
    let path = dir.join(format!("{}.json", form.id));
    let contents = serde_json::to_string_pretty(form).expect("form serializes");
    std::fs::write(path, contents).expect("form definition is written");
}

/// A submission payload that satisfies every rule of the registration form
pub fn valid_submission() -> Value {
    json!({
        "answers": {
            "name": "A",
            "email": "a@x.com",
            "interests": ["AI", "Data"],
            "interests__other_enabled": false,
            "source": "Friend",
        }
    })
}

/// A submission that satisfies the required checkbox through the Other
/// toggle alone
pub fn other_only_submission() -> Value {
    json!({
        "answers": {
            "name": "A",
            "email": "a@x.com",
            "interests": [],
            "interests__other_enabled": true,
            "interests__other": "Cloud",
        }
    })
}
