use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SchemaViolation;
use crate::models::form::{
    FieldType, FormDefinition, OTHER_ENABLED_SUFFIX, OTHER_SENTINEL, OTHER_SUFFIX,
};

// Submission payload as posted by the form UI: a flat map in which the
// free-text "Other" answers ride along as `{key}__other` and
// `{key}__other_enabled` companion entries.
#[derive(Debug, Deserialize)]
pub struct SubmissionPayload {
    pub answers: Map<String, Value>,
}

/// One stored answer. The shape is fixed by the field type the answer was
/// submitted against; the companion-key convention of the wire format is
/// resolved into explicit structure at decode time and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Radio {
        chosen: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        other_text: Option<String>,
    },
    Checkbox {
        selected: Vec<String>,
        other_enabled: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        other_text: Option<String>,
    },
}

/// One respondent's answers, keyed by field key. A `BTreeMap` keeps the
/// stored JSON stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(pub BTreeMap<String, AnswerValue>);

impl AnswerSet {
    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    /// The answer under `key` as plain text, if it is a scalar answer.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(AnswerValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: AnswerValue) {
        self.0.insert(key.into(), value);
    }

    /// Interpret a raw wire map against the form schema.
    ///
    /// Each field of the form consumes its own entry plus its companion
    /// entries; any shape mismatch is fatal. Leftover plain text entries
    /// are kept (answers not tied to a typed field, e.g. a literal
    /// `email` key), while orphaned companion entries are dropped so the
    /// stored set never carries companions for unknown parents.
    pub fn decode(form: &FormDefinition, raw: &Map<String, Value>) -> Result<Self, SchemaViolation> {
        let mut answers = AnswerSet::default();
        let mut consumed: Vec<String> = Vec::new();

        for field in &form.fields {
            let key = field.key.as_str();
            match field.field_type {
                FieldType::ShortText
                | FieldType::LongText
                | FieldType::Email
                | FieldType::Phone
                | FieldType::Select => {
                    if let Some(text) = decode_scalar(key, raw.get(key))? {
                        answers.insert(key, AnswerValue::Text(text));
                    }
                    consumed.push(key.to_string());
                }
                FieldType::Radio => {
                    let other_key = companion(key, OTHER_SUFFIX);
                    let other_text = decode_scalar(&other_key, raw.get(&other_key))?;
                    match raw.get(key) {
                        None | Some(Value::Null) => {
                            // No option chosen: pre-filled Other text without a
                            // selection does not count as an answer.
                        }
                        Some(Value::String(chosen)) => {
                            answers.insert(
                                key,
                                AnswerValue::Radio {
                                    chosen: chosen.clone(),
                                    other_text,
                                },
                            );
                        }
                        Some(_) => {
                            return Err(SchemaViolation::new(key, "expected a text value"));
                        }
                    }
                    consumed.push(key.to_string());
                    consumed.push(other_key);
                }
                FieldType::Checkbox => {
                    let enabled_key = companion(key, OTHER_ENABLED_SUFFIX);
                    let other_key = companion(key, OTHER_SUFFIX);

                    let selected = decode_selection(key, raw.get(key))?;
                    let other_enabled = match raw.get(&enabled_key) {
                        None | Some(Value::Null) => false,
                        Some(Value::Bool(b)) => *b,
                        Some(_) => {
                            return Err(SchemaViolation::new(
                                &enabled_key,
                                "the Other toggle must be true or false",
                            ));
                        }
                    };
                    let other_text = decode_scalar(&other_key, raw.get(&other_key))?;

                    let answered = raw.contains_key(key)
                        || other_enabled
                        || other_text.is_some();
                    if answered {
                        answers.insert(
                            key,
                            AnswerValue::Checkbox {
                                selected,
                                other_enabled,
                                other_text,
                            },
                        );
                    }
                    consumed.push(key.to_string());
                    consumed.push(enabled_key);
                    consumed.push(other_key);
                }
            }
        }

        // Carry over plain entries the schema does not know about; drop
        // orphaned companion entries and non-text values.
        for (key, value) in raw {
            if consumed.iter().any(|c| c == key) {
                continue;
            }
            if key.ends_with(OTHER_SUFFIX) || key.ends_with(OTHER_ENABLED_SUFFIX) {
                debug!("Dropping companion entry `{}` with no matching field", key);
                continue;
            }
            match value {
                Value::String(s) => answers.insert(key.clone(), AnswerValue::Text(s.clone())),
                Value::Null => {}
                other => {
                    debug!(
                        "Dropping untyped entry `{}` with non-text value: {}",
                        key, other
                    );
                }
            }
        }

        Ok(answers)
    }
}

fn companion(key: &str, suffix: &str) -> String {
    format!("{}{}", key, suffix)
}

fn decode_scalar(key: &str, value: Option<&Value>) -> Result<Option<String>, SchemaViolation> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaViolation::new(key, "expected a text value")),
    }
}

fn decode_selection(key: &str, value: Option<&Value>) -> Result<Vec<String>, SchemaViolation> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => {
            let mut selected = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => {
                        // The toggle is the single source of the "Other"
                        // state; the sentinel never lands in the selection.
                        if s != OTHER_SENTINEL {
                            selected.push(s.clone());
                        }
                    }
                    _ => {
                        return Err(SchemaViolation::new(
                            key,
                            "selected options must be text values",
                        ));
                    }
                }
            }
            Ok(selected)
        }
        Some(_) => Err(SchemaViolation::new(
            key,
            "expected an array of selected options",
        )),
    }
}

/// Trimmed text, or `None` when the value is absent or blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    match value {
        Some(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        None => None,
    }
}
