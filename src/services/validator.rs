use tracing::debug;

use crate::error::FieldError;
use crate::models::answer::{non_blank, AnswerSet, AnswerValue};
use crate::models::form::{FieldType, FormDefinition, OTHER_SENTINEL};

// Reasons surfaced to the UI next to the offending field
const REASON_MISSING: &str = "missing value";
const REASON_NO_CHOICE: &str = "no option selected";
const REASON_NO_SELECTION: &str = "select at least one option";
const REASON_OTHER_TEXT: &str = "the Other option requires a text answer";

/// Validate one decoded answer set against the form schema.
///
/// Every field is checked independently and all violations are returned
/// together, so the respondent can fix the whole submission at once. The
/// caller treats any non-empty rejection list as fatal: nothing is stored.
pub fn validate(form: &FormDefinition, answers: &AnswerSet) -> Result<(), Vec<FieldError>> {
    let mut rejections = Vec::new();

    for field in &form.fields {
        let key = field.key.as_str();
        match field.field_type {
            FieldType::ShortText
            | FieldType::LongText
            | FieldType::Email
            | FieldType::Phone
            | FieldType::Select => {
                if field.required && non_blank(answers.text(key)).is_none() {
                    rejections.push(FieldError::new(key, REASON_MISSING));
                }
            }
            FieldType::Radio => match answers.get(key) {
                Some(AnswerValue::Radio { chosen, other_text }) => {
                    if non_blank(Some(chosen.as_str())).is_none() {
                        if field.required {
                            rejections.push(FieldError::new(key, REASON_NO_CHOICE));
                        }
                    } else if chosen == OTHER_SENTINEL
                        && non_blank(other_text.as_deref()).is_none()
                    {
                        // Choosing "Other" commits the respondent to the
                        // free-text answer, required field or not.
                        rejections.push(FieldError::new(key, REASON_OTHER_TEXT));
                    }
                }
                _ => {
                    if field.required {
                        rejections.push(FieldError::new(key, REASON_NO_CHOICE));
                    }
                }
            },
            FieldType::Checkbox => match answers.get(key) {
                Some(AnswerValue::Checkbox {
                    selected,
                    other_enabled,
                    other_text,
                }) => {
                    if field.required && selected.is_empty() && !other_enabled {
                        rejections.push(FieldError::new(key, REASON_NO_SELECTION));
                    }
                    if *other_enabled && non_blank(other_text.as_deref()).is_none() {
                        rejections.push(FieldError::new(key, REASON_OTHER_TEXT));
                    }
                }
                _ => {
                    if field.required {
                        rejections.push(FieldError::new(key, REASON_NO_SELECTION));
                    }
                }
            },
        }
    }

    if rejections.is_empty() {
        Ok(())
    } else {
        debug!(
            "Submission rejected with {} field violation(s)",
            rejections.len()
        );
        Err(rejections)
    }
}
