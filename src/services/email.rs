use crate::models::answer::{non_blank, AnswerSet};
use crate::models::form::{FieldType, FormDefinition};

// Compatibility fallback for answers that are not tied to a typed field
const LEGACY_EMAIL_KEY: &str = "email";

// Label substrings that read as "email" in the two supported languages
const EMAIL_LABEL_PATTERNS: &[&str] = &["email", "e-mail", "邮箱", "电子邮件", "邮件"];

/// Best-guess respondent e-mail for one answer set.
///
/// The precedence chain is deliberate and load-bearing for downstream
/// notifications — first match wins:
/// 1. the field the form explicitly points at via `email_field_key`;
/// 2. the first `email`-typed field in field order with a non-blank answer;
/// 3. the literal `email` key in the answer map;
/// 4. the first field whose label reads like an email label in either
///    supported language, with a non-blank answer;
/// 5. the empty string.
pub fn detect_email(form: &FormDefinition, answers: &AnswerSet) -> String {
    if let Some(key) = &form.email_field_key {
        if let Some(value) = non_blank(answers.text(key)) {
            return value.to_string();
        }
    }

    for field in &form.fields {
        if field.field_type == FieldType::Email {
            if let Some(value) = non_blank(answers.text(&field.key)) {
                return value.to_string();
            }
        }
    }

    if let Some(value) = non_blank(answers.text(LEGACY_EMAIL_KEY)) {
        return value.to_string();
    }

    for field in &form.fields {
        let label = field.label.to_lowercase();
        if EMAIL_LABEL_PATTERNS.iter().any(|p| label.contains(p)) {
            if let Some(value) = non_blank(answers.text(&field.key)) {
                return value.to_string();
            }
        }
    }

    String::new()
}
