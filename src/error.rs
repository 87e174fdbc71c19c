use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure, reported as a
/// `(field key, reason)` pair so the UI can annotate every offending
/// field at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The raw answer payload could not be interpreted against the form
/// schema at all (wrong JSON shape). Fatal before validation rules run;
/// unlike validation failures this is always a single error.
#[derive(Debug, Clone, Error)]
#[error("malformed answer for field `{field}`: {detail}")]
pub struct SchemaViolation {
    pub field: String,
    pub detail: String,
}

impl SchemaViolation {
    pub fn new(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            detail: detail.into(),
        }
    }
}

/// Failures of the append-only response store. Fatal to the submission
/// and surfaced as retryable; a resubmission may create a duplicate,
/// which is acceptable.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to access response store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read or write response rows: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode stored answers: {0}")]
    Answers(#[from] serde_json::Error),
    #[error("stored response row is invalid: {0}")]
    Corrupt(String),
    #[error("response store lock is poisoned")]
    Lock,
}

/// Failures while rendering an export grid into a wire format. A stored
/// answer referencing a removed field is deliberately not represented
/// here: the exporter omits it silently.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write CSV export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build spreadsheet export: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}
