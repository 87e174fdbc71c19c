use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::FieldError;
use crate::models::answer::AnswerSet;

// One accepted submission. Records are append-only: created once when the
// submission is accepted and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRecord {
    pub response_id: String,
    pub form_id: String,
    pub submitted_at: DateTime<Utc>,
    pub answers: AnswerSet,
}

// Response body for the submission endpoint
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    pub errors: Vec<FieldError>,
}

impl SubmissionResponse {
    pub fn accepted(response_id: String) -> Self {
        Self {
            success: true,
            message: "Submission recorded".to_string(),
            response_id: Some(response_id),
            errors: Vec::new(),
        }
    }

    pub fn rejected(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: message.into(),
            response_id: None,
            errors,
        }
    }
}
