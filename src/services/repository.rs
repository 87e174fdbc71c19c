use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

use crate::error::RepositoryError;
use crate::models::answer::AnswerSet;
use crate::models::response::ResponseRecord;

// Append-only store of accepted submissions, one CSV row per response.
// Structured answers travel in a single JSON column so the row layout
// never depends on any particular form schema.
pub struct ResponseRepository {
    csv_path: String,
    file_mutex: Mutex<()>,
}

impl ResponseRepository {
    pub fn new(csv_path: &str) -> Self {
        // Create the CSV file if it doesn't exist with proper headers
        if !Path::new(csv_path).exists() {
            info!("Creating new response database file at {}", csv_path);

            let file = File::create(csv_path).unwrap_or_else(|e| {
                error!("Failed to create response database file: {}", e);
                panic!("Failed to create response database file: {}", e)
            });

            let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

            if let Err(e) =
                writer.write_record(["response_id", "form_id", "submitted_at", "answers"])
            {
                error!("Failed to write headers: {}", e);
                panic!("Failed to write headers: {}", e);
            }

            if let Err(e) = writer.flush() {
                error!("Failed to flush headers: {}", e);
                panic!("Failed to flush headers: {}", e);
            }
        }

        Self {
            csv_path: csv_path.to_string(),
            file_mutex: Mutex::new(()),
        }
    }

    /// Append one accepted submission.
    ///
    /// Every call creates exactly one new record; resubmissions are not
    /// deduplicated. The record is never mutated after this returns.
    pub fn append(
        &self,
        form_id: &str,
        answers: &AnswerSet,
    ) -> Result<ResponseRecord, RepositoryError> {
        let record = ResponseRecord {
            response_id: generate_response_id(),
            form_id: form_id.to_string(),
            submitted_at: Utc::now(),
            answers: answers.clone(),
        };

        let answers_json = serde_json::to_string(&record.answers)?;

        let _lock = self.file_mutex.lock().map_err(|_| RepositoryError::Lock)?;

        let file = OpenOptions::new().append(true).open(&self.csv_path)?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer.write_record([
            record.response_id.as_str(),
            record.form_id.as_str(),
            &record.submitted_at.to_rfc3339(),
            &answers_json,
        ])?;

        writer.flush().map_err(RepositoryError::Io)?;

        info!(
            "Stored response {} for form {}",
            record.response_id, record.form_id
        );

        Ok(record)
    }

    /// All stored responses for one form, ordered by submission time
    /// ascending. The sort is stable, so rows that share a timestamp keep
    /// their append order.
    pub fn list_by_form(&self, form_id: &str) -> Result<Vec<ResponseRecord>, RepositoryError> {
        let _lock = self.file_mutex.lock().map_err(|_| RepositoryError::Lock)?;

        // If file doesn't exist yet, there is nothing to list
        if !Path::new(&self.csv_path).exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.csv_path)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut responses = Vec::new();
        for result in reader.records() {
            let row = result?;
            if row.get(1) == Some(form_id) {
                responses.push(row_to_record(&row)?);
            }
        }

        responses.sort_by_key(|record| record.submitted_at);

        Ok(responses)
    }
}

// Convert a raw CSV row back into a ResponseRecord
fn row_to_record(row: &StringRecord) -> Result<ResponseRecord, RepositoryError> {
    if row.len() < 4 {
        return Err(RepositoryError::Corrupt(format!(
            "expected 4 columns, found {}",
            row.len()
        )));
    }

    let get_column = |idx: usize, name: &str| -> Result<&str, RepositoryError> {
        row.get(idx)
            .ok_or_else(|| RepositoryError::Corrupt(format!("missing column `{}`", name)))
    };

    let submitted_at = DateTime::parse_from_rfc3339(get_column(2, "submitted_at")?)
        .map_err(|e| RepositoryError::Corrupt(format!("invalid submitted_at: {}", e)))?
        .with_timezone(&Utc);

    let answers: AnswerSet = serde_json::from_str(get_column(3, "answers")?)?;

    Ok(ResponseRecord {
        response_id: get_column(0, "response_id")?.to_string(),
        form_id: get_column(1, "form_id")?.to_string(),
        submitted_at,
        answers,
    })
}

fn generate_response_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

// Create a singleton response repository
pub fn create_response_repository() -> Arc<ResponseRepository> {
    dotenv::dotenv().ok();

    // Default path with environment variable override
    let default_path = "/app/data/responses.csv";
    let csv_path =
        std::env::var("RESPONSE_DATABASE_PATH").unwrap_or_else(|_| default_path.to_string());

    // Create the data directory if it doesn't exist and we're using the default path
    if csv_path == default_path {
        let dir = std::path::Path::new(default_path).parent().unwrap();
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::error!("Failed to create data directory: {}", e);
            panic!("Failed to create data directory: {}", e);
        }
    }

    Arc::new(ResponseRepository::new(&csv_path))
}
