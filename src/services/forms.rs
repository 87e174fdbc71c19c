use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::form::FormDefinition;

#[derive(Debug, Error)]
pub enum FormStoreError {
    #[error("failed to read form definition: {0}")]
    Io(#[from] std::io::Error),
    #[error("form definition is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

// Read-only access to the authored form definitions, one JSON document per
// form. Definitions are re-read on every request: the admin layer edits
// them out-of-band, and validation and export must always see the schema
// as it exists now.
pub struct FormStore {
    dir: PathBuf,
}

impl FormStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load one form definition, or `None` if it does not exist.
    pub fn load(&self, form_id: &str) -> Result<Option<FormDefinition>, FormStoreError> {
        if !is_valid_form_id(form_id) {
            warn!("Rejecting form id with unexpected characters: {}", form_id);
            return Ok(None);
        }

        let path = self.dir.join(format!("{}.json", form_id));
        if !Path::new(&path).exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)?;
        let mut form: FormDefinition = serde_json::from_str(&contents)?;

        // The file name is the canonical identifier
        if form.id != form_id {
            warn!(
                "Form definition {} declares id `{}`; using the file name",
                path.display(),
                form.id
            );
            form.id = form_id.to_string();
        }

        if !form.email_pointer_is_valid() {
            warn!(
                "Form {} has email_field_key pointing at a missing or non-text field; \
                 email detection will fall back to the heuristic chain",
                form.id
            );
        }

        // An empty options list on a choice field is tolerated (membership
        // is never validated) but makes the field unanswerable in a UI
        for field in &form.fields {
            if field.field_type.is_choice() && field.options.is_empty() {
                warn!(
                    "Form {} field {} is a choice field with no options",
                    form.id, field.key
                );
            }
        }

        Ok(Some(form))
    }

    /// All loadable form definitions, ordered by id.
    pub fn list(&self) -> Result<Vec<FormDefinition>, FormStoreError> {
        let mut forms = Vec::new();

        if !self.dir.exists() {
            return Ok(forms);
        }

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(form_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load(form_id) {
                Ok(Some(form)) => forms.push(form),
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping unreadable form definition {}: {}", form_id, e);
                }
            }
        }

        forms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(forms)
    }
}

fn is_valid_form_id(form_id: &str) -> bool {
    !form_id.is_empty()
        && form_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// Create a singleton form store
pub fn create_form_store() -> Arc<FormStore> {
    dotenv::dotenv().ok();

    let dir = std::env::var("FORM_DEFINITIONS_PATH")
        .expect("FORM_DEFINITIONS_PATH must be set in environment");

    info!("Loading form definitions from {}", dir);
    Arc::new(FormStore::new(dir))
}
