use axum::{
    extract::{Json as ExtractJson, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::FieldError;
use crate::gateway::NotificationClient;
use crate::models::answer::{AnswerSet, SubmissionPayload};
use crate::models::common::{ExportFormat, ExportParams};
use crate::models::form::FormDefinition;
use crate::models::response::{ResponseRecord, SubmissionResponse};
use crate::services::email::detect_email;
use crate::services::export::{export, to_csv, to_xlsx};
use crate::services::forms::FormStore;
use crate::services::repository::ResponseRepository;
use crate::services::validator::validate;

// AppState struct containing shared resources
pub struct AppState {
    pub forms: Arc<FormStore>,
    pub database: Arc<ResponseRepository>,
    pub gateway: Arc<NotificationClient>,
}

type Rejection = (StatusCode, Json<SubmissionResponse>);

fn rejection(status: StatusCode, message: &str, errors: Vec<FieldError>) -> Rejection {
    (status, Json(SubmissionResponse::rejected(message, errors)))
}

// Submission endpoint
pub async fn submit_response(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    ExtractJson(payload): ExtractJson<SubmissionPayload>,
) -> Result<Json<SubmissionResponse>, Rejection> {
    info!("Received submission for form: {}", form_id);

    let form = match state.forms.load(&form_id) {
        Ok(Some(form)) => form,
        Ok(None) => {
            warn!("Submission for unknown form: {}", form_id);
            return Err(rejection(
                StatusCode::NOT_FOUND,
                &format!("Form {} not found", form_id),
                Vec::new(),
            ));
        }
        Err(e) => {
            error!("Failed to load form {}: {}", form_id, e);
            return Err(rejection(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load form definition",
                Vec::new(),
            ));
        }
    };

    // Interpret the flat wire map against the schema before any rules run
    let answers = match AnswerSet::decode(&form, &payload.answers) {
        Ok(answers) => answers,
        Err(violation) => {
            warn!("Malformed submission for form {}: {}", form_id, violation);
            return Err(rejection(
                StatusCode::BAD_REQUEST,
                "Malformed submission",
                vec![FieldError::new(violation.field, violation.detail)],
            ));
        }
    };

    // Any rejection is fatal: nothing is stored for partial submissions
    if let Err(rejections) = validate(&form, &answers) {
        info!(
            "Submission for form {} rejected with {} field violation(s)",
            form_id,
            rejections.len()
        );
        return Err(rejection(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Submission failed validation",
            rejections,
        ));
    }

    let record = match state.database.append(&form.id, &answers) {
        Ok(record) => record,
        Err(e) => {
            error!("Failed to store response for form {}: {}", form_id, e);
            return Err(rejection(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record submission, please try again",
                Vec::new(),
            ));
        }
    };

    let detected_email = detect_email(&form, &record.answers);

    // The response is already durably stored; notification delivery runs
    // in the background and its failures only get logged.
    let gateway = Arc::clone(&state.gateway);
    let response_id = record.response_id.clone();
    tokio::spawn(async move {
        if let Err(e) = gateway.notify(&form, &record, &detected_email).await {
            error!(
                "Failed to notify gateway for response {}: {}",
                record.response_id, e
            );
        }
    });

    Ok(Json(SubmissionResponse::accepted(response_id)))
}

// Export endpoint
pub async fn export_responses(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<Response, (StatusCode, String)> {
    info!(
        "Received export request for form {} ({:?})",
        form_id, params.format
    );

    let form = match state.forms.load(&form_id) {
        Ok(Some(form)) => form,
        Ok(None) => {
            warn!("Export requested for unknown form: {}", form_id);
            return Err((
                StatusCode::NOT_FOUND,
                format!("Form {} not found", form_id),
            ));
        }
        Err(e) => {
            error!("Failed to load form {}: {}", form_id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load form definition".to_string(),
            ));
        }
    };

    let records = match state.database.list_by_form(&form.id) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to list responses for form {}: {}", form_id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read stored responses".to_string(),
            ));
        }
    };

    let grid = export(&form, &records);

    let result = match params.format {
        ExportFormat::Csv => to_csv(&grid),
        ExportFormat::Xlsx => to_xlsx(&grid),
    };
    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to serialize export for form {}: {}", form_id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build export file".to_string(),
            ));
        }
    };

    let filename = format!("{}-responses.{}", form.id, params.format.extension());
    info!(
        "Exporting {} response(s) for form {} as {}",
        grid.len() - 1,
        form_id,
        filename
    );

    Ok((
        [
            (
                header::CONTENT_TYPE,
                params.format.content_type().to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

// List form definitions endpoint (development only)
pub async fn list_forms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FormDefinition>>, StatusCode> {
    match state.forms.list() {
        Ok(forms) => {
            info!("Listing {} form definition(s)", forms.len());
            Ok(Json(forms))
        }
        Err(e) => {
            error!("Failed to list form definitions: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// Single form definition endpoint (development only)
pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<Json<FormDefinition>, StatusCode> {
    match state.forms.load(&form_id) {
        Ok(Some(form)) => Ok(Json(form)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to load form {}: {}", form_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// Stored responses endpoint (development only)
pub async fn list_responses(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<Json<Vec<ResponseRecord>>, StatusCode> {
    match state.database.list_by_form(&form_id) {
        Ok(records) => {
            info!("Listing {} response(s) for form {}", records.len(), form_id);
            Ok(Json(records))
        }
        Err(e) => {
            error!("Failed to list responses for form {}: {}", form_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
