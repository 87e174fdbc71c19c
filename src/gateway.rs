use dotenv::dotenv;
use reqwest::Client;
use serde::Serialize;
use std::env;
use tracing::{debug, info};

use crate::models::answer::AnswerSet;
use crate::models::form::FormDefinition;
use crate::models::response::ResponseRecord;

// Payload delivered to the notification gateway after a submission has
// been accepted and stored
#[derive(Debug, Serialize)]
struct NotificationPayload<'a> {
    form_id: &'a str,
    form_title: &'a str,
    response_id: &'a str,
    submitted_at: String,
    respondent_email: &'a str,
    answers: &'a AnswerSet,
}

/// Client for the external notification gateway.
///
/// The gateway sends the confirmation mail to the respondent and the
/// alert to the administrators; this service only hands the accepted
/// submission over. Delivery failures never affect the stored response.
pub struct NotificationClient {
    client: Client,
    endpoint: Option<String>,
}

impl NotificationClient {
    /// Create a new notification client from environment variables
    pub fn new() -> Self {
        dotenv().ok();

        let endpoint = env::var("NOTIFICATION_GATEWAY_URL").ok();
        match &endpoint {
            Some(url) => info!("Notification gateway enabled at {}", url),
            None => info!("No notification gateway configured - notifications disabled"),
        }

        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// Create a client pointed at a specific endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a client with notifications disabled
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            endpoint: None,
        }
    }

    /// Hand one accepted submission to the gateway.
    pub async fn notify(
        &self,
        form: &FormDefinition,
        record: &ResponseRecord,
        detected_email: &str,
    ) -> Result<(), reqwest::Error> {
        let Some(endpoint) = &self.endpoint else {
            debug!(
                "Notification gateway disabled, skipping notification for response {}",
                record.response_id
            );
            return Ok(());
        };

        let payload = NotificationPayload {
            form_id: &form.id,
            form_title: &form.title,
            response_id: &record.response_id,
            submitted_at: record.submitted_at.to_rfc3339(),
            respondent_email: detected_email,
            answers: &record.answers,
        };

        debug!(
            "Notifying gateway about response {} (respondent email: {})",
            record.response_id,
            if detected_email.is_empty() {
                "none detected"
            } else {
                detected_email
            }
        );

        self.client
            .post(endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        info!(
            "Notification delivered for response {} on form {}",
            record.response_id, form.id
        );

        Ok(())
    }
}

impl Default for NotificationClient {
    fn default() -> Self {
        Self::new()
    }
}
