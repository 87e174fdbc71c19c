//! Event Registration Form Service
//!
//! This library implements the registration form engine for the
//! training-course catalog backend: a schema of heterogeneous field
//! types, a per-type answer validator, an append-only response store,
//! a deterministic CSV/XLSX exporter and a respondent e-mail detector,
//! wrapped in a small web service.
//!
//! # Modules
//!
//! - `models`: form schema, answer values and response records
//! - `services`: validator, repository, exporter, email detector, form store
//! - `handlers`: HTTP endpoints for submission, export and inspection
//! - `gateway`: client for the external notification gateway

pub mod error;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

// Re-export the main types for ease of use
pub use error::{FieldError, SchemaViolation};
pub use gateway::NotificationClient;
pub use handlers::api::AppState;
pub use routes::create_router;

// Test support and integration tests
#[cfg(test)]
mod tests;
