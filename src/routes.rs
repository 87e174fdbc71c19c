use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{
    export_responses, get_form, list_forms, list_responses, submit_response, AppState,
};
use crate::handlers::test::{health_check, sample_form};

pub fn create_router(app_state: Arc<AppState>, is_production: bool) -> Router {
    let mut router = Router::new();

    // Health check is always available
    let health_route = Router::new().route("/health", get(health_check));
    router = router.merge(health_route);

    // The public registration flow is always available
    let submission_route =
        Router::new().route("/forms/:form_id/submissions", post(submit_response));
    router = router.merge(submission_route);

    // Export is part of the admin backend and always available
    let export_route = Router::new().route("/forms/:form_id/export", get(export_responses));
    router = router.merge(export_route);

    // Only add inspection routes if not in production mode
    if !is_production {
        let inspection_routes = Router::new()
            .route("/forms", get(list_forms))
            .route("/forms/:form_id", get(get_form))
            .route("/forms/:form_id/responses", get(list_responses))
            .route("/sample-form", get(sample_form));

        router = router.merge(inspection_routes);

        info!("Inspection routes enabled - server running in development mode");
    } else {
        info!("Running in production mode - only submission, export and health endpoints exposed");
    }

    router.with_state(app_state)
}
