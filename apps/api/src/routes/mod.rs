pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::jobs::handlers::handle_insert_job;
use crate::state::AppState;
use crate::workflow::handlers::{handle_submit_application, handle_upload_application};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Applications: each request runs one workflow to completion
        .route("/api/v1/applications", post(handle_submit_application))
        .route(
            "/api/v1/applications/upload",
            post(handle_upload_application),
        )
        // Jobs
        .route("/api/v1/jobs", post(handle_insert_job))
        .with_state(state)
}
