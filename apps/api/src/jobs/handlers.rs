use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::job::NewJobPosting;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InsertJobResponse {
    pub id: i64,
}

/// POST /api/v1/jobs
pub async fn handle_insert_job(
    State(state): State<AppState>,
    Json(job): Json<NewJobPosting>,
) -> Result<(StatusCode, Json<InsertJobResponse>), AppError> {
    if job.title.trim().is_empty() {
        return Err(AppError::Validation("Job title must not be empty".to_string()));
    }
    if job.requirements.is_empty() {
        return Err(AppError::Validation(
            "Job must list at least one requirement".to_string(),
        ));
    }
    let id = state.jobs.insert(job).await?;
    Ok((StatusCode::CREATED, Json(InsertJobResponse { id })))
}
