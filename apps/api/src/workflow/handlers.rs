use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::ResumeInput;
use crate::state::AppState;
use crate::workflow::{Orchestrator, WorkflowContext, WorkflowStatus};

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct SubmitApplicationRequest {
    pub text: String,
}

/// POST /api/v1/applications
pub async fn handle_submit_application(
    State(state): State<AppState>,
    Json(req): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<WorkflowContext>), AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("Resume text must not be empty".to_string()));
    }
    Ok(run_workflow(&state, ResumeInput::Text { text: req.text }).await)
}

/// POST /api/v1/applications/upload
/// Multipart form with a single `resume` file (PDF or plain text).
pub async fn handle_upload_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<WorkflowContext>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let input = ResumeInput::from_upload(file_name, content_type.as_deref(), bytes.to_vec())?;
        return Ok(run_workflow(&state, input).await);
    }

    Err(AppError::Validation(format!(
        "Multipart field '{RESUME_FIELD}' is required"
    )))
}

/// A failed workflow is still a full answer: the context goes back with 422.
async fn run_workflow(state: &AppState, input: ResumeInput) -> (StatusCode, Json<WorkflowContext>) {
    let orchestrator = Orchestrator::new(state.judge.clone(), state.jobs.clone())
        .with_progress(state.progress.clone());
    let ctx = orchestrator.process_application(input).await;
    let status = match ctx.status {
        WorkflowStatus::Completed => StatusCode::OK,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(ctx))
}
