use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::revision::revise_content;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResumeRequest {
    pub document: ResumeDocument,
    pub instruction: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResumeResponse {
    pub document: ResumeDocument,
    /// False when the pipeline failed and `document` is the unchanged input.
    pub revised: bool,
}

/// POST /api/v1/resume/improve
pub async fn handle_improve_resume(
    State(state): State<AppState>,
    Json(req): Json<ImproveResumeRequest>,
) -> Result<Json<ImproveResumeResponse>, AppError> {
    if req.instruction.trim().is_empty() {
        return Err(AppError::Validation(
            "instruction must not be empty".to_string(),
        ));
    }

    let outcome = revise_content(
        &req.document,
        &req.instruction,
        &state.registry,
        &state.dispatcher,
    )
    .await;

    Ok(Json(ImproveResumeResponse {
        document: outcome.document,
        revised: outcome.revised,
    }))
}
