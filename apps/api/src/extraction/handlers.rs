use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::extract_resume;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeRequest {
    pub raw_text: String,
}

/// POST /api/v1/resume/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(req): Json<ParseResumeRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    if req.raw_text.trim().is_empty() {
        return Err(AppError::Validation(
            "rawText must not be empty".to_string(),
        ));
    }
    let document = extract_resume(&req.raw_text, &state.registry, &state.dispatcher).await?;
    Ok(Json(document))
}
