use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::models::styles::{StyleOverrides, Template};
use crate::state::AppState;
use crate::styling::revise_styles;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStylesRequest {
    pub document: ResumeDocument,
    #[serde(default)]
    pub styles: StyleOverrides,
    pub instruction: String,
}

/// POST /api/v1/styles/generate
pub async fn handle_generate_styles(
    State(state): State<AppState>,
    Json(req): Json<GenerateStylesRequest>,
) -> Result<Json<StyleOverrides>, AppError> {
    if req.instruction.trim().is_empty() {
        return Err(AppError::Validation(
            "instruction must not be empty".to_string(),
        ));
    }

    let styles = revise_styles(
        &req.document,
        &req.styles,
        &req.instruction,
        &state.registry,
        &state.dispatcher,
    )
    .await?;
    Ok(Json(styles))
}

/// GET /api/v1/styles/templates/:template
pub async fn handle_template_styles(Path(template): Path<Template>) -> Json<StyleOverrides> {
    Json(template.default_styles())
}
