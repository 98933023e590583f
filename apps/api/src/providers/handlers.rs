use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::providers::selection::ProviderSelection;
use crate::providers::{Provider, ProviderInfo};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
    pub active: ProviderSelection,
}

/// GET /api/v1/providers
pub async fn handle_list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let active = state.registry.active().await;
    Json(ProvidersResponse {
        providers: state.registry.catalog().entries().to_vec(),
        active,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetProviderRequest {
    pub provider: Provider,
    #[serde(default)]
    pub model: Option<String>,
}

/// PUT /api/v1/providers/active
pub async fn handle_set_provider(
    State(state): State<AppState>,
    Json(req): Json<SetProviderRequest>,
) -> Result<Json<ProviderSelection>, AppError> {
    let selection = state.registry.set_active(req.provider, req.model).await?;
    Ok(Json(selection))
}
