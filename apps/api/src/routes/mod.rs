pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::extraction::handlers as extraction_handlers;
use crate::providers::handlers as provider_handlers;
use crate::revision::handlers as revision_handlers;
use crate::state::AppState;
use crate::styling::handlers as styling_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Provider selection
        .route(
            "/api/v1/providers",
            get(provider_handlers::handle_list_providers),
        )
        .route(
            "/api/v1/providers/active",
            put(provider_handlers::handle_set_provider),
        )
        // Resume pipeline
        .route(
            "/api/v1/resume/parse",
            post(extraction_handlers::handle_parse_resume),
        )
        .route(
            "/api/v1/resume/improve",
            post(revision_handlers::handle_improve_resume),
        )
        // Styles
        .route(
            "/api/v1/styles/generate",
            post(styling_handlers::handle_generate_styles),
        )
        .route(
            "/api/v1/styles/templates/:template",
            get(styling_handlers::handle_template_styles),
        )
        .with_state(state)
}
