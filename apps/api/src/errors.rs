use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// No usable AI provider is configured. Fatal until the user edits
    /// configuration; never retryable from the API side.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Network/HTTP failure from a provider call. Carries the provider name
    /// so the UI can display "provider + reason" verbatim.
    #[error("Provider '{provider}' request failed: {message}")]
    Provider { provider: String, message: String },

    /// The model returned text with no parseable JSON object. Distinct from
    /// transport failures and never retried at the dispatch layer.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// Style-revision-specific failure. Always surfaced; prior styles remain
    /// untouched by construction, so there is no snapshot fallback.
    #[error("Style generation failed: {0}")]
    StyleGeneration(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Provider { .. } => {
                // Extraction failures block progress, so the raw reason goes
                // to the client rather than a generic message.
                tracing::error!("{self}");
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", self.to_string())
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed model response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    format!("Malformed model response: {msg}"),
                )
            }
            AppError::StyleGeneration(msg) => {
                tracing::error!("Style generation failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "STYLE_GENERATION_ERROR",
                    format!("Style generation failed: {msg}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
