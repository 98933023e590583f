//! Schema-guided extraction — raw resume prose in, normalized document out.

pub mod handlers;
pub mod normalize;
pub mod prompts;

use tracing::info;

use crate::errors::AppError;
use crate::llm::retry::RetryPolicy;
use crate::llm::{first_json_object, Dispatcher, ResponseFormat};
use crate::models::resume::ResumeDocument;
use crate::providers::registry::ProviderRegistry;

use self::normalize::ParsedResume;

/// Converts raw resume text into a `ResumeDocument` via the active provider.
///
/// Transient transport failures are retried per the standard policy;
/// unparseable output is not, since re-sending an identical prompt to a
/// non-deterministic model is a caller decision. Both failure kinds are
/// terminal for this call — no partial state is retained.
pub async fn extract_resume(
    raw_text: &str,
    registry: &ProviderRegistry,
    dispatcher: &Dispatcher,
) -> Result<ResumeDocument, AppError> {
    let selection = registry.active().await;
    info!(
        "extracting resume via '{}' model '{}' ({} chars of input)",
        selection.provider.id(),
        selection.model,
        raw_text.len()
    );

    let prompt = prompts::build_extraction_prompt(raw_text);
    let raw = dispatcher
        .dispatch(
            selection.provider,
            &selection.model,
            &prompt,
            ResponseFormat::JsonObject,
            &RetryPolicy::standard(),
        )
        .await
        .map_err(|e| AppError::Provider {
            provider: selection.provider.id().to_string(),
            message: e.to_string(),
        })?;

    let object = first_json_object(&raw).ok_or_else(|| {
        AppError::MalformedResponse("no JSON object found in model output".to_string())
    })?;
    let parsed: ParsedResume =
        serde_json::from_str(object).map_err(|e| AppError::MalformedResponse(e.to_string()))?;

    Ok(normalize::normalize(parsed))
}
