//! AI style generation — incremental edits to the style-slot mapping.
//!
//! Unlike content revision there is no snapshot fallback: nothing is at
//! stake, since the caller's styles are untouched unless this succeeds.
//! Every failure surfaces as a style-generation error instead.

pub mod handlers;
pub mod prompts;

use tracing::info;

use crate::errors::AppError;
use crate::llm::retry::RetryPolicy;
use crate::llm::{first_json_object, Dispatcher, ResponseFormat};
use crate::models::resume::ResumeDocument;
use crate::models::styles::StyleOverrides;
use crate::providers::registry::ProviderRegistry;

/// Asks the model for style-class edits and merges them over `current`.
/// Slots the model omits keep their previous value, so the result always
/// contains every slot the input had.
pub async fn revise_styles(
    document: &ResumeDocument,
    current: &StyleOverrides,
    instruction: &str,
    registry: &ProviderRegistry,
    dispatcher: &Dispatcher,
) -> Result<StyleOverrides, AppError> {
    let selection = registry.active().await;
    info!(
        "generating styles via '{}' model '{}'",
        selection.provider.id(),
        selection.model
    );

    let prompt = prompts::build_style_prompt(document, current, instruction)?;
    let raw = dispatcher
        .dispatch(
            selection.provider,
            &selection.model,
            &prompt,
            ResponseFormat::JsonObject,
            &RetryPolicy::none(),
        )
        .await
        .map_err(|e| {
            AppError::StyleGeneration(format!("provider '{}': {e}", selection.provider.id()))
        })?;

    let object = first_json_object(&raw).ok_or_else(|| {
        AppError::StyleGeneration("no JSON object found in model output".to_string())
    })?;
    let delta: StyleOverrides =
        serde_json::from_str(object).map_err(|e| AppError::StyleGeneration(e.to_string()))?;

    Ok(current.clone().merged_with(delta))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{Config, ProviderSettings};
    use crate::models::styles::Template;
    use crate::providers::selection::MemorySelectionStore;
    use crate::providers::ProviderCatalog;

    fn openai_test_stack(base_url: String) -> (ProviderRegistry, Dispatcher) {
        let config = Config {
            gemini: None,
            openai: Some(ProviderSettings {
                api_key: "test-key".to_string(),
                base_url,
                models: vec!["gpt-4o".to_string()],
            }),
            ollama_local: None,
            ollama_cloud: None,
            default_provider: None,
            selection_path: "provider_selection.json".into(),
            port: 8080,
            rust_log: "info".to_string(),
        };
        let catalog = ProviderCatalog::from_config(&config).unwrap();
        let registry =
            ProviderRegistry::new(catalog, None, Arc::new(MemorySelectionStore::new(None)));
        (registry, Dispatcher::new(config))
    }

    #[tokio::test]
    async fn test_partial_delta_merges_over_current_styles() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "choices": [{"message": {"content":
                        "{\"name\": \"text-5xl font-black\"}"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let current = Template::Classic.default_styles();
        let (registry, dispatcher) = openai_test_stack(server.url());
        let merged = revise_styles(
            &ResumeDocument::default(),
            &current,
            "bigger name",
            &registry,
            &dispatcher,
        )
        .await
        .unwrap();

        assert_eq!(merged.name.as_deref(), Some("text-5xl font-black"));
        // Slots the model omitted keep their previous values.
        assert_eq!(merged.container, current.container);
        assert_eq!(merged.section_title, current.section_title);
        assert_eq!(merged.item_subtitle, current.item_subtitle);
    }

    #[tokio::test]
    async fn test_transport_failure_is_style_generation_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let (registry, dispatcher) = openai_test_stack(server.url());
        let err = revise_styles(
            &ResumeDocument::default(),
            &StyleOverrides::default(),
            "dark mode",
            &registry,
            &dispatcher,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::StyleGeneration(_)));
    }

    #[tokio::test]
    async fn test_prose_only_output_is_style_generation_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "choices": [{"message": {"content": "I cannot style this resume."}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let (registry, dispatcher) = openai_test_stack(server.url());
        let err = revise_styles(
            &ResumeDocument::default(),
            &StyleOverrides::default(),
            "dark mode",
            &registry,
            &dispatcher,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::StyleGeneration(_)));
    }
}
