use crate::llm::Dispatcher;
use crate::providers::registry::ProviderRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub registry: ProviderRegistry,
    pub dispatcher: Dispatcher,
}
