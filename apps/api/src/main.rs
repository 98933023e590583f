mod config;
mod errors;
mod extraction;
mod llm;
mod models;
mod providers;
mod revision;
mod routes;
mod state;
mod styling;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm::Dispatcher;
use crate::providers::registry::ProviderRegistry;
use crate::providers::selection::FileSelectionStore;
use crate::providers::{Provider, ProviderCatalog};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume AI API v{}", env!("CARGO_PKG_VERSION"));

    // Build the provider catalog (fails when zero providers are configured)
    let catalog = ProviderCatalog::from_config(&config)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    info!(
        "Configured providers: {}",
        catalog
            .entries()
            .iter()
            .map(|e| e.provider.id())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let default_provider = config.default_provider.as_deref().and_then(|id| {
        let provider = Provider::from_id(id);
        if provider.is_none() {
            warn!("DEFAULT_PROVIDER '{id}' is not a known provider id, ignoring");
        }
        provider
    });

    // Registry over the file-backed selection store
    let store = Arc::new(FileSelectionStore::new(config.selection_path.clone()));
    let registry = ProviderRegistry::new(catalog, default_provider, store);
    let active = registry.active().await;
    info!(
        "Active provider: {} (model: {})",
        active.provider.id(),
        active.model
    );

    // Shared dispatcher for all pipeline stages
    let dispatcher = Dispatcher::new(config.clone());

    let state = AppState {
        registry,
        dispatcher,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
