//! Active-selection logic on top of the catalog and the persistence port.
//!
//! Guarantees: the active provider is always configured, and the active model
//! always belongs to the active provider's model list. A persisted selection
//! that stopped being valid (credentials removed, model list changed) is
//! repaired by substitution, never surfaced as an error.

use std::sync::Arc;

use tracing::warn;

use crate::errors::AppError;
use crate::providers::selection::{ProviderSelection, SelectionStore};
use crate::providers::{Provider, ProviderCatalog, ProviderInfo};

#[derive(Clone)]
pub struct ProviderRegistry {
    catalog: Arc<ProviderCatalog>,
    default_provider: Option<Provider>,
    store: Arc<dyn SelectionStore>,
}

impl ProviderRegistry {
    pub fn new(
        catalog: ProviderCatalog,
        default_provider: Option<Provider>,
        store: Arc<dyn SelectionStore>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            default_provider,
            store,
        }
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// Resolves the active (provider, model) pair.
    ///
    /// Precedence: persisted selection if still valid, then the configured
    /// default provider, then the first catalog entry. An invalid persisted
    /// model is substituted with the provider's first model and re-persisted.
    pub async fn active(&self) -> ProviderSelection {
        let persisted = match self.store.load().await {
            Ok(persisted) => persisted,
            Err(e) => {
                warn!("failed to load provider selection, using defaults: {e}");
                None
            }
        };

        let (info, persisted_model) = match persisted {
            Some(selection) => match self.catalog.get(selection.provider) {
                Some(info) => (info, Some(selection.model)),
                None => {
                    warn!(
                        "persisted provider '{}' is no longer configured, falling back",
                        selection.provider.id()
                    );
                    (self.fallback_info(), None)
                }
            },
            None => (self.fallback_info(), None),
        };

        match persisted_model {
            Some(model) if info.models.contains(&model) => ProviderSelection {
                provider: info.provider,
                model,
            },
            stale => {
                let repaired = ProviderSelection {
                    provider: info.provider,
                    model: info.models[0].clone(),
                };
                if stale.is_some() {
                    warn!(
                        "persisted model is not in '{}' model list, substituting '{}'",
                        info.provider.id(),
                        repaired.model
                    );
                    self.persist_best_effort(&repaired).await;
                }
                repaired
            }
        }
    }

    /// Switches the active provider. An omitted or invalid model is replaced
    /// by the provider's first model. The result is persisted for future
    /// sessions.
    pub async fn set_active(
        &self,
        provider: Provider,
        model: Option<String>,
    ) -> Result<ProviderSelection, AppError> {
        let info = self.catalog.get(provider).ok_or_else(|| {
            AppError::Validation(format!("provider '{}' is not configured", provider.id()))
        })?;

        let model = model
            .filter(|m| info.models.contains(m))
            .unwrap_or_else(|| info.models[0].clone());

        let selection = ProviderSelection { provider, model };
        self.store
            .save(&selection)
            .await
            .map_err(AppError::Internal)?;
        Ok(selection)
    }

    fn fallback_info(&self) -> &ProviderInfo {
        self.default_provider
            .and_then(|p| self.catalog.get(p))
            .unwrap_or_else(|| self.catalog.first())
    }

    async fn persist_best_effort(&self, selection: &ProviderSelection) {
        if let Err(e) = self.store.save(selection).await {
            warn!("failed to persist provider selection: {e}");
        }
    }
}
