//! Provider catalog — the closed set of supported AI backends and the
//! subset of them the running deployment has configured.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::AppError;

pub mod handlers;
pub mod registry;
pub mod selection;

/// Closed set of supported backends. Fan-out happens by matching this enum
/// once per dispatch, never by comparing id strings ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "ollama-local")]
    OllamaLocal,
    #[serde(rename = "ollama-cloud")]
    OllamaCloud,
}

impl Provider {
    /// Catalog enumeration order; also the fallback order when nothing is
    /// persisted and no default is configured.
    pub const ALL: [Provider; 4] = [
        Provider::Gemini,
        Provider::OpenAi,
        Provider::OllamaLocal,
        Provider::OllamaCloud,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::OllamaLocal => "ollama-local",
            Provider::OllamaCloud => "ollama-cloud",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
            Provider::OpenAi => "OpenAI",
            Provider::OllamaLocal => "Ollama (Local)",
            Provider::OllamaCloud => "Ollama Cloud",
        }
    }

    pub fn from_id(id: &str) -> Option<Provider> {
        Provider::ALL.into_iter().find(|p| p.id() == id)
    }
}

/// One configured backend: the provider plus its enumerated model list.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub provider: Provider,
    pub label: &'static str,
    pub models: Vec<String>,
}

/// The providers this deployment can actually reach. Built once at startup;
/// unconfigured providers are omitted entirely, not listed as disabled.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    entries: Vec<ProviderInfo>,
}

impl ProviderCatalog {
    /// Fails with a configuration error when zero providers have credentials,
    /// since no pipeline operation can work without one.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let mut entries = Vec::new();
        for provider in Provider::ALL {
            let settings = match provider {
                Provider::Gemini => config.gemini.as_ref(),
                Provider::OpenAi => config.openai.as_ref(),
                Provider::OllamaLocal => config.ollama_local.as_ref(),
                Provider::OllamaCloud => config.ollama_cloud.as_ref(),
            };
            if let Some(settings) = settings {
                if settings.models.is_empty() {
                    return Err(AppError::Configuration(format!(
                        "provider '{}' is configured with an empty model list",
                        provider.id()
                    )));
                }
                entries.push(ProviderInfo {
                    provider,
                    label: provider.label(),
                    models: settings.models.clone(),
                });
            }
        }

        if entries.is_empty() {
            return Err(AppError::Configuration(
                "no AI provider is configured; set GEMINI_API_KEY, OPENAI_API_KEY, \
                 OLLAMA_BASE_URL, or OLLAMA_CLOUD_API_KEY"
                    .to_string(),
            ));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ProviderInfo] {
        &self.entries
    }

    pub fn get(&self, provider: Provider) -> Option<&ProviderInfo> {
        self.entries.iter().find(|e| e.provider == provider)
    }

    pub fn contains(&self, provider: Provider) -> bool {
        self.get(provider).is_some()
    }

    /// First configured provider. The catalog is never empty by construction.
    pub fn first(&self) -> &ProviderInfo {
        &self.entries[0]
    }
}
