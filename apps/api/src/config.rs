use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODELS: &str = "gemini-2.5-pro,gemini-2.5-flash";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODELS: &str = "gpt-4o,gpt-4o-mini";
const DEFAULT_OLLAMA_MODELS: &str = "llama3.1,mistral";
const DEFAULT_OLLAMA_CLOUD_BASE_URL: &str = "https://ollama.com/v1";
const DEFAULT_OLLAMA_CLOUD_MODELS: &str = "gpt-oss:120b,deepseek-v3.1:671b";

/// Connection settings for one AI backend.
/// `api_key` is empty for keyless endpoints (a local Ollama server).
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub models: Vec<String>,
}

/// Application configuration loaded from environment variables.
///
/// A provider is configured iff its credential (or, for the local Ollama
/// backend, its endpoint) variable is present. Unconfigured providers stay
/// `None` and are omitted from the catalog entirely.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: Option<ProviderSettings>,
    pub openai: Option<ProviderSettings>,
    pub ollama_local: Option<ProviderSettings>,
    pub ollama_cloud: Option<ProviderSettings>,
    /// Preferred provider id used when no selection has been persisted yet.
    pub default_provider: Option<String>,
    /// File holding the persisted (provider, model) selection.
    pub selection_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gemini = env_nonempty("GEMINI_API_KEY").map(|api_key| ProviderSettings {
            api_key,
            base_url: env_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            models: parse_models(&env_or("GEMINI_MODELS", DEFAULT_GEMINI_MODELS)),
        });

        let openai = env_nonempty("OPENAI_API_KEY").map(|api_key| ProviderSettings {
            api_key,
            base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            models: parse_models(&env_or("OPENAI_MODELS", DEFAULT_OPENAI_MODELS)),
        });

        let ollama_local = env_nonempty("OLLAMA_BASE_URL").map(|base_url| ProviderSettings {
            api_key: String::new(),
            base_url,
            models: parse_models(&env_or("OLLAMA_MODELS", DEFAULT_OLLAMA_MODELS)),
        });

        let ollama_cloud = env_nonempty("OLLAMA_CLOUD_API_KEY").map(|api_key| ProviderSettings {
            api_key,
            base_url: env_or("OLLAMA_CLOUD_BASE_URL", DEFAULT_OLLAMA_CLOUD_BASE_URL),
            models: parse_models(&env_or("OLLAMA_CLOUD_MODELS", DEFAULT_OLLAMA_CLOUD_MODELS)),
        });

        Ok(Config {
            gemini,
            openai,
            ollama_local,
            ollama_cloud,
            default_provider: env_nonempty("DEFAULT_PROVIDER"),
            selection_path: PathBuf::from(env_or("SELECTION_PATH", "provider_selection.json")),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reads an env var, treating missing and blank values the same way.
fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses a comma-separated model list, dropping blank entries.
fn parse_models(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_models_splits_and_trims() {
        let models = parse_models("gpt-4o, gpt-4o-mini ,o3");
        assert_eq!(models, vec!["gpt-4o", "gpt-4o-mini", "o3"]);
    }

    #[test]
    fn test_parse_models_drops_blank_entries() {
        let models = parse_models("llama3.1,,mistral,");
        assert_eq!(models, vec!["llama3.1", "mistral"]);
    }

    #[test]
    fn test_parse_models_empty_string() {
        assert!(parse_models("").is_empty());
    }
}
