//! Persistence port for the active (provider, model) pair.
//!
//! The selection survives process restarts but is deliberately tiny: one JSON
//! file, last write wins. Store failures are degraded to "no selection" so a
//! corrupt or unreadable file can never block startup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::providers::Provider;

/// The persisted choice of backend and model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSelection {
    pub provider: Provider,
    pub model: String,
}

#[async_trait]
pub trait SelectionStore: Send + Sync {
    async fn load(&self) -> Result<Option<ProviderSelection>>;
    async fn save(&self, selection: &ProviderSelection) -> Result<()>;
}

/// JSON-file-backed store.
pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SelectionStore for FileSelectionStore {
    async fn load(&self) -> Result<Option<ProviderSelection>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("failed to read provider selection file"),
        };

        match serde_json::from_str(&raw) {
            Ok(selection) => Ok(Some(selection)),
            Err(e) => {
                // Unparseable selection counts as "never chosen".
                warn!(
                    "ignoring unparseable provider selection at {}: {e}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, selection: &ProviderSelection) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("failed to create selection directory")?;
            }
        }
        let raw = serde_json::to_string_pretty(selection)?;
        tokio::fs::write(&self.path, raw)
            .await
            .context("failed to write provider selection file")
    }
}

/// In-memory store for tests.
#[cfg(test)]
pub struct MemorySelectionStore {
    inner: std::sync::Mutex<Option<ProviderSelection>>,
}

#[cfg(test)]
impl MemorySelectionStore {
    pub fn new(initial: Option<ProviderSelection>) -> Self {
        Self {
            inner: std::sync::Mutex::new(initial),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SelectionStore for MemorySelectionStore {
    async fn load(&self) -> Result<Option<ProviderSelection>> {
        Ok(self.inner.lock().unwrap().clone())
    }

    async fn save(&self, selection: &ProviderSelection) -> Result<()> {
        *self.inner.lock().unwrap() = Some(selection.clone());
        Ok(())
    }
}
