//! JSON file settings store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cgate_core::{Settings, SettingsStore, SettingsStoreError};
use tracing::debug;

/// Settings persisted as one pretty-printed JSON object.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self) -> Result<Settings, SettingsStoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file, using defaults");
                return Ok(Settings::with_defaults());
            }
            Err(e) => return Err(SettingsStoreError::Storage(e.to_string())),
        };
        serde_json::from_str(&raw).map_err(|e| SettingsStoreError::Serialization(e.to_string()))
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SettingsStoreError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| SettingsStoreError::Serialization(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| SettingsStoreError::Storage(e.to_string()))
    }
}
