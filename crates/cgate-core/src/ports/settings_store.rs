//! Settings store port.
//!
//! Persists the [`Settings`] record as a whole. Implementations handle
//! serialization and storage details.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::settings::Settings;

/// Settings persistence failures.
#[derive(Debug, Error)]
pub enum SettingsStoreError {
    /// Reading or writing the backing storage failed.
    #[error("Settings storage error: {0}")]
    Storage(String),

    /// The stored record could not be (de)serialized.
    #[error("Settings serialization error: {0}")]
    Serialization(String),
}

/// Store for the settings record.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load settings. Returns defaults if none are stored.
    async fn load(&self) -> Result<Settings, SettingsStoreError>;

    /// Replace the stored settings.
    async fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError>;
}

/// In-memory store, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<Option<Settings>>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(Some(settings)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings, SettingsStoreError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| SettingsStoreError::Storage(e.to_string()))?;
        Ok(guard.clone().unwrap_or_else(Settings::with_defaults))
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| SettingsStoreError::Storage(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}
