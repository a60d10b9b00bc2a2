//! Remote model catalog and start-up registry resolution.

use async_trait::async_trait;
use cgate_core::{CatalogError, ModelCatalog, ModelRegistry};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Provider endpoint listing the models available to the account.
pub const CURSOR_MODELS_URL: &str = "https://api.cursor.com/v0/models";

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "CURSOR_API_KEY";

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<String>,
}

/// Catalog backed by the provider's HTTP API.
#[derive(Debug, Clone)]
pub struct CursorModelCatalog {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl CursorModelCatalog {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: CURSOR_MODELS_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Catalog using `CURSOR_API_KEY` from the environment.
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_ENV).ok())
    }

    /// Point at a different endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl ModelCatalog for CursorModelCatalog {
    async fn list_models(&self) -> Result<Vec<String>, CatalogError> {
        let api_key = self.api_key.as_deref().ok_or(CatalogError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| CatalogError::QueryFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::QueryFailed(format!("HTTP {status}")));
        }

        let body: ModelsResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        debug!(count = body.models.len(), "Fetched model catalog");
        Ok(body.models)
    }
}

/// Build the process-wide registry.
///
/// Without a catalog the built-in list is used. A catalog failure is logged
/// and also falls back to the built-in list.
pub async fn resolve_registry(catalog: Option<&dyn ModelCatalog>) -> ModelRegistry {
    let Some(catalog) = catalog else {
        return ModelRegistry::builtin();
    };

    match catalog.list_models().await {
        Ok(ids) => {
            let registry = ModelRegistry::from_catalog(ids);
            info!(count = registry.len(), "Using remote model catalog");
            registry
        }
        Err(CatalogError::MissingApiKey) => {
            debug!("No {API_KEY_ENV}, using built-in models");
            ModelRegistry::builtin()
        }
        Err(e) => {
            warn!(error = %e, "Model catalog unavailable, using built-in models");
            ModelRegistry::builtin()
        }
    }
}
