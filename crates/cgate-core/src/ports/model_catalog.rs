//! Remote model catalog port.

use async_trait::async_trait;
use thiserror::Error;

/// Catalog lookup failures. Callers fall back to the built-in registry.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No API key is configured.
    #[error("No API key configured")]
    MissingApiKey,

    /// The request failed or returned a non-success status.
    #[error("Failed to query catalog: {0}")]
    QueryFailed(String),

    /// The response body was not a model listing.
    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Source of model ids beyond the built-in list.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Model ids offered by the provider, in provider order.
    async fn list_models(&self) -> Result<Vec<String>, CatalogError>;
}
