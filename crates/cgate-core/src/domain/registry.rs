//! Known model identifiers and request-time model resolution.

use thiserror::Error;

/// Provider namespace clients may prepend to model ids (`cursor/gpt-5`).
pub const PROVIDER_PREFIX: &str = "cursor/";

/// Owner reported for every model on `/v1/models`.
pub const PROVIDER_OWNER: &str = "cursor";

/// Model the agent picks for itself; always present in fetched registries.
pub const AUTO_MODEL: &str = "auto";

/// Models accepted when no remote catalog is available.
pub const BUILTIN_MODELS: &[&str] = &[
    // Auto mode
    "composer-1",
    "auto",
    // Anthropic
    "sonnet-4.5",
    "sonnet-4.5-thinking",
    "opus-4.5",
    "opus-4.5-thinking",
    "opus-4.1",
    // Google & xAI
    "gemini-3-pro",
    "grok",
    // OpenAI
    "gpt-5",
    "gpt-5.1",
    "gpt-5-high",
    "gpt-5.1-high",
    "gpt-5-codex",
    "gpt-5-codex-high",
    "gpt-5.1-codex",
    "gpt-5.1-codex-high",
];

/// Requested model is not in the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown model: {model}. Available: {available}")]
pub struct UnknownModel {
    /// Model id after prefix stripping.
    pub model: String,
    /// Comma-separated registry contents.
    pub available: String,
}

/// Strip the provider namespace, if present.
pub fn strip_provider_prefix(model: &str) -> &str {
    model.strip_prefix(PROVIDER_PREFIX).unwrap_or(model)
}

/// Ordered, duplicate-free set of accepted model ids.
///
/// Built once at start-up and shared read-only (`Arc<ModelRegistry>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistry {
    models: Vec<String>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelRegistry {
    /// Registry of [`BUILTIN_MODELS`].
    pub fn builtin() -> Self {
        Self::from_ids(BUILTIN_MODELS.iter().copied())
    }

    /// Build a registry, dropping blanks and duplicates while keeping order.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut models: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            let id = id.trim();
            if !id.is_empty() && !models.iter().any(|m| m == id) {
                models.push(id.to_string());
            }
        }
        Self { models }
    }

    /// Build a registry from a remote catalog listing, with `auto` first.
    pub fn from_catalog<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_ids(std::iter::once(AUTO_MODEL.to_string()).chain(ids.into_iter().map(Into::into)))
    }

    /// Whether `id` (without prefix) is accepted.
    pub fn contains(&self, id: &str) -> bool {
        self.models.iter().any(|m| m == id)
    }

    /// Registry contents in order.
    pub fn ids(&self) -> &[String] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Comma-separated listing used in error messages.
    pub fn available(&self) -> String {
        self.models.join(", ")
    }

    /// Resolve a client-supplied model id to the id passed to the agent.
    pub fn resolve(&self, requested: &str) -> Result<String, UnknownModel> {
        let model = strip_provider_prefix(requested.trim());
        if self.contains(model) {
            Ok(model.to_string())
        } else {
            Err(UnknownModel {
                model: model.to_string(),
                available: self.available(),
            })
        }
    }
}
