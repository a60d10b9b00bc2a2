//! Settings domain type.
//!
//! Pure data with no infrastructure dependencies. Every field is optional so a
//! partially written settings file still loads; the `effective_*` accessors
//! supply defaults.

use serde::{Deserialize, Serialize};

/// Default bind address for the gateway.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port for the gateway.
pub const DEFAULT_PORT: u16 = 9876;

/// Default agent executable, resolved through `PATH`.
pub const DEFAULT_AGENT_BINARY: &str = "cursor-agent";

/// Application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Whether the terminal front end may run the agent.
    pub enabled: Option<bool>,

    /// Gateway bind address.
    pub host: Option<String>,

    /// Gateway port.
    pub port: Option<u16>,

    /// Agent executable name or path.
    pub agent_binary: Option<String>,

    /// Pass `--force` so the agent may modify files.
    pub force: Option<bool>,

    /// Pass `--approve-mcps`.
    pub approve_mcps: Option<bool>,

    /// Fetch the model list from the provider at start-up.
    pub fetch_models: Option<bool>,

    /// Kill the agent when a streaming client goes away.
    pub kill_on_disconnect: Option<bool>,

    /// Copy raw agent output into the audit log.
    pub log_raw_output: Option<bool>,

    /// Model used when the terminal front end is given none.
    pub default_model: Option<String>,
}

impl Settings {
    /// Create settings with every field set to its default.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            enabled: Some(true),
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
            agent_binary: Some(DEFAULT_AGENT_BINARY.to_string()),
            force: Some(true),
            approve_mcps: Some(true),
            fetch_models: Some(false),
            kill_on_disconnect: Some(true),
            log_raw_output: Some(true),
            default_model: Some(crate::domain::AUTO_MODEL.to_string()),
        }
    }

    #[must_use]
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    #[must_use]
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    #[must_use]
    pub fn effective_agent_binary(&self) -> &str {
        self.agent_binary.as_deref().unwrap_or(DEFAULT_AGENT_BINARY)
    }

    #[must_use]
    pub fn effective_force(&self) -> bool {
        self.force.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_approve_mcps(&self) -> bool {
        self.approve_mcps.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_fetch_models(&self) -> bool {
        self.fetch_models.unwrap_or(false)
    }

    #[must_use]
    pub fn effective_kill_on_disconnect(&self) -> bool {
        self.kill_on_disconnect.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_log_raw_output(&self) -> bool {
        self.log_raw_output.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_default_model(&self) -> &str {
        self.default_model
            .as_deref()
            .unwrap_or(crate::domain::AUTO_MODEL)
    }
}
