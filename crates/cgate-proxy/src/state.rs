//! Shared application state for the gateway.

use std::path::PathBuf;
use std::sync::Arc;

use cgate_core::{AgentRunner, AuditSink, ModelRegistry, Pipeline, Settings, Variant};

/// Per-process gateway options, fixed at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Directory passed to the agent as `--workspace`.
    pub workspace: Option<PathBuf>,
    pub force: bool,
    pub approve_mcps: bool,
    /// Kill the agent when a streaming client disconnects.
    pub kill_on_disconnect: bool,
    /// Copy raw agent output into the audit log.
    pub log_raw_output: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::with_defaults(), None)
    }
}

impl GatewayConfig {
    pub fn from_settings(settings: &Settings, workspace: Option<PathBuf>) -> Self {
        Self {
            workspace,
            force: settings.effective_force(),
            approve_mcps: settings.effective_approve_mcps(),
            kill_on_disconnect: settings.effective_kill_on_disconnect(),
            log_raw_output: settings.effective_log_raw_output(),
        }
    }
}

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<dyn AgentRunner>,
    pub registry: Arc<ModelRegistry>,
    pub audit: Arc<dyn AuditSink>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(
        runner: Arc<dyn AgentRunner>,
        registry: Arc<ModelRegistry>,
        audit: Arc<dyn AuditSink>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            runner,
            registry,
            audit,
            config: Arc::new(config),
        }
    }

    /// Pipeline configured for the gateway variant.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(Variant::Gateway, Arc::clone(&self.audit))
            .with_raw_output(self.config.log_raw_output)
    }
}
