//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Settings store and audit logs under `<workspace>/.cgate/` (via cgate-runtime)
//! - The `cursor-agent` process runner (via cgate-runtime)
//!
//! Command handlers receive the composed [`CliContext`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cgate_core::{AgentRunner, AuditSink, ModelCatalog, ModelRegistry, Settings, SettingsStore};
use cgate_runtime::{
    CursorAgentRunner, CursorModelCatalog, FileAuditLog, JsonFileSettingsStore, audit_log_path,
    errors_log_path, resolve_registry, settings_path,
};
use tracing::debug;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Agent working directory; state lives in `<workspace>/.cgate/`.
    pub workspace: PathBuf,
    /// Overrides the agent executable from settings.
    pub agent_binary: Option<String>,
}

impl CliConfig {
    /// Config rooted at `workspace`, or the current directory.
    pub fn new(workspace: Option<PathBuf>, agent_binary: Option<String>) -> Result<Self> {
        let workspace = match workspace {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to resolve current directory")?,
        };
        Ok(Self {
            workspace,
            agent_binary,
        })
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub workspace: PathBuf,
    /// Settings as loaded, with command-line overrides applied.
    pub settings: Settings,
    pub store: Arc<dyn SettingsStore>,
    pub runner: Arc<dyn AgentRunner>,
    /// `<workspace>/.cgate/gateway.log`
    pub audit: Arc<dyn AuditSink>,
    /// `<workspace>/.cgate/errors.log`
    pub errors: Arc<dyn AuditSink>,
}

impl CliContext {
    /// Model registry, fetched from the Cursor API when `fetch` is set.
    pub async fn registry(&self, fetch: bool) -> ModelRegistry {
        if fetch {
            let catalog = CursorModelCatalog::from_env();
            resolve_registry(Some(&catalog as &dyn ModelCatalog)).await
        } else {
            resolve_registry(None).await
        }
    }
}

/// Compose the CLI context.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let store = JsonFileSettingsStore::new(settings_path(&config.workspace));
    let mut settings = store
        .load()
        .await
        .with_context(|| format!("Failed to load {}", store.path().display()))?;
    if let Some(binary) = config.agent_binary {
        settings.agent_binary = Some(binary);
    }
    debug!(workspace = %config.workspace.display(), ?settings, "Bootstrapped CLI context");

    let runner = CursorAgentRunner::new(settings.effective_agent_binary());

    Ok(CliContext {
        audit: Arc::new(FileAuditLog::new(audit_log_path(&config.workspace))),
        errors: Arc::new(FileAuditLog::new(errors_log_path(&config.workspace))),
        workspace: config.workspace,
        settings,
        store: Arc::new(store),
        runner: Arc::new(runner),
    })
}
