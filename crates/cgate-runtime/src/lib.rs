//! Adapters implementing the `cgate-core` ports: the `cursor-agent` process
//! runner, the file audit log, the JSON settings store and the remote model
//! catalog.
#![deny(unused_crate_dependencies)]

pub mod agent;
pub mod audit;
pub mod catalog;
pub mod paths;
pub mod settings_store;

pub use agent::{AgentCommandBuilder, CursorAgentRunner};
pub use audit::FileAuditLog;
pub use catalog::{API_KEY_ENV, CURSOR_MODELS_URL, CursorModelCatalog, resolve_registry};
pub use paths::{audit_log_path, errors_log_path, settings_path, state_dir};
pub use settings_store::JsonFileSettingsStore;

#[cfg(test)]
use tokio_test as _;
