//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the pipeline expects from infrastructure. They
//! contain no process, filesystem or network details.

pub mod agent_runner;
pub mod audit_sink;
pub mod model_catalog;
pub mod settings_store;

pub use agent_runner::{AgentError, AgentExit, AgentInvocation, AgentRun, AgentRunner};
pub use audit_sink::{AuditSink, NoopAuditSink};
pub use model_catalog::{CatalogError, ModelCatalog};
pub use settings_store::{MemorySettingsStore, SettingsStore, SettingsStoreError};
