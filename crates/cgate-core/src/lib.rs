//! Core of the cgate gateway: the agent event pipeline, domain types and
//! port definitions.
//!
//! This crate knows nothing about HTTP, processes or the filesystem. Adapters
//! (`cgate-runtime`, `cgate-proxy`, `cgate-cli`) implement the ports and put
//! the pipeline on a wire.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod settings;
pub mod stream;

// Re-export commonly used types for convenience
pub use domain::{
    AUTO_MODEL, AgentEvent, AgentFailureKind, BUILTIN_MODELS, ERRORS_LOG_HINT, EventParseError,
    ModelRegistry, PROVIDER_OWNER, PROVIDER_PREFIX, ToolCall, UnknownModel, strip_provider_prefix,
    user_message,
};
pub use error::GatewayError;
pub use pipeline::{Pipeline, RawTranscript};
pub use ports::{
    AgentError, AgentExit, AgentInvocation, AgentRun, AgentRunner, AuditSink, CatalogError,
    MemorySettingsStore, ModelCatalog, NoopAuditSink, SettingsStore, SettingsStoreError,
};
pub use settings::{DEFAULT_AGENT_BINARY, DEFAULT_HOST, DEFAULT_PORT, Settings};
pub use stream::{
    Classifier, EmptyResponse, Fragment, LineFramer, Mode, ResponseMultiplexer, RunOutcome,
    ToolPhase, Variant, classify_records, frame_records, narrate,
};

#[cfg(test)]
use tokio_test as _;
