//! Domain types: agent events, tool calls, the model registry.

pub mod agent_error;
pub mod event;
pub mod registry;
pub mod tool_call;

pub use agent_error::{AgentFailureKind, ERRORS_LOG_HINT, user_message};
pub use event::{AgentEvent, AssistantMessage, ContentPart, EventParseError};
pub use registry::{
    AUTO_MODEL, BUILTIN_MODELS, ModelRegistry, PROVIDER_OWNER, PROVIDER_PREFIX, UnknownModel,
    strip_provider_prefix,
};
pub use tool_call::{Invocation, Rejection, ToolCall, ToolOutcome};
