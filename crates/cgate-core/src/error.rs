//! Request-level error taxonomy.

use thiserror::Error;

use crate::domain::UnknownModel;
use crate::ports::AgentError;
use crate::stream::EmptyResponse;

/// Why a chat request failed.
///
/// Malformed agent records never show up here: the classifier recovers from
/// them on its own.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested model is not in the registry.
    #[error(transparent)]
    UnknownModel(#[from] UnknownModel),

    /// The request body could not be decoded.
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    /// The agent finished without producing any text.
    #[error(transparent)]
    EmptyResponse(#[from] EmptyResponse),

    /// Spawning, reading from or waiting on the agent failed.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// The terminal front end is switched off.
    #[error("Cursor agent is disabled. Run `cgate toggle on` to enable it.")]
    Disabled,
}

impl GatewayError {
    /// Whether the client is at fault.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownModel(_) | Self::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_pass_through() {
        let err: GatewayError = UnknownModel {
            model: "x".into(),
            available: "auto".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Unknown model: x. Available: auto");
        assert!(err.is_client_error());

        let err: GatewayError = EmptyResponse.into();
        assert_eq!(err.to_string(), "Empty response from cursor-agent");
        assert!(!err.is_client_error());
    }
}
