//! OpenAI-compatible chat-completions gateway in front of `cursor-agent`.
//!
//! Requests are validated against the model registry, run through the
//! [`AgentRunner`](cgate_core::AgentRunner) port, and answered either as one
//! completion object or as an SSE stream of chunks.
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod handlers;
pub mod openai;
pub mod server;
pub mod state;
pub mod stream;

pub use error::GatewayHttpError;
pub use server::{create_router, serve};
pub use state::{AppState, GatewayConfig};

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tower as _;
