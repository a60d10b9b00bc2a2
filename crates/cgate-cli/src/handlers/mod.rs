//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that call into the core pipeline or the gateway and format
//!   output for the terminal

pub mod agent;
pub mod chat;
pub mod models;
pub mod serve;
pub mod toggle;

#[cfg(test)]
pub(crate) mod testing;
