//! The `cursor-agent` subprocess adapter.

mod invocation;
mod runner;
mod stderr;

pub use invocation::{AgentCommandBuilder, OUTPUT_FORMAT};
pub use runner::CursorAgentRunner;
pub use stderr::spawn_stderr_collector;
