//! Agent runner port.
//!
//! Abstracts launching one `cursor-agent` run and exposing its stdout as a
//! byte stream. Implementations own process details; the pipeline only sees
//! bytes, an exit report and a cancellation handle.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Everything needed to launch one agent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInvocation {
    /// Resolved model id (no provider prefix).
    pub model: String,
    pub prompt: String,
    /// Directory the agent operates in.
    pub workspace: Option<PathBuf>,
    /// Ask for partial assistant deltas (streaming responses only).
    pub stream_partial: bool,
    /// Allow the agent to modify files without confirmation.
    pub force: bool,
    pub approve_mcps: bool,
}

impl AgentInvocation {
    /// Invocation with the gateway defaults: force and MCP approval on.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            workspace: None,
            stream_partial: false,
            force: true,
            approve_mcps: true,
        }
    }

    #[must_use]
    pub fn with_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    #[must_use]
    pub const fn with_stream_partial(mut self, stream_partial: bool) -> Self {
        self.stream_partial = stream_partial;
        self
    }

    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub const fn with_approve_mcps(mut self, approve_mcps: bool) -> Self {
        self.approve_mcps = approve_mcps;
        self
    }
}

/// How a run ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentExit {
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Everything the agent wrote to stderr.
    pub stderr: String,
}

impl AgentExit {
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// First non-blank stderr line, if any.
    pub fn first_stderr_line(&self) -> Option<&str> {
        self.stderr.lines().map(str::trim).find(|l| !l.is_empty())
    }

    /// Error describing a failed exit.
    pub fn to_error(&self) -> AgentError {
        AgentError::Exit {
            code: self.code.unwrap_or(-1),
            detail: self
                .first_stderr_line()
                .unwrap_or("no error output")
                .to_string(),
        }
    }
}

/// A running agent.
pub struct AgentRun {
    /// Raw stdout chunks, in arrival order.
    pub output: BoxStream<'static, io::Result<Bytes>>,
    /// Resolves once the process has exited and stderr is drained.
    pub exit: oneshot::Receiver<AgentExit>,
    /// Cancelling kills the process.
    pub cancel: CancellationToken,
}

impl std::fmt::Debug for AgentRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRun")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Agent launch and run failures.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The binary could not be started.
    #[error("Failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    /// The process's pipes were not available after spawn.
    #[error("Agent process has no {0} pipe")]
    MissingPipe(&'static str),

    /// Reading stdout failed mid-run.
    #[error("Failed to read agent output: {0}")]
    Read(#[from] io::Error),

    /// The agent exited unsuccessfully without usable output.
    #[error("cursor-agent exited with code {code}: {detail}")]
    Exit { code: i32, detail: String },

    /// The exit report was lost (runner task ended early).
    #[error("cursor-agent exit status unavailable")]
    ExitUnknown,
}

/// Launches agent runs.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Start a run. Fails only if the process cannot be launched.
    async fn run(&self, invocation: AgentInvocation) -> Result<AgentRun, AgentError>;
}
