//! `AgentRunner` implementation backed by a real `cursor-agent` process.

use std::io;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use cgate_core::{AgentError, AgentExit, AgentInvocation, AgentRun, AgentRunner};
use futures_util::StreamExt;
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::invocation::AgentCommandBuilder;
use super::stderr::spawn_stderr_collector;

/// Spawns one `cursor-agent` process per run.
#[derive(Debug, Clone)]
pub struct CursorAgentRunner {
    binary: String,
}

impl CursorAgentRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl AgentRunner for CursorAgentRunner {
    async fn run(&self, invocation: AgentInvocation) -> Result<AgentRun, AgentError> {
        let mut cmd = Command::from(AgentCommandBuilder::from_invocation(&self.binary, &invocation).build());
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| AgentError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;
        info!(
            pid = child.id(),
            model = %invocation.model,
            streaming = invocation.stream_partial,
            "Spawned cursor-agent"
        );

        let stdout = child.stdout.take().ok_or(AgentError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(AgentError::MissingPipe("stderr"))?;
        let stderr_task = spawn_stderr_collector(stderr);

        let cancel = CancellationToken::new();
        let (exit_tx, exit_rx) = oneshot::channel();
        tokio::spawn(supervise(child, stderr_task, cancel.clone(), exit_tx));

        Ok(AgentRun {
            output: ReaderStream::new(stdout).boxed(),
            exit: exit_rx,
            cancel,
        })
    }
}

/// Wait for the process (or kill it on cancellation), then report the exit.
async fn supervise(
    mut child: Child,
    stderr_task: JoinHandle<String>,
    cancel: CancellationToken,
    exit_tx: oneshot::Sender<AgentExit>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        () = cancel.cancelled() => {
            info!(pid = child.id(), "Run cancelled, killing cursor-agent");
            if let Err(e) = child.start_kill() {
                warn!(error = %e, "Failed to kill cursor-agent");
            }
            child.wait().await
        }
    };

    let stderr = stderr_task.await.unwrap_or_else(|e| {
        debug!(error = %e, "stderr collector task failed");
        String::new()
    });

    let exit = AgentExit {
        code: exit_code(&status),
        stderr,
    };
    debug!(code = ?exit.code, "cursor-agent exited");

    if exit_tx.send(exit).is_err() {
        debug!("Exit report receiver dropped");
    }
}

fn exit_code(status: &io::Result<ExitStatus>) -> Option<i32> {
    match status {
        Ok(status) => status.code(),
        Err(e) => {
            warn!(error = %e, "Failed to wait for cursor-agent");
            None
        }
    }
}
