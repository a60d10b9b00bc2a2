//! Scripted agent runner for router tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use cgate_core::{
    AgentError, AgentExit, AgentInvocation, AgentRun, AgentRunner, AuditSink, ModelRegistry,
};
use cgate_proxy::{AppState, GatewayConfig};
use futures_util::StreamExt;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// What the fake agent does when asked to run.
#[derive(Clone)]
pub enum Script {
    /// Emit these stdout chunks, then exit with the code and stderr.
    Output {
        chunks: Vec<String>,
        code: i32,
        stderr: String,
    },
    /// Fail before producing a process.
    SpawnFailure,
}

impl Script {
    pub fn ndjson(lines: &[&str]) -> Self {
        let mut blob = lines.join("\n");
        blob.push('\n');
        Self::Output {
            chunks: vec![blob],
            code: 0,
            stderr: String::new(),
        }
    }

    pub fn failing(code: i32, stderr: &str) -> Self {
        Self::Output {
            chunks: Vec::new(),
            code,
            stderr: stderr.to_string(),
        }
    }
}

pub struct FakeAgentRunner {
    script: Script,
    pub invocations: Mutex<Vec<AgentInvocation>>,
    pub cancels: Mutex<Vec<CancellationToken>>,
}

impl FakeAgentRunner {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            invocations: Mutex::new(Vec::new()),
            cancels: Mutex::new(Vec::new()),
        })
    }

    pub fn last_invocation(&self) -> Option<AgentInvocation> {
        self.invocations.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AgentRunner for FakeAgentRunner {
    async fn run(&self, invocation: AgentInvocation) -> Result<AgentRun, AgentError> {
        self.invocations.lock().unwrap().push(invocation);
        match &self.script {
            Script::SpawnFailure => Err(AgentError::Spawn {
                binary: "cursor-agent".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            }),
            Script::Output {
                chunks,
                code,
                stderr,
            } => {
                let (tx, exit) = oneshot::channel();
                let _ = tx.send(AgentExit {
                    code: Some(*code),
                    stderr: stderr.clone(),
                });
                let cancel = CancellationToken::new();
                self.cancels.lock().unwrap().push(cancel.clone());
                let output = futures_util::stream::iter(
                    chunks
                        .iter()
                        .map(|c| Ok::<_, io::Error>(Bytes::from(c.clone())))
                        .collect::<Vec<_>>(),
                )
                .boxed();
                Ok(AgentRun {
                    output,
                    exit,
                    cancel,
                })
            }
        }
    }
}

/// Audit sink that keeps lines in memory.
#[derive(Default)]
pub struct MemoryAudit {
    pub lines: Mutex<Vec<String>>,
}

impl MemoryAudit {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l.contains(needle))
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

pub fn state_with(runner: Arc<FakeAgentRunner>, audit: Arc<MemoryAudit>) -> AppState {
    AppState::new(
        runner,
        Arc::new(ModelRegistry::from_ids(["auto", "gpt-5", "sonnet-4.5"])),
        audit,
        GatewayConfig {
            log_raw_output: false,
            ..GatewayConfig::default()
        },
    )
}
