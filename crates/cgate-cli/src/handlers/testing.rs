//! Test doubles for handler tests.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use cgate_core::{
    AgentError, AgentExit, AgentInvocation, AgentRun, AgentRunner, AuditSink,
    MemorySettingsStore, NoopAuditSink, Settings,
};
use futures_util::StreamExt;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::bootstrap::CliContext;

pub const ANSWER: &[&str] = &[
    r#"{"type":"system","subtype":"init","model":"gpt-5"}"#,
    r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Done."}]}}"#,
    r#"{"type":"result","subtype":"success","result":"Done.","duration_ms":25,"is_error":false}"#,
];

/// Runner replaying fixed NDJSON lines, then exiting with `code`.
pub struct FakeAgentRunner {
    lines: Vec<String>,
    code: i32,
    stderr: String,
    invocations: Mutex<Vec<AgentInvocation>>,
}

impl FakeAgentRunner {
    pub fn replaying(lines: &[&str], code: i32, stderr: &str) -> Arc<Self> {
        Arc::new(Self {
            lines: lines.iter().map(|l| format!("{l}\n")).collect(),
            code,
            stderr: stderr.to_string(),
            invocations: Mutex::new(Vec::new()),
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
        let (tx, exit) = oneshot::channel();
        let _ = tx.send(AgentExit {
            code: Some(self.code),
            stderr: self.stderr.clone(),
        });
        let chunks: Vec<io::Result<Bytes>> =
            self.lines.iter().map(|l| Ok(Bytes::from(l.clone()))).collect();
        Ok(AgentRun {
            output: futures_util::stream::iter(chunks).boxed(),
            exit,
            cancel: CancellationToken::new(),
        })
    }
}

#[derive(Default)]
pub struct MemoryAudit(Mutex<Vec<String>>);

impl MemoryAudit {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

/// Context around `runner`; the second value captures `errors.log` lines.
pub fn context(runner: Arc<FakeAgentRunner>, enabled: bool) -> (CliContext, Arc<MemoryAudit>) {
    let mut settings = Settings::with_defaults();
    settings.enabled = Some(enabled);
    let errors = Arc::new(MemoryAudit::default());
    let ctx = CliContext {
        workspace: PathBuf::from("/tmp/cgate-workspace"),
        store: Arc::new(MemorySettingsStore::new(settings.clone())),
        settings,
        runner,
        audit: Arc::new(NoopAuditSink),
        errors: Arc::clone(&errors) as Arc<dyn AuditSink>,
    };
    (ctx, errors)
}
