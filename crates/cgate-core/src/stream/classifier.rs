//! Record classification.
//!
//! Turns one framed record into at most one [`Fragment`]. The classifier is
//! stateless: every record is handled on its own, so replaying a record yields
//! the same fragment again.

use std::io;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

use super::narration::{ToolPhase, narrate};
use crate::domain::event::{AgentEvent, EventParseError};
use crate::ports::AuditSink;

/// Which front end the pipeline feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// HTTP gateway: no banners.
    #[default]
    Gateway,
    /// Terminal front end: announces the model in use.
    Cli,
}

/// Terminal record of an agent run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Final text reported by the agent (often the whole answer again).
    pub text: String,
    pub duration_ms: Option<u64>,
    pub is_error: bool,
}

/// A classified piece of output, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Model announcement (CLI variant only).
    Banner(String),
    /// Reasoning from thinking models, already formatted.
    Reasoning(String),
    /// Tool-call narration, already formatted.
    Narration(String),
    /// Assistant answer text.
    Text(String),
    /// End of the run. Rendering is up to the multiplexer.
    Outcome(RunOutcome),
}

impl Fragment {
    /// Whether this fragment carries assistant answer text.
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// Maps agent events to fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    variant: Variant,
}

impl Classifier {
    pub const fn new(variant: Variant) -> Self {
        Self { variant }
    }

    /// Classify one complete record.
    ///
    /// `Ok(None)` means the record is well-formed but produces no output.
    pub fn classify(&self, record: &str) -> Result<Option<Fragment>, EventParseError> {
        let event = AgentEvent::parse(record)?;
        Ok(self.classify_event(event))
    }

    fn classify_event(&self, event: AgentEvent) -> Option<Fragment> {
        match event {
            AgentEvent::System {
                subtype,
                model: Some(model),
                ..
            } if subtype.as_deref() == Some("init") => match self.variant {
                Variant::Cli => Some(Fragment::Banner(format!(
                    "🤖 Using Cursor model: {model}\n\n"
                ))),
                Variant::Gateway => None,
            },
            AgentEvent::Assistant { message } => {
                let text = message.text();
                (!text.is_empty()).then_some(Fragment::Text(text))
            }
            AgentEvent::Thinking {
                subtype,
                text: Some(text),
            } if subtype.as_deref() == Some("delta") && !text.is_empty() => Some(
                Fragment::Reasoning(format!("\n> **Thinking:** {text}")),
            ),
            AgentEvent::ToolCall {
                subtype,
                call_id,
                tool_call: Some(call),
            } => {
                let phase = match subtype.as_deref() {
                    Some("started") => ToolPhase::Started,
                    Some("completed") => ToolPhase::Completed,
                    _ => return None,
                };
                debug!(
                    kind = call.kind(),
                    call_id = call_id.as_deref().unwrap_or_default(),
                    ?phase,
                    "Tool call"
                );
                Some(Fragment::Narration(narrate(&call, phase)))
            }
            AgentEvent::Result {
                result,
                duration_ms,
                is_error,
                ..
            } => Some(Fragment::Outcome(RunOutcome {
                text: result.unwrap_or_default(),
                duration_ms,
                is_error,
            })),
            _ => None,
        }
    }
}

/// Classify a stream of framed records.
///
/// Malformed records are logged and reported to `audit`, then skipped. Read
/// errors pass through unchanged.
pub fn classify_records<S>(
    records: S,
    classifier: Classifier,
    audit: Arc<dyn AuditSink>,
) -> impl Stream<Item = io::Result<Fragment>> + Send
where
    S: Stream<Item = io::Result<String>> + Send,
{
    records.filter_map(move |item| {
        let out = match item {
            Ok(record) => match classifier.classify(&record) {
                Ok(fragment) => fragment.map(Ok),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed agent record");
                    audit.record(&format!("Skipping malformed record: {e}"));
                    None
                }
            },
            Err(e) => Some(Err(e)),
        };
        std::future::ready(out)
    })
}
