//! Wire types for the agent's line-delimited event feed.
//!
//! `cursor-agent --output-format stream-json` writes one JSON object per line.
//! Every object carries a `type` discriminator and, for most kinds, a
//! `subtype`. This module decodes a single line into an [`AgentEvent`];
//! turning events into text is the classifier's job.

use serde::Deserialize;
use thiserror::Error;

use super::tool_call::ToolCall;

/// A record that could not be decoded as an agent event.
#[derive(Debug, Error)]
#[error("Malformed agent event: {source}")]
pub struct EventParseError {
    #[from]
    source: serde_json::Error,
}

/// One content part of an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentPart {
    /// Part kind; only `"text"` parts carry answer text.
    #[serde(rename = "type")]
    pub kind: String,
    /// Part text (absent for non-text parts).
    #[serde(default)]
    pub text: String,
}

/// The `message` payload of an `assistant` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssistantMessage {
    /// Role reported by the agent, normally `"assistant"`.
    #[serde(default)]
    pub role: Option<String>,
    /// Ordered content parts.
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

impl AssistantMessage {
    /// Concatenate every `text` part in array order.
    ///
    /// Internal whitespace is preserved as-is; partial-output deltas rely on it.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|part| part.kind == "text")
            .map(|part| part.text.as_str())
            .collect()
    }
}

/// A single decoded agent event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Session lifecycle (`init` carries the resolved model).
    System {
        subtype: Option<String>,
        model: Option<String>,
        session_id: Option<String>,
    },
    /// Assistant output, either a full message or a partial delta.
    Assistant {
        #[serde(default)]
        message: AssistantMessage,
    },
    /// Reasoning output from thinking models.
    Thinking {
        subtype: Option<String>,
        text: Option<String>,
    },
    /// A tool invocation, reported once when started and once when completed.
    ToolCall {
        subtype: Option<String>,
        call_id: Option<String>,
        tool_call: Option<ToolCall>,
    },
    /// Terminal record of a run.
    Result {
        subtype: Option<String>,
        result: Option<String>,
        duration_ms: Option<u64>,
        duration_api_ms: Option<u64>,
        #[serde(default)]
        is_error: bool,
    },
    /// Any `type` outside the documented vocabulary.
    #[serde(other)]
    Unknown,
}

impl AgentEvent {
    /// Decode one complete record.
    pub fn parse(record: &str) -> Result<Self, EventParseError> {
        Ok(serde_json::from_str(record)?)
    }
}
