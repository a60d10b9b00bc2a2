//! OpenAI API data models for request/response handling.
//!
//! Only the chat-completions subset the gateway serves. Domain types live in
//! `cgate-core`; this module handles the wire mapping.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use cgate_core::{ModelRegistry, PROVIDER_OWNER, PROVIDER_PREFIX};

/// Prompt used when the request carries no usable message.
pub const FALLBACK_PROMPT: &str = "Hello";

// =============================================================================
// Request Types
// =============================================================================

/// Request to /v1/chat/completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model name, with or without the `cursor/` prefix.
    pub model: String,
    /// Conversation so far. Only the last entry is sent to the agent.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Whether to stream the response.
    #[serde(default)]
    pub stream: bool,
    /// Accepted for compatibility; not forwarded.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Accepted for compatibility; not forwarded.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    /// Prompt for the agent: the last message's text, or [`FALLBACK_PROMPT`].
    pub fn prompt(&self) -> String {
        self.messages
            .last()
            .and_then(|m| m.content.as_ref())
            .map(MessageContent::text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| FALLBACK_PROMPT.to_string())
    }
}

/// A single chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Message content: a plain string or an array of typed parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

impl MessageContent {
    /// Text of the message; text parts are joined with newlines.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter(|p| p.kind == "text")
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One part of an array-form message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Response from /v1/chat/completions endpoint (non-streaming).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

impl ChatCompletionResponse {
    /// Single-choice completion carrying `content`.
    pub fn new(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: completion_id(),
            object: "chat.completion".to_string(),
            created: Utc::now().timestamp(),
            model: model.into(),
            choices: vec![ChatChoice {
                index: 0,
                message: AssistantMessage {
                    role: "assistant".to_string(),
                    content: content.into(),
                },
                finish_reason: "stop".to_string(),
            }],
            usage: Usage::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: AssistantMessage,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

/// Token usage. The agent does not report tokens, so this is always zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One SSE chunk of a streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    /// Content delta with `finish_reason: null`.
    pub fn delta(model: &str, content: impl Into<String>) -> Self {
        Self::build(
            model,
            Delta {
                content: Some(content.into()),
            },
            None,
        )
    }

    /// Terminal chunk: empty delta, `finish_reason: "stop"`.
    pub fn stop(model: &str) -> Self {
        Self::build(model, Delta::default(), Some("stop".to_string()))
    }

    fn build(model: &str, delta: Delta, finish_reason: Option<String>) -> Self {
        Self {
            id: completion_id(),
            object: "chat.completion.chunk".to_string(),
            created: Utc::now().timestamp(),
            model: model.to_string(),
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: Delta,
    /// Serialized as `null` until the terminal chunk.
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// =============================================================================
// Models Endpoint Types
// =============================================================================

/// Response from /v1/models endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelEntry>,
}

impl ModelsResponse {
    /// List every registry entry under the provider prefix.
    pub fn from_registry(registry: &ModelRegistry) -> Self {
        let created = Utc::now().timestamp_millis();
        Self {
            object: "list".to_string(),
            data: registry
                .ids()
                .iter()
                .map(|id| ModelEntry {
                    id: format!("{PROVIDER_PREFIX}{id}"),
                    object: "model".to_string(),
                    created,
                    owned_by: PROVIDER_OWNER.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body: `{"error": "<message>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Timestamp-derived completion id, `cursor-<unix millis>`.
pub fn completion_id() -> String {
    format!("cursor-{}", Utc::now().timestamp_millis())
}

/// Serialize a chunk as one SSE event.
pub fn sse_event(chunk: &ChatCompletionChunk) -> String {
    // A derived Serialize over strings and integers cannot fail.
    let json = serde_json::to_string(chunk).unwrap_or_default();
    format!("data: {json}\n\n")
}

/// Stream terminator.
pub const SSE_DONE: &str = "data: [DONE]\n\n";
