// Anthropic API Types
// Wire-compatible with the Anthropic Messages API, plus the mock-only
// request controls (request_delay, answer).
// Reference: https://docs.anthropic.com/en/api/messages

use crate::budget::UsageStats;
use crate::openai::{Message, Role};
use serde::{Deserialize, Serialize};

/// Messages API request. `max_tokens` is required, as on the real API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub stream: bool,
    /// Artificial latency in milliseconds before the response starts
    #[serde(default)]
    pub request_delay: u64,
    /// Overrides the canned answer for this request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// A block of message content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
}

/// Token accounting in Anthropic's field names
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MessagesUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl From<UsageStats> for MessagesUsage {
    fn from(usage: UsageStats) -> Self {
        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        }
    }
}

/// A complete message object, returned non-streaming and embedded in
/// `message_start`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub role: Role,
    pub model: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub stop_sequence: Option<String>,
    pub usage: MessagesUsage,
}

impl MessagesResponse {
    /// The finished message for the non-streaming path
    pub fn new(model: String, content: String, usage: UsageStats) -> Self {
        Self {
            id: generate_message_id(),
            kind: "message".to_string(),
            role: Role::Assistant,
            model,
            content: vec![ContentBlock::Text { text: content }],
            stop_reason: Some("end_turn".to_string()),
            stop_sequence: None,
            usage: usage.into(),
        }
    }

    /// The empty shell carried by `message_start`: no content yet and zero
    /// output tokens
    pub fn started(id: String, model: String, input_tokens: u32) -> Self {
        Self {
            id,
            kind: "message".to_string(),
            role: Role::Assistant,
            model,
            content: vec![],
            stop_reason: None,
            stop_sequence: None,
            usage: MessagesUsage {
                input_tokens,
                output_tokens: 0,
            },
        }
    }
}

/// Incremental content carried by `content_block_delta`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentDelta {
    TextDelta { text: String },
}

/// Finish metadata carried by `message_delta`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopDelta {
    pub stop_reason: String,
    pub stop_sequence: Option<String>,
}

/// Usage fragment carried by `message_delta`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutputUsage {
    pub output_tokens: u32,
}

/// One event of the Messages streaming protocol.
///
/// The serde tag doubles as the payload's `type` field; [`Self::event_name`]
/// supplies the matching `event:` line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagesStreamEvent {
    MessageStart {
        message: MessagesResponse,
    },
    ContentBlockStart {
        index: u32,
        content_block: ContentBlock,
    },
    ContentBlockDelta {
        index: u32,
        delta: ContentDelta,
    },
    MessageDelta {
        delta: StopDelta,
        usage: OutputUsage,
    },
    MessageStop,
}

impl MessagesStreamEvent {
    /// The SSE event name for this variant
    pub fn event_name(&self) -> &'static str {
        match self {
            MessagesStreamEvent::MessageStart { .. } => "message_start",
            MessagesStreamEvent::ContentBlockStart { .. } => "content_block_start",
            MessagesStreamEvent::ContentBlockDelta { .. } => "content_block_delta",
            MessagesStreamEvent::MessageDelta { .. } => "message_delta",
            MessagesStreamEvent::MessageStop => "message_stop",
        }
    }
}

/// Anthropic-style error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            kind: "error".to_string(),
            error: ErrorDetail {
                error_type: error_type.into(),
                message: message.into(),
            },
        }
    }
}

/// Generate an Anthropic-style message id
pub fn generate_message_id() -> String {
    format!("msg_{}", uuid::Uuid::new_v4())
}
