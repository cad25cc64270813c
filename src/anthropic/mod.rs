//! Anthropic-compatible wire surface: Messages API types and the streaming
//! event adapter.

mod adapter;
mod types;

pub use adapter::AnthropicAdapter;
pub use types::{
    generate_message_id, ContentBlock, ContentDelta, ErrorDetail, ErrorResponse, MessagesRequest,
    MessagesResponse, MessagesStreamEvent, MessagesUsage, OutputUsage, StopDelta,
};
