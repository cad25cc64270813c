// Anthropic Stream Adapter
// Frames the shared emission loop as the Messages streaming event sequence:
// message_start, content_block_start, content_block_delta*, message_delta,
// message_stop.

use super::types::{
    generate_message_id, ContentBlock, ContentDelta, MessagesResponse, MessagesStreamEvent,
    OutputUsage, StopDelta,
};
use crate::budget::UsageStats;
use crate::stream::{sse_event, StreamAdapter};

/// Anthropic event framing for one streaming request
pub struct AnthropicAdapter {
    id: String,
    model: String,
    usage: UsageStats,
}

impl AnthropicAdapter {
    pub fn new(model: impl Into<String>, usage: UsageStats) -> Self {
        Self {
            id: generate_message_id(),
            model: model.into(),
            usage,
        }
    }

    fn frame(event: &MessagesStreamEvent) -> String {
        sse_event(event.event_name(), event)
    }
}

impl StreamAdapter for AnthropicAdapter {
    fn preamble(&self) -> Vec<String> {
        let start = MessagesStreamEvent::MessageStart {
            message: MessagesResponse::started(
                self.id.clone(),
                self.model.clone(),
                self.usage.prompt_tokens,
            ),
        };
        let block = MessagesStreamEvent::ContentBlockStart {
            index: 0,
            content_block: ContentBlock::Text {
                text: String::new(),
            },
        };
        vec![Self::frame(&start), Self::frame(&block)]
    }

    fn delta(&self, token: &str) -> String {
        Self::frame(&MessagesStreamEvent::ContentBlockDelta {
            index: 0,
            delta: ContentDelta::TextDelta {
                text: token.to_string(),
            },
        })
    }

    fn terminal(&self) -> Vec<String> {
        let delta = MessagesStreamEvent::MessageDelta {
            delta: StopDelta {
                stop_reason: "end_turn".to_string(),
                stop_sequence: None,
            },
            usage: OutputUsage {
                output_tokens: self.usage.completion_tokens,
            },
        };
        vec![Self::frame(&delta), Self::frame(&MessagesStreamEvent::MessageStop)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> AnthropicAdapter {
        AnthropicAdapter::new("claude-3-5-sonnet-20241022", UsageStats::new(3, 5))
    }

    #[test]
    fn test_preamble_sequence() {
        let frames = adapter().preamble();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].starts_with("event: message_start\ndata: "));
        assert!(frames[0].contains("\"input_tokens\":3"));
        assert!(frames[0].contains("\"output_tokens\":0"));
        assert!(frames[1].starts_with("event: content_block_start\ndata: "));
        assert!(frames[1].contains("\"content_block\":{\"type\":\"text\",\"text\":\"\"}"));
    }

    #[test]
    fn test_delta_frame() {
        let frame = adapter().delta("Hello");
        assert!(frame.starts_with("event: content_block_delta\ndata: "));
        assert!(frame.contains("\"type\":\"text_delta\""));
        assert!(frame.contains("\"text\":\"Hello\""));
        assert!(frame.contains("\"index\":0"));
    }

    #[test]
    fn test_terminal_sequence() {
        let frames = adapter().terminal();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].starts_with("event: message_delta\ndata: "));
        assert!(frames[0].contains("\"stop_reason\":\"end_turn\""));
        assert!(frames[0].contains("\"output_tokens\":5"));
        assert!(frames[1].starts_with("event: message_stop\ndata: "));
    }
}
