// OpenAI Stream Adapter
// Frames the shared emission loop as chat.completion.chunk events ending in
// the literal [DONE] line.

use super::types::ChatCompletionChunk;
use crate::budget::UsageStats;
use crate::stream::{sse_data, StreamAdapter, SSE_DONE};

/// OpenAI chunk framing for one streaming request.
///
/// Every chunk shares the id, creation timestamp and fingerprint minted
/// when the stream opened.
pub struct OpenAiAdapter {
    id: String,
    model: String,
    created: i64,
    fingerprint: String,
    usage: UsageStats,
}

impl OpenAiAdapter {
    pub fn new(model: impl Into<String>, usage: UsageStats) -> Self {
        Self {
            id: format!("chatcmpl-{}", uuid::Uuid::new_v4()),
            model: model.into(),
            created: chrono::Utc::now().timestamp(),
            fingerprint: uuid::Uuid::new_v4().to_string(),
            usage,
        }
    }

    fn chunk(&self) -> ChatCompletionChunk {
        ChatCompletionChunk::new(
            self.id.clone(),
            self.model.clone(),
            self.created,
            self.fingerprint.clone(),
        )
    }
}

impl StreamAdapter for OpenAiAdapter {
    fn preamble(&self) -> Vec<String> {
        vec![sse_data(&self.chunk().with_role())]
    }

    fn delta(&self, token: &str) -> String {
        sse_data(&self.chunk().with_content(token.to_string()))
    }

    fn terminal(&self) -> Vec<String> {
        vec![
            sse_data(&self.chunk().with_finish("stop".to_string()).with_usage(self.usage)),
            SSE_DONE.to_string(),
        ]
    }
}
