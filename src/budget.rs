// Budget Enforcer Module
// Computes prompt/completion token counts and rejects answers that exceed
// the caller's cap.

use crate::errors::ApiError;
use crate::openai::{Message, Role};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};

/// Token accounting for one request.
///
/// `total_tokens` is always `prompt_tokens + completion_tokens`, and the
/// streaming and non-streaming paths report identical values for identical
/// inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl UsageStats {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Check the completion against the token cap and compute usage.
///
/// `completion_tokens` is the tokenized answer length, computed by the
/// caller from the same token sequence that will be streamed, so the count
/// and the emitted deltas can never disagree. Prompt tokens are summed over
/// user-role messages only. With no cap, `default_cap` applies. The
/// boundary case `completion_tokens == cap` passes.
pub fn check_budget(
    tokenizer: &dyn Tokenizer,
    messages: &[Message],
    completion_tokens: usize,
    cap: Option<u32>,
    default_cap: u32,
) -> Result<UsageStats, ApiError> {
    let mut prompt_tokens = 0usize;
    for message in messages {
        if message.role == Role::User {
            prompt_tokens += tokenizer.count(&message.content)?;
        }
    }

    let cap = cap.unwrap_or(default_cap);
    if completion_tokens > cap as usize {
        return Err(ApiError::BudgetExceeded);
    }

    Ok(UsageStats::new(prompt_tokens as u32, completion_tokens as u32))
}
