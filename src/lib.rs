//! # MockAI - Mock LLM Provider APIs
//!
//! Emulates the OpenAI Chat Completions and Anthropic Messages APIs for
//! client integration testing, without running a model. Responses are a
//! canned (or caller-supplied) answer, returned either as one completion
//! object or as a fixed-cadence Server-Sent Events stream that is
//! wire-identical to the real providers.
//!
//! ## Features
//!
//! - Two streaming wire protocols (OpenAI chunks, Anthropic events) driven
//!   by one timed emission loop
//! - Exact cl100k token accounting via tiktoken-rs, or a fast regex-style
//!   splitter
//! - Caller-controlled pre-response delay with a configured ceiling
//! - Token-budget enforcement against `max_tokens` /
//!   `max_completion_tokens`
//!
//! ## Usage
//!
//! ### As a CLI
//!
//! ```bash
//! # Start the server
//! mockai serve --port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use mockai::{
//!     budget::UsageStats,
//!     openai::OpenAiAdapter,
//!     stream::StreamEmitter,
//!     tokenizer::{RegexTokenizer, Tokenizer},
//! };
//! use std::time::Duration;
//!
//! let tokens = RegexTokenizer::new().tokenize("Hello, world!").unwrap();
//! let usage = UsageStats::new(0, tokens.len() as u32);
//! let emitter = StreamEmitter::new(
//!     OpenAiAdapter::new("gpt-4", usage),
//!     tokens,
//!     Duration::from_millis(100),
//! );
//! let stream = emitter.into_sse_stream();
//! ```

// Core library modules
pub mod answer;
pub mod anthropic;
pub mod budget;
pub mod delay;
pub mod errors;
pub mod openai;
pub mod stream;
pub mod tokenizer;

// CLI module (for the `mockai serve` command)
pub mod cli;

// Re-export commonly used types
pub use answer::{resolve_answer, DEFAULT_ANSWER};
pub use anthropic::AnthropicAdapter;
pub use budget::{check_budget, UsageStats};
pub use errors::ApiError;
pub use openai::OpenAiAdapter;
pub use stream::{StreamAdapter, StreamEmitter};
pub use tokenizer::{create_tokenizer, BpeTokenizer, RegexTokenizer, Tokenizer, TokenizerError};
