use super::config::Config;
use crate::tokenizer::{create_tokenizer, Tokenizer};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub config: Config,
    /// Request-scoped handle to the configured tokenizer strategy; the BPE
    /// vocabulary behind it loads lazily on first use.
    pub tokenizer: Arc<dyn Tokenizer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let tokenizer = create_tokenizer(&config.tokenizer.strategy);
        Self { config, tokenizer }
    }
}
