// Tokenizer Module
// Splits answer text into the tokens that pace the stream and feed the
// usage accounting. Two strategies: exact cl100k BPE via tiktoken, and a
// fast splitter on whitespace, punctuation, and CJK characters.

use std::sync::{Arc, OnceLock};
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Errors raised while preparing a tokenizer
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenizerError {
    /// The BPE vocabulary failed to load
    #[error("{0}")]
    Init(String),
}

/// Splits text into display tokens and counts them.
///
/// `count(text)` always equals `tokenize(text).len()`, so budget decisions
/// and the streamed delta sequence can never disagree.
pub trait Tokenizer: Send + Sync {
    /// Split text into tokens whose concatenation renders the text
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError>;

    /// Number of tokens in the text
    fn count(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(self.tokenize(text)?.len())
    }

    /// Strategy name, for logs
    fn name(&self) -> &str;
}

/// Splitter tokenizer.
///
/// Whitespace runs, the sentence delimiters `. , ! ? ;`, and CJK ideographs
/// are each their own token; everything between is a word token. Empty
/// input yields no tokens.
#[derive(Debug, Clone, Default)]
pub struct RegexTokenizer;

impl RegexTokenizer {
    pub fn new() -> Self {
        Self
    }

    fn is_delimiter(c: char) -> bool {
        matches!(c, '.' | ',' | '!' | '?' | ';')
    }

    fn is_cjk(c: char) -> bool {
        ('\u{4e00}'..='\u{9fa5}').contains(&c)
    }

    fn split(text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut run = String::new();
        let mut run_is_whitespace = false;

        for c in text.chars() {
            if Self::is_delimiter(c) || Self::is_cjk(c) {
                if !run.is_empty() {
                    tokens.push(std::mem::take(&mut run));
                }
                tokens.push(c.to_string());
            } else if c.is_whitespace() {
                if !run.is_empty() && !run_is_whitespace {
                    tokens.push(std::mem::take(&mut run));
                }
                run_is_whitespace = true;
                run.push(c);
            } else {
                if !run.is_empty() && run_is_whitespace {
                    tokens.push(std::mem::take(&mut run));
                }
                run_is_whitespace = false;
                run.push(c);
            }
        }
        if !run.is_empty() {
            tokens.push(run);
        }
        tokens
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError> {
        Ok(Self::split(text))
    }

    fn name(&self) -> &str {
        "regex"
    }
}

static CL100K: OnceLock<CoreBPE> = OnceLock::new();

/// The process-wide cl100k vocabulary, loaded on first use
fn cl100k() -> Result<&'static CoreBPE, TokenizerError> {
    if let Some(bpe) = CL100K.get() {
        return Ok(bpe);
    }
    let bpe = cl100k_base().map_err(|e| TokenizerError::Init(e.to_string()))?;
    Ok(CL100K.get_or_init(|| bpe))
}

/// Exact cl100k_base BPE tokenizer
#[derive(Debug, Clone, Default)]
pub struct BpeTokenizer;

impl BpeTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for BpeTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError> {
        let bpe = cl100k()?;
        let ids = bpe.encode_with_special_tokens(text);
        // Decode each id on its own so one stream delta maps to one token.
        // An id that is not valid UTF-8 alone renders as the replacement
        // character, keeping the token count intact.
        Ok(ids
            .into_iter()
            .map(|id| bpe.decode(vec![id]).unwrap_or_else(|_| "\u{FFFD}".to_string()))
            .collect())
    }

    fn count(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(cl100k()?.encode_with_special_tokens(text).len())
    }

    fn name(&self) -> &str {
        "bpe"
    }
}

/// Build the tokenizer for a configured strategy name. Unknown names fall
/// back to BPE with a warning.
pub fn create_tokenizer(strategy: &str) -> Arc<dyn Tokenizer> {
    match strategy {
        "regex" => Arc::new(RegexTokenizer::new()),
        "bpe" | "cl100k" => Arc::new(BpeTokenizer::new()),
        other => {
            tracing::warn!(strategy = %other, "Unknown tokenizer strategy, using bpe");
            Arc::new(BpeTokenizer::new())
        }
    }
}
