// Error Module
// Request-level error taxonomy shared by both provider surfaces.

use crate::tokenizer::TokenizerError;

/// Errors a completion request can fail with.
///
/// Validation variants (400) are always detected before any streaming
/// transport is opened, so clients never see a half-open stream for a 4xx.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Malformed JSON body or missing required field (HTTP 400)
    #[error("{0}")]
    InvalidRequest(String),
    /// Requested delay exceeds the configured ceiling (HTTP 400)
    #[error("Request delay reached the maximum")]
    DelayTooLong,
    /// Completion token count exceeds the caller's cap (HTTP 400)
    #[error("Max tokens exceeded")]
    BudgetExceeded,
    /// Tokenizer vocabulary failed to load (HTTP 500)
    #[error("Failed to initialize tokenizer: {0}")]
    TokenizerInit(String),
    /// Any other unexpected failure (HTTP 500)
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::DelayTooLong => 400,
            ApiError::BudgetExceeded => 400,
            ApiError::TokenizerInit(_) => 500,
            ApiError::Internal(_) => 500,
        }
    }

    /// Provider-facing error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request_error",
            ApiError::DelayTooLong => "invalid_request_error",
            ApiError::BudgetExceeded => "invalid_request_error",
            ApiError::TokenizerInit(_) => "api_error",
            ApiError::Internal(_) => "api_error",
        }
    }
}

impl From<TokenizerError> for ApiError {
    fn from(err: TokenizerError) -> Self {
        match err {
            TokenizerError::Init(msg) => ApiError::TokenizerInit(msg),
        }
    }
}
