//! Error types for the LLM layer

use thiserror::Error;

/// LLM layer error types
#[derive(Error, Debug)]
pub enum LlmError {
    /// The provider rejected the request with HTTP 429.
    #[error("rate limited by provider")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-success response before the stream started.
    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The byte stream broke after the response had started.
    #[error("stream error: {0}")]
    Stream(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }
}

/// Result type alias for LLM operations
pub type Result<T> = std::result::Result<T, LlmError>;
