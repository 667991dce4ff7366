//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors raised while asking a provider for a completion
#[derive(Error, Debug)]
pub enum LLMError {
    /// The request never produced a usable answer
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// The provider answered with a non-success status
    #[error("Provider rejected the request with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// HTTP 429 from the provider
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The body parsed but did not contain a completion
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Missing or malformed provider settings
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LLMError {
    /// Whether the provider itself refused the call
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::RateLimited(_))
    }
}
