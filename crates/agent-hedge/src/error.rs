//! Error types for hedge-fund operations

use thiserror::Error;

/// Hedge-fund specific errors
#[derive(Debug, Error)]
pub enum HedgeError {
    /// Data API returned an error status or an unusable body
    #[error("API error: {0}")]
    ApiError(String),

    /// A date argument is not `YYYY-MM-DD`
    #[error("{field} date must be in YYYY-MM-DD format")]
    InvalidDate {
        /// "Start" or "End"
        field: &'static str,
        /// Rejected input
        value: String,
    },

    /// Start date falls after end date
    #[error("Start date {start} is after end date {end}")]
    InvertedRange {
        /// Resolved start
        start: String,
        /// Resolved end
        end: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Text generation failed
    #[error("LLM error: {0}")]
    LlmError(#[from] agent_llm::LLMError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Writing the result file failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Workflow engine error
    #[error(transparent)]
    Workflow(#[from] agent_core::Error),
}

/// Result type alias for hedge-fund operations
pub type Result<T> = std::result::Result<T, HedgeError>;

/// Node-boundary conversion: engine errors pass through, the rest become
/// processing failures
impl From<HedgeError> for agent_core::Error {
    fn from(err: HedgeError) -> Self {
        match err {
            HedgeError::Workflow(inner) => inner,
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

impl From<agent_utils::ConfigError> for HedgeError {
    fn from(err: agent_utils::ConfigError) -> Self {
        HedgeError::ConfigError(err.to_string())
    }
}

impl From<agent_workflow::GraphError> for HedgeError {
    fn from(err: agent_workflow::GraphError) -> Self {
        HedgeError::Workflow(err.into())
    }
}
