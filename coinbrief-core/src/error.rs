//! Error types for coinbrief operations

use crate::parsing::ParseError;

/// Result type for coinbrief operations
pub type Result<T> = std::result::Result<T, CoinbriefError>;

/// Error types for the briefing pipeline
#[derive(Debug, thiserror::Error)]
pub enum CoinbriefError {
    /// An agent capability failed while running
    #[error("Agent error: {0}")]
    Agent(String),

    /// LLM provider transport or API failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// The final structured output could not be extracted
    #[error("Structured output error: {0}")]
    StructuredOutput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Output parsing failed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for CoinbriefError {
    fn from(s: String) -> Self {
        CoinbriefError::Other(s)
    }
}

impl From<&str> for CoinbriefError {
    fn from(s: &str) -> Self {
        CoinbriefError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for CoinbriefError {
    fn from(err: anyhow::Error) -> Self {
        CoinbriefError::Other(err.to_string())
    }
}
