//! Error types for the trace annotator

use thiserror::Error;

/// Result type alias for annotator operations
pub type Result<T> = std::result::Result<T, AnnotatorError>;

/// Annotator error types
#[derive(Error, Debug)]
pub enum AnnotatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Bad pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{0}")]
    Message(String),
}
