//! Error types for the confidence coach

use thiserror::Error;

/// Result type alias for coaching operations
pub type Result<T> = std::result::Result<T, CoachError>;

#[derive(Error, Debug)]
pub enum CoachError {

    // =============================
    // Pipeline Errors
    // =============================

    /// Input rejected before the turn was accepted. The only error kind
    /// ever surfaced to the end user.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Generation failure: {0}")]
    GenerationFailure(String),

    #[error("Assessment parse failure: {0}")]
    AssessmentParse(String),

    #[error("Quote fetch failure: {0}")]
    QuoteFetch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
