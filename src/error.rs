//! Error types for redsift
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in redsift
#[derive(Debug, Error)]
pub enum RedsiftError {
    /// Invalid or out-of-range run parameter
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing template file, section, or placeholder variable
    #[error("Template error: {0}")]
    Template(String),

    /// Reddit scraping failure
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Run was cancelled before completion
    #[error("Run cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for redsift operations
pub type Result<T> = std::result::Result<T, RedsiftError>;
