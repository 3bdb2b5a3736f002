//! Error types for text splitters

use thiserror::Error;

/// Errors that can occur when building or using text splitters
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration for a text splitter
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Failure in an external tokenizer, propagated without recovery
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

/// Result type for text splitters
pub type Result<T> = std::result::Result<T, Error>;
