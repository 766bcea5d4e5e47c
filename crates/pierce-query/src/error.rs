//! Error types for query configuration.

use thiserror::Error;

/// Errors that can occur when configuring exit-aware casts.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Configuration value out of range.
    #[error("Invalid query configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
