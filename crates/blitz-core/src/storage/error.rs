//! Page storage error types

use thiserror::Error;

/// Error type for page storage operations
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    /// Only well-formed page trees can be stored
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Corrupted data detected: {0}")]
    Corrupted(String),
}

/// Result type for page storage operations
pub type StoreResult<T> = Result<T, StoreError>;
