//! # Store Errors
//!
//! Error types for the persistence gateway. Every variant carries a
//! stable code; the wrapped detail is for server-side logs only.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Identifier does not have the store's id shape
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Store rejected or failed the operation
    #[error("Store operation failed: {0}")]
    Backend(String),

    /// Document could not be converted to or from its typed form
    #[error("Document conversion failed: {0}")]
    Codec(String),
}

impl StoreError {
    /// Stable code exposed to clients
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidId(_) => "INVALID_ID",
            StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
            StoreError::Backend(_) => "STORE_FAILURE",
            StoreError::Codec(_) => "CODEC_FAILURE",
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}
