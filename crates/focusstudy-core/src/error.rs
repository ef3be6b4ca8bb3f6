//! Error types for focusstudy-core.
//!
//! Nothing in the timer/persistence path is allowed to crash the
//! application: the sync layer and the quote client degrade silently
//! (see their modules). These types exist for the CLI boundary and for
//! diagnostics.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for focusstudy-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Quote service errors
    #[error("Quote service error: {0}")]
    Quote(#[from] QuoteError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the key-value store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,
}

/// Quote-service errors. All of them resolve to the static fallback
/// quote at the call site; they are never surfaced to the user.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// No API credential configured
    #[error("No quote service credential configured")]
    MissingCredential,

    /// Transport failure (connect, timeout, non-success status)
    #[error("Quote request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered but not with the expected JSON shape
    #[error("Malformed quote response: {0}")]
    MalformedResponse(String),

    /// Failed to parse the embedded quote payload
    #[error("Quote payload error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
