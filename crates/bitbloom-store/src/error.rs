//! Error types for the store module.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Bit offset beyond what the store can address.
    #[error("bit offset {offset} exceeds maximum {max}")]
    OffsetOutOfRange { offset: u64, max: u64 },

    /// The call did not complete before its deadline.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// The store could not be reached or refused the command.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
