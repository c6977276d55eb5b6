//! Error types for bitbloom.

use bitbloom_core::CoreError;
use bitbloom_store::StoreError;
use thiserror::Error;

/// Errors that can occur during filter and registry operations.
#[derive(Debug, Error)]
pub enum BloomError {
    /// No filter is registered under the requested name.
    #[error("filter [{0}] doesn't exist")]
    FilterNotFound(String),

    /// A default-filter call needs exactly one registered filter.
    #[error("ambiguous default filter: {count} filters registered, expected exactly one")]
    AmbiguousDefault { count: usize },

    /// Store communication, read, write or batch-commit failure.
    #[error("transport error: {0}")]
    Transport(#[from] StoreError),

    /// The persisted metadata record exists but has the wrong shape.
    #[error("metadata decode error: {0}")]
    MetadataDecode(String),

    /// The in-memory catalog could not be serialized.
    #[error("metadata encode error: {0}")]
    MetadataEncode(String),

    /// Invalid filter parameters or registry configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A single-filter registry was requested over a populated catalog.
    #[error("cannot create a single-filter registry: {0} filters already registered")]
    FiltersAlreadyRegistered(usize),

    /// A filter with this name is already registered.
    #[error("filter [{0}] already exists")]
    FilterExists(String),

    /// The stored metadata changed since this registry last loaded or saved it.
    #[error("metadata record changed since it was last loaded")]
    MetadataConflict,
}

impl From<CoreError> for BloomError {
    fn from(e: CoreError) -> Self {
        BloomError::InvalidConfig(e.to_string())
    }
}

/// Result type for bitbloom operations.
pub type Result<T> = std::result::Result<T, BloomError>;
