//! Error types for bitbloom core.

use thiserror::Error;

/// Errors raised while validating filter parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid filter parameters m={m} k={k}: both must be greater than zero")]
    InvalidParameters { m: u64, k: u64 },

    #[error("filter size m={m} exceeds the {max} bits a store can address")]
    Unaddressable { m: u64, max: u64 },

    #[error("invalid sizing request: {0}")]
    InvalidSizing(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
