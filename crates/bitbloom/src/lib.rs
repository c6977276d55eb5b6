//! # Bitbloom
//!
//! Bloom filters whose bit arrays live in a remote bit-addressable store
//! instead of local memory.
//!
//! ## Overview
//!
//! - **Filter**: derives `K` bit offsets per value from two base digests and
//!   sets or reads them in the store. No false negatives; the false-positive
//!   rate follows from `M` and `K`.
//! - **Registry**: a catalog of named filters over one store. The catalog is
//!   persisted as a metadata record so another process can reload it.
//! - **Store**: any [`BitStore`](store::BitStore). Bit writes go out as
//!   atomic batches; bit-set is idempotent, so concurrent writers never lose
//!   each other's values.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbloom::Registry;
//! use bitbloom::store::SqliteBitStore;
//!
//! async fn example() -> bitbloom::Result<()> {
//!     let store = SqliteBitStore::open("bloom.db")?;
//!
//!     // One filter, roughly a 1e-7 false-positive rate at 10M values
//!     let registry = Registry::new_single_filter(store, 335477044, 23).await?;
//!
//!     registry.add_to_default(b"foo").await?;
//!     assert!(registry.test_to_default(b"foo").await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Store Keys
//!
//! The catalog lives at [`DEFAULT_METADATA_KEY`]; each filter's bits live at
//! [`DEFAULT_FILTER_KEY_PREFIX`] followed by its name. Both are configurable
//! through [`RegistryConfig`].
//!
//! ## Re-exports
//!
//! - `bitbloom::core` - Hashing, parameters, offset derivation
//! - `bitbloom::store` - Store abstraction, memory and SQLite backends

pub mod config;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod registry;

// Re-export component crates
pub use bitbloom_core as core;
pub use bitbloom_store as store;

// Re-export main types for convenience
pub use config::{
    RegistryConfig, DEFAULT_FILTER_KEY_PREFIX, DEFAULT_FILTER_NAME, DEFAULT_METADATA_KEY,
};
pub use error::{BloomError, Result};
pub use filter::Filter;
pub use metadata::{Catalog, FilterMeta};
pub use registry::Registry;

pub use bitbloom_core::{Digest, FilterParams, Hasher};
