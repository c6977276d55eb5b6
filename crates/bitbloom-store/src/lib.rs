//! # Bitbloom Store
//!
//! The remote bit-addressable store behind every bitbloom filter, reduced to
//! the narrow capability the filters need.
//!
//! ## Overview
//!
//! Filters never talk to a concrete client. They go through the [`BitStore`]
//! trait, which models a Redis-like keyspace of byte strings with individual
//! bit access and atomic batches of bit writes. [`SqliteBitStore`] persists
//! that keyspace to disk; [`MemoryBitStore`] keeps it in memory for tests and
//! single-process use.
//!
//! ## Key Types
//!
//! - [`BitStore`] - The async trait for all store operations
//! - [`BitBatch`] - A set of bit writes that commit together or not at all
//! - [`MemoryBitStore`] - In-memory keyspace
//! - [`SqliteBitStore`] - SQLite-backed keyspace
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbloom_store::{BitBatch, BitStore, SqliteBitStore};
//!
//! async fn example() {
//!     let store = SqliteBitStore::open("bits.db").unwrap();
//!
//!     let batch = BitBatch::new("filter:users", [3, 17, 42]);
//!     store.exec_batch(&batch).await.unwrap();
//!
//!     assert!(store.get_bit("filter:users", 17).await.unwrap());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Bit layout**: offset `o` lives in byte `o / 8` under mask `0x80 >> (o % 8)`
//! - **Sparse reads**: a missing key or an offset past the end reads as `0`
//! - **All-or-nothing batches**: a failed batch leaves no bit changed

pub mod bitmap;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use bitmap::{MAX_BITS, MAX_BIT_OFFSET};
pub use error::{Result, StoreError};
pub use memory::MemoryBitStore;
pub use sqlite::SqliteBitStore;
pub use traits::{BitBatch, BitStore};
