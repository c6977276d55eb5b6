//! # Bitbloom Testkit
//!
//! Testing utilities for bitbloom.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known digests and offsets for cross-implementation checks
//! - **Generators**: Proptest strategies for values, names and parameters
//! - **Fixtures**: A shared in-memory store with registry helpers
//! - **Recording store**: A [`BitStore`](bitbloom_store::BitStore) wrapper that
//!   counts commands and fails or stalls on demand
//!
//! ## Golden Vectors
//!
//! ```rust
//! use bitbloom_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok) in verify_all_vectors() {
//!     assert!(ok, "vector {name} diverged");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use bitbloom_testkit::generators::{filter_params, value};
//!
//! proptest! {
//!     #[test]
//!     fn offsets_in_range(params in filter_params(), v in value(64)) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod recording;
pub mod vectors;

pub use fixtures::TestFixture;
pub use recording::{RecordingStore, StoreCounters};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
