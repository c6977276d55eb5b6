//! # Bitbloom Core
//!
//! Pure primitives for bitbloom: the digest pair, filter parameters and the
//! derivation of bit offsets from a value.
//!
//! This crate contains no I/O, no storage, no networking. Everything here is
//! deterministic computation over byte slices.
//!
//! ## Key Types
//!
//! - [`Hasher`] - Produces the two 64-bit base digests of a value
//! - [`Digest`] - The `(s0, s1)` seed pair
//! - [`FilterParams`] - Validated `(M, K)` pair
//! - [`OffsetSet`] - Deduplicated union of bit offsets across values
//!
//! ## Index Derivation
//!
//! Offsets follow the Kirsch–Mitzenmacher double hashing scheme:
//! `index_i = (s0 + i * s1) mod M` for `i` in `[0, K)`. See [`index`].

pub mod error;
pub mod hash;
pub mod index;
pub mod params;

pub use error::{CoreError, Result};
pub use hash::{crc64, fnv1_64, Digest, Hasher};
pub use index::{offsets, OffsetSet, Offsets};
pub use params::FilterParams;
