//! The digest pair behind every bitbloom filter.
//!
//! Two unrelated 64-bit algorithms are combined: FNV-1 and CRC-64/XZ. Their
//! outputs seed the double hashing in [`crate::index`], so they must stay
//! byte-for-byte stable; any change silently invalidates every bit array
//! already written to a store.

use crc::{Crc, CRC_64_XZ};
use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_XZ);

/// 64-bit FNV-1 (multiply, then xor).
#[must_use]
pub fn fnv1_64(value: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for byte in value {
        hash = hash.wrapping_mul(FNV_PRIME);
        hash ^= u64::from(*byte);
    }
    hash
}

/// CRC-64/XZ: ECMA-182 polynomial, reflected, all-ones init and xorout.
#[must_use]
pub fn crc64(value: &[u8]) -> u64 {
    CRC64.checksum(value)
}

/// The `(s0, s1)` seed pair for index derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    pub s0: u64,
    pub s1: u64,
}

impl From<Digest> for (u64, u64) {
    fn from(d: Digest) -> Self {
        (d.s0, d.s1)
    }
}

/// Produces the two base digests of a value.
///
/// Holds no state, so one instance may be shared freely between threads and
/// repeated calls never observe each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hasher;

impl Hasher {
    /// Create a hasher.
    pub const fn new() -> Self {
        Self
    }

    /// Digest a value into its seed pair.
    #[must_use]
    pub fn digest(&self, value: &[u8]) -> Digest {
        Digest {
            s0: fnv1_64(value),
            s1: crc64(value),
        }
    }
}
