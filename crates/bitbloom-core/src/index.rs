//! Bit offset derivation.
//!
//! `K` offsets are simulated from one [`Digest`] with double hashing:
//!
//! ```text
//! index_i = (s0 + i * s1) mod M        i in [0, K)
//! ```
//!
//! The sum and product wrap modulo 2^64 before the final reduction, which keeps
//! offsets identical to every other implementation of the scheme.

use std::collections::HashSet;

use crate::hash::{Digest, Hasher};
use crate::params::FilterParams;

/// Iterator over the `K` offsets of one digest.
#[derive(Debug, Clone)]
pub struct Offsets {
    digest: Digest,
    m: u64,
    k: u64,
    i: u64,
}

impl Iterator for Offsets {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.i >= self.k {
            return None;
        }
        let index = self
            .digest
            .s0
            .wrapping_add(self.i.wrapping_mul(self.digest.s1))
            % self.m;
        self.i += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.k - self.i).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Derive the offsets of a digest under `params`. Every offset is `< M`.
pub fn offsets(digest: Digest, params: FilterParams) -> Offsets {
    Offsets {
        digest,
        m: params.m(),
        k: params.k(),
        i: 0,
    }
}

/// The deduplicated union of offsets across one or more values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetSet {
    bits: HashSet<u64>,
}

impl OffsetSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Union the offsets of every value.
    pub fn from_values<V: AsRef<[u8]>>(hasher: &Hasher, params: FilterParams, values: &[V]) -> Self {
        let mut set = Self::new();
        for value in values {
            set.extend(offsets(hasher.digest(value.as_ref()), params));
        }
        set
    }

    /// Number of distinct offsets.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the set holds no offsets.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether `offset` is in the set.
    pub fn contains(&self, offset: u64) -> bool {
        self.bits.contains(&offset)
    }

    /// Offsets in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.bits.iter().copied()
    }

    /// Offsets in ascending order, for deterministic command sequences.
    pub fn sorted(&self) -> Vec<u64> {
        let mut bits: Vec<u64> = self.bits.iter().copied().collect();
        bits.sort_unstable();
        bits
    }
}

impl Extend<u64> for OffsetSet {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        self.bits.extend(iter);
    }
}

impl FromIterator<u64> for OffsetSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}
