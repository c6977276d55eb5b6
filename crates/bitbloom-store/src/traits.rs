//! BitStore trait: the abstract interface for the bit-addressable store.
//!
//! This trait keeps filters storage-agnostic. Implementations include SQLite
//! (persistent) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// A set of `SETBIT key offset 1` commands against one key.
///
/// Submitted through [`BitStore::exec_batch`], the whole batch applies or
/// none of it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBatch {
    key: String,
    offsets: Vec<u64>,
}

impl BitBatch {
    /// Create a batch setting `offsets` to 1 under `key`.
    pub fn new(key: impl Into<String>, offsets: impl IntoIterator<Item = u64>) -> Self {
        Self {
            key: key.into(),
            offsets: offsets.into_iter().collect(),
        }
    }

    /// The key every command addresses.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Offsets to set, in submission order.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Number of commands in the batch.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the batch holds no commands.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// The BitStore trait: async interface to a bit-addressable keyspace.
///
/// Values are byte strings. Bit commands treat them as bitmaps, zero-extending
/// on write; plain reads and writes treat them as opaque blobs.
///
/// # Design Notes
///
/// - **Atomic batches**: `exec_batch` is all-or-nothing. A partially applied
///   batch could leave a value with only some of its bits set, which would
///   later read as a false negative.
/// - **Idempotent bit writes**: setting a bit is a logical OR, so concurrent
///   writers never lose each other's bits.
/// - **No retries**: every failure is surfaced to the caller as-is.
#[async_trait]
pub trait BitStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Bit Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply every bit write in `batch` as one unit.
    async fn exec_batch(&self, batch: &BitBatch) -> Result<()>;

    /// Read one bit. A missing key or an offset past the end reads `false`.
    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Value Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read a whole value.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Overwrite a whole value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Write `value` only if the current value equals `expected`.
    ///
    /// `expected = None` means the key must be absent. Returns whether the
    /// write happened.
    async fn compare_and_set(&self, key: &str, expected: Option<&[u8]>, value: &[u8])
        -> Result<bool>;

    /// Delete keys, returning how many existed.
    async fn del(&self, keys: &[&str]) -> Result<u64>;
}

#[async_trait]
impl<T: BitStore + ?Sized> BitStore for Arc<T> {
    async fn exec_batch(&self, batch: &BitBatch) -> Result<()> {
        (**self).exec_batch(batch).await
    }

    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool> {
        (**self).get_bit(key, offset).await
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool> {
        (**self).compare_and_set(key, expected, value).await
    }

    async fn del(&self, keys: &[&str]) -> Result<u64> {
        (**self).del(keys).await
    }
}
