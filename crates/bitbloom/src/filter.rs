//! A Bloom filter whose bit array lives in a [`BitStore`].
//!
//! The filter itself holds only its name, its `(M, K)` parameters and a
//! hasher. Every bit it sets or reads goes to the store entry the caller
//! addresses with `key`.

use bitbloom_core::{offsets, FilterParams, Hasher, OffsetSet, Offsets};
use bitbloom_store::{BitBatch, BitStore, Result};

use crate::metadata::FilterMeta;

/// One named Bloom filter.
#[derive(Debug, Clone)]
pub struct Filter {
    name: String,
    params: FilterParams,
    hasher: Hasher,
}

impl Filter {
    /// Create a filter with a fresh hasher.
    pub fn new(name: impl Into<String>, params: FilterParams) -> Self {
        Self {
            name: name.into(),
            params,
            hasher: Hasher::new(),
        }
    }

    /// The filter's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The filter's `(M, K)`.
    pub fn params(&self) -> FilterParams {
        self.params
    }

    /// Persistence projection of this filter.
    pub fn meta(&self) -> FilterMeta {
        FilterMeta {
            name: self.name.clone(),
            m: self.params.m(),
            k: self.params.k(),
        }
    }

    /// The `K` offsets of one value.
    pub fn offsets(&self, value: &[u8]) -> Offsets {
        offsets(self.hasher.digest(value), self.params)
    }

    /// The deduplicated union of offsets of several values.
    pub fn offset_set<V: AsRef<[u8]>>(&self, values: &[V]) -> OffsetSet {
        OffsetSet::from_values(&self.hasher, self.params, values)
    }

    /// Add one value to the bit array at `key`.
    pub async fn add<S>(&self, store: &S, key: &str, value: &[u8]) -> Result<()>
    where
        S: BitStore + ?Sized,
    {
        self.add_multi(store, key, &[value]).await
    }

    /// Add several values in a single atomic batch.
    ///
    /// Either every bit is written or the call fails; after a failure the
    /// caller should assume nothing was applied and retry.
    pub async fn add_multi<S, V>(&self, store: &S, key: &str, values: &[V]) -> Result<()>
    where
        S: BitStore + ?Sized,
        V: AsRef<[u8]> + Sync,
    {
        let bits = self.offset_set(values);
        if bits.is_empty() {
            return Ok(());
        }

        let batch = BitBatch::new(key, bits.sorted());
        tracing::trace!(filter = %self.name, key, commands = batch.len(), "setting bits");
        store.exec_batch(&batch).await
    }

    /// Test whether one value may have been added.
    pub async fn test<S>(&self, store: &S, key: &str, value: &[u8]) -> Result<bool>
    where
        S: BitStore + ?Sized,
    {
        self.test_multi(store, key, &[value]).await
    }

    /// Test whether every value may have been added.
    ///
    /// Stops at the first unset bit. A read failure aborts the whole call.
    pub async fn test_multi<S, V>(&self, store: &S, key: &str, values: &[V]) -> Result<bool>
    where
        S: BitStore + ?Sized,
        V: AsRef<[u8]> + Sync,
    {
        let bits = self.offset_set(values);
        tracing::trace!(filter = %self.name, key, reads = bits.len(), "testing bits");

        for bit in bits.iter() {
            if !store.get_bit(key, bit).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
