//! In-memory implementation of the BitStore trait.
//!
//! Same semantics as SQLite but everything lives in one map with no
//! persistence. Useful for tests and for filters that only need to outlive a
//! registry, not the process.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;

use crate::bitmap;
use crate::error::{Result, StoreError};
use crate::traits::{BitBatch, BitStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryBitStore {
    values: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBitStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Number of keys currently held.
    pub fn key_count(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<u8>>>> {
        self.values
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>> {
        self.values
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }
}

impl Default for MemoryBitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BitStore for MemoryBitStore {
    async fn exec_batch(&self, batch: &BitBatch) -> Result<()> {
        // Validate the whole batch before the first write.
        let located = bitmap::locate_all(batch.offsets())?;
        if located.is_empty() {
            return Ok(());
        }

        let mut values = self.write()?;
        let value = values.entry(batch.key().to_string()).or_default();
        bitmap::set_located(value, &located);
        Ok(())
    }

    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool> {
        let values = self.read()?;
        match values.get(key) {
            Some(value) => bitmap::get(value, offset),
            None => {
                bitmap::locate(offset)?;
                Ok(false)
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let values = self.read()?;
        Ok(values.get(key).map(|v| Bytes::copy_from_slice(v)))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut values = self.write()?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool> {
        let mut values = self.write()?;
        if values.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }
        values.insert(key.to_string(), value.to_vec());
        Ok(true)
    }

    async fn del(&self, keys: &[&str]) -> Result<u64> {
        let mut values = self.write()?;
        let removed = keys
            .iter()
            .filter(|key| values.remove(**key).is_some())
            .count();
        Ok(removed as u64)
    }
}
