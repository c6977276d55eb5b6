//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use bitbloom::{Registry, RegistryConfig, Result};
use bitbloom_store::{BitStore, MemoryBitStore};

/// Parameters used by the reference end-to-end scenario.
pub const REFERENCE_M: u64 = 335477044;
/// Rounds used by the reference end-to-end scenario.
pub const REFERENCE_K: u64 = 23;

/// A shared in-memory store plus registry helpers.
///
/// Every registry opened from one fixture sees the same keyspace, which is
/// how tests stand in for several processes sharing a remote store.
pub struct TestFixture {
    pub store: Arc<MemoryBitStore>,
    pub config: RegistryConfig,
}

impl TestFixture {
    /// Create a fixture over a fresh store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryBitStore::new()),
            config: RegistryConfig::default(),
        }
    }

    /// Create a fixture with a custom registry configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            store: Arc::new(MemoryBitStore::new()),
            config,
        }
    }

    /// Open a registry over the shared store.
    pub async fn registry(&self) -> Result<Registry<Arc<MemoryBitStore>>> {
        Registry::with_config(Arc::clone(&self.store), self.config.clone()).await
    }

    /// Open a single-filter registry over the shared store.
    pub async fn single_filter(&self, m: u64, k: u64) -> Result<Registry<Arc<MemoryBitStore>>> {
        Registry::single_filter_with_config(Arc::clone(&self.store), self.config.clone(), m, k)
            .await
    }

    /// Open a registry with the named filters registered and saved.
    pub async fn registry_with(
        &self,
        filters: &[(&str, u64, u64)],
    ) -> Result<Registry<Arc<MemoryBitStore>>> {
        let mut registry = self.registry().await?;
        for &(name, m, k) in filters {
            registry.register(name, m, k)?;
        }
        registry.save().await?;
        Ok(registry)
    }

    /// Delete the metadata record and the bit arrays of `names`.
    pub async fn clean(&self, names: &[&str]) -> Result<u64> {
        clean(self.store.as_ref(), &self.config, names).await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Delete the metadata record and the bit arrays of `names` from any store.
pub async fn clean<S: BitStore + ?Sized>(
    store: &S,
    config: &RegistryConfig,
    names: &[&str],
) -> Result<u64> {
    let mut keys: Vec<String> = names.iter().map(|name| config.bit_key(name)).collect();
    keys.push(config.metadata_key.clone());

    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    Ok(store.del(&refs).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registry_with_persists() {
        let fixture = TestFixture::new();
        fixture
            .registry_with(&[("a", 64, 2), ("b", 128, 3)])
            .await
            .unwrap();

        let reopened = fixture.registry().await.unwrap();
        assert_eq!(reopened.names(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_clean_resets_store() {
        let fixture = TestFixture::new();
        let registry = fixture.single_filter(1024, 3).await.unwrap();
        registry.add_to_default(b"foo").await.unwrap();

        assert_eq!(fixture.clean(&["default"]).await.unwrap(), 2);
        assert_eq!(fixture.store.key_count(), 0);
    }
}
