//! The Registry: named filters over one store, with a persisted catalog.
//!
//! The registry owns the name → [`Filter`] map, keeps it in step with the
//! metadata record in the store and routes by-name calls to the right filter
//! and bit-array key.
//!
//! Catalog lifecycle:
//!
//! ```text
//! Uninitialized ──new/init + save──▶ Loaded(empty) ──register + save──▶ Loaded(populated)
//! ```
//!
//! A later process reaches `Loaded(populated)` directly through `init`.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use bitbloom_core::FilterParams;
use bitbloom_store::{BitStore, StoreError, MAX_BITS};
use bytes::Bytes;

use crate::config::RegistryConfig;
use crate::error::{BloomError, Result};
use crate::filter::Filter;
use crate::metadata::Catalog;

/// Named Bloom filters sharing one store.
pub struct Registry<S: BitStore> {
    /// The store holding bit arrays and the metadata record.
    store: S,
    /// Configuration.
    config: RegistryConfig,
    /// The in-memory catalog.
    filters: HashMap<String, Filter>,
    /// Metadata bytes as last loaded or saved, for conflict-checked saves.
    snapshot: Option<Bytes>,
}

impl<S: BitStore> Registry<S> {
    /// Open the registry with the default configuration.
    ///
    /// Loads the catalog if one is stored; otherwise persists an empty one so
    /// later loads see an initialized, empty registry.
    pub async fn new(store: S) -> Result<Self> {
        Self::with_config(store, RegistryConfig::default()).await
    }

    /// Open the registry with an explicit configuration.
    pub async fn with_config(store: S, config: RegistryConfig) -> Result<Self> {
        config.validate()?;

        let mut registry = Self {
            store,
            config,
            filters: HashMap::new(),
            snapshot: None,
        };

        registry.init().await?;
        if registry.snapshot.is_none() {
            registry.save().await?;
        }
        Ok(registry)
    }

    /// Open a registry holding exactly one filter under the default name.
    ///
    /// Fails if the stored catalog already lists any filter.
    pub async fn new_single_filter(store: S, m: u64, k: u64) -> Result<Self> {
        Self::single_filter_with_config(store, RegistryConfig::default(), m, k).await
    }

    /// [`new_single_filter`](Self::new_single_filter) with an explicit configuration.
    pub async fn single_filter_with_config(
        store: S,
        config: RegistryConfig,
        m: u64,
        k: u64,
    ) -> Result<Self> {
        let mut registry = Self::with_config(store, config).await?;
        if !registry.filters.is_empty() {
            return Err(BloomError::FiltersAlreadyRegistered(registry.filters.len()));
        }

        let name = registry.config.default_filter_name.clone();
        registry.register(&name, m, k)?;
        registry.save().await?;
        Ok(registry)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the stored catalog, replacing the in-memory one.
    ///
    /// Returns the number of filters loaded; `0` with no error when nothing
    /// has been stored yet.
    pub async fn init(&mut self) -> Result<usize> {
        let key = self.config.metadata_key.clone();
        let Some(raw) = self.call(self.store.get(&key)).await? else {
            tracing::debug!(key = %key, "no stored catalog");
            return Ok(0);
        };

        let catalog = Catalog::decode(&raw)?;
        let mut filters = HashMap::with_capacity(catalog.len());
        for (name, meta) in catalog.filters {
            let params = meta
                .params()
                .map_err(|e| BloomError::MetadataDecode(e.to_string()))?;
            filters.insert(name.clone(), Filter::new(name, params));
        }

        self.filters = filters;
        self.snapshot = Some(raw);
        tracing::debug!(key = %key, filters = self.filters.len(), "loaded catalog");
        Ok(self.filters.len())
    }

    /// Overwrite the stored catalog with the in-memory one.
    ///
    /// Last writer wins: a concurrent save from another process is silently
    /// replaced. Use [`save_checked`](Self::save_checked) to detect that.
    pub async fn save(&mut self) -> Result<()> {
        let raw = self.catalog().encode()?;
        let key = self.config.metadata_key.clone();

        self.call(self.store.set(&key, &raw)).await?;

        tracing::debug!(key = %key, filters = self.filters.len(), bytes = raw.len(), "saved catalog");
        self.snapshot = Some(Bytes::from(raw));
        Ok(())
    }

    /// Save only if the stored record is unchanged since this registry last
    /// loaded or saved it; otherwise fail with [`BloomError::MetadataConflict`].
    pub async fn save_checked(&mut self) -> Result<()> {
        let raw = self.catalog().encode()?;
        let key = self.config.metadata_key.clone();
        let expected = self.snapshot.clone();

        let written = self
            .call(self.store.compare_and_set(&key, expected.as_deref(), &raw))
            .await?;
        if !written {
            return Err(BloomError::MetadataConflict);
        }

        tracing::debug!(key = %key, filters = self.filters.len(), "saved catalog (checked)");
        self.snapshot = Some(Bytes::from(raw));
        Ok(())
    }

    /// The persistence projection of the in-memory catalog.
    pub fn catalog(&self) -> Catalog {
        self.filters.values().map(Filter::meta).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a new filter in memory. Call [`save`](Self::save) to persist it.
    pub fn register(&mut self, name: &str, m: u64, k: u64) -> Result<&Filter> {
        if self.filters.contains_key(name) {
            return Err(BloomError::FilterExists(name.to_string()));
        }
        let params = FilterParams::new(m, k)?.within(MAX_BITS)?;

        tracing::debug!(filter = name, m, k, "registered filter");
        let filter = self
            .filters
            .entry(name.to_string())
            .or_insert_with(|| Filter::new(name, params));
        Ok(&*filter)
    }

    /// Drop a filter from the in-memory catalog, leaving its bits in place.
    pub fn remove(&mut self, name: &str) -> Option<Filter> {
        self.filters.remove(name)
    }

    /// Drop a filter from the catalog and delete its bit array.
    pub async fn purge(&mut self, name: &str) -> Result<Filter> {
        if !self.filters.contains_key(name) {
            return Err(BloomError::FilterNotFound(name.to_string()));
        }

        let key = self.config.bit_key(name);
        self.call(self.store.del(&[key.as_str()])).await?;

        tracing::debug!(filter = name, key = %key, "purged filter");
        self.filters
            .remove(name)
            .ok_or_else(|| BloomError::FilterNotFound(name.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filter Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a value to the named filter.
    pub async fn add(&self, name: &str, value: &[u8]) -> Result<()> {
        self.add_multi(name, &[value]).await
    }

    /// Add several values to the named filter in one atomic batch.
    pub async fn add_multi<V>(&self, name: &str, values: &[V]) -> Result<()>
    where
        V: AsRef<[u8]> + Sync,
    {
        let filter = self.lookup(name)?;
        let key = self.config.bit_key(name);
        self.call(filter.add_multi(&self.store, &key, values)).await
    }

    /// Test whether a value may be in the named filter.
    pub async fn test(&self, name: &str, value: &[u8]) -> Result<bool> {
        self.test_multi(name, &[value]).await
    }

    /// Test whether every value may be in the named filter.
    pub async fn test_multi<V>(&self, name: &str, values: &[V]) -> Result<bool>
    where
        V: AsRef<[u8]> + Sync,
    {
        let filter = self.lookup(name)?;
        let key = self.config.bit_key(name);
        self.call(filter.test_multi(&self.store, &key, values)).await
    }

    /// Add a value to the sole registered filter.
    pub async fn add_to_default(&self, value: &[u8]) -> Result<()> {
        let name = self.default_filter()?.name().to_string();
        self.add(&name, value).await
    }

    /// Test a value against the sole registered filter.
    pub async fn test_to_default(&self, value: &[u8]) -> Result<bool> {
        let name = self.default_filter()?.name().to_string();
        self.test(&name, value).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The filter used by default-filter calls: the only one registered.
    pub fn default_filter(&self) -> Result<&Filter> {
        let mut filters = self.filters.values();
        match (filters.next(), filters.next()) {
            (Some(filter), None) => Ok(filter),
            _ => Err(BloomError::AmbiguousDefault {
                count: self.filters.len(),
            }),
        }
    }

    /// Look up a filter by name.
    pub fn filter(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// The bit-array key of filter `name`.
    pub fn bit_key(&self, name: &str) -> String {
        self.config.bit_key(name)
    }

    /// The store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Change the per-call store deadline.
    pub fn set_call_timeout(&mut self, timeout: Option<Duration>) {
        self.config.set_call_timeout(timeout);
    }

    fn lookup(&self, name: &str) -> Result<&Filter> {
        self.filters
            .get(name)
            .ok_or_else(|| BloomError::FilterNotFound(name.to_string()))
    }

    /// Run a store call under the configured deadline.
    async fn call<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = bitbloom_store::Result<T>>,
    {
        let result = match self.config.call_timeout() {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => fut.await,
        };
        result.map_err(BloomError::from)
    }
}
