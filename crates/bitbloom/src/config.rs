//! Registry configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BloomError, Result};

/// Store key of the persisted catalog.
pub const DEFAULT_METADATA_KEY: &str = "bitbloom:metadata";

/// Prefix of every filter's bit-array key.
pub const DEFAULT_FILTER_KEY_PREFIX: &str = "bitbloom:filter:";

/// Name given to the filter of a single-filter registry.
pub const DEFAULT_FILTER_NAME: &str = "default";

/// Configuration for a [`Registry`](crate::Registry).
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use bitbloom::RegistryConfig;
///
/// let config = RegistryConfig::from_json(r#"{"call_timeout_ms": 250}"#).unwrap();
/// assert_eq!(config.metadata_key, "bitbloom:metadata");
/// assert_eq!(config.call_timeout().unwrap().as_millis(), 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Key holding the metadata record.
    pub metadata_key: String,
    /// Prepended to a filter name to form its bit-array key.
    pub filter_key_prefix: String,
    /// Name used by single-filter registries.
    pub default_filter_name: String,
    /// Deadline applied to each store call, in milliseconds.
    pub call_timeout_ms: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            metadata_key: DEFAULT_METADATA_KEY.to_string(),
            filter_key_prefix: DEFAULT_FILTER_KEY_PREFIX.to_string(),
            default_filter_name: DEFAULT_FILTER_NAME.to_string(),
            call_timeout_ms: None,
        }
    }
}

impl RegistryConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BloomError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Per-call store deadline.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    /// Set the per-call store deadline.
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.set_call_timeout(timeout);
        self
    }

    /// Replace the per-call store deadline in place. Deadlines beyond
    /// `u64::MAX` milliseconds saturate.
    pub fn set_call_timeout(&mut self, timeout: Option<Duration>) {
        self.call_timeout_ms = timeout.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
    }

    /// The bit-array key of filter `name`.
    pub fn bit_key(&self, name: &str) -> String {
        format!("{}{}", self.filter_key_prefix, name)
    }

    /// Reject configurations where a bit-array key could alias the metadata key.
    pub fn validate(&self) -> Result<()> {
        if self.metadata_key.is_empty() {
            return Err(BloomError::InvalidConfig("metadata key is empty".into()));
        }
        if self.filter_key_prefix.is_empty() {
            return Err(BloomError::InvalidConfig("filter key prefix is empty".into()));
        }
        if self.metadata_key.starts_with(&self.filter_key_prefix) {
            return Err(BloomError::InvalidConfig(format!(
                "metadata key {:?} falls under filter key prefix {:?}",
                self.metadata_key, self.filter_key_prefix
            )));
        }
        Ok(())
    }
}
