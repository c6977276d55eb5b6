//! The persisted catalog of registered filters.
//!
//! Only names and `(m, k)` are stored. Hashers are stateless and store handles
//! belong to the process, so neither has a persisted form.
//!
//! Wire format (JSON):
//!
//! ```text
//! {"filters": {"<name>": {"name": "<name>", "m": <u64>, "k": <u64>}}}
//! ```

use std::collections::BTreeMap;

use bitbloom_core::FilterParams;
use bitbloom_store::MAX_BITS;
use serde::{Deserialize, Serialize};

use crate::error::{BloomError, Result};

/// Persistence-only projection of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterMeta {
    pub name: String,
    pub m: u64,
    pub k: u64,
}

impl FilterMeta {
    /// The validated parameters, bounded by what a store can address.
    pub fn params(&self) -> bitbloom_core::Result<FilterParams> {
        FilterParams::new(self.m, self.k)?.within(MAX_BITS)
    }
}

/// The metadata record: filter name to its parameters.
///
/// Ordered so that the same catalog always encodes to the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub filters: BTreeMap<String, FilterMeta>,
}

impl Catalog {
    /// Number of filters in the record.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the record lists no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Serialize to the stored form.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| BloomError::MetadataEncode(e.to_string()))
    }

    /// Parse and check a stored record.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let catalog: Catalog =
            serde_json::from_slice(raw).map_err(|e| BloomError::MetadataDecode(e.to_string()))?;

        for (key, meta) in &catalog.filters {
            if *key != meta.name {
                return Err(BloomError::MetadataDecode(format!(
                    "entry {:?} carries mismatched name {:?}",
                    key, meta.name
                )));
            }
            if let Err(e) = meta.params() {
                return Err(BloomError::MetadataDecode(format!("filter {:?}: {}", key, e)));
            }
        }

        Ok(catalog)
    }
}

impl FromIterator<FilterMeta> for Catalog {
    fn from_iter<I: IntoIterator<Item = FilterMeta>>(iter: I) -> Self {
        Self {
            filters: iter
                .into_iter()
                .map(|meta| (meta.name.clone(), meta))
                .collect(),
        }
    }
}
