//! Proptest generators for property-based testing.

use proptest::prelude::*;

use bitbloom::FilterMeta;
use bitbloom_core::FilterParams;

/// Arbitrary value bytes up to `max_len`.
pub fn value(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Between one and `max_count` values.
pub fn values(max_count: usize, max_len: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(value(max_len), 1..=max_count.max(1))
}

/// A filter name.
pub fn filter_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,23}".prop_map(String::from)
}

/// Valid parameters small enough to keep in-memory bitmaps cheap.
pub fn filter_params() -> impl Strategy<Value = FilterParams> {
    (1u64..=1 << 16, 1u64..=32)
        .prop_filter_map("non-zero parameters", |(m, k)| FilterParams::new(m, k).ok())
}

/// Parameters across the full addressable range of a store.
pub fn wide_filter_params() -> impl Strategy<Value = FilterParams> {
    (1u64..=bitbloom_store::MAX_BITS, 1u64..=64)
        .prop_filter_map("non-zero parameters", |(m, k)| FilterParams::new(m, k).ok())
}

/// A catalog worth of distinct filter entries.
pub fn catalog_entries(max: usize) -> impl Strategy<Value = Vec<FilterMeta>> {
    prop::collection::btree_map(filter_name(), filter_params(), 0..=max).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(name, params)| FilterMeta {
                name,
                m: params.m(),
                k: params.k(),
            })
            .collect()
    })
}
