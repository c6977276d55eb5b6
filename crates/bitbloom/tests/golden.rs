//! Golden vectors checked end to end: the bits a registry writes must be
//! exactly the offsets every other implementation derives.

use std::collections::BTreeSet;
use std::sync::Arc;

use bitbloom::store::{BitStore, MemoryBitStore};
use bitbloom::Registry;
use bitbloom_testkit::{all_vectors, verify_all_vectors};

#[test]
fn all_golden_vectors_pass() {
    for (name, passed) in verify_all_vectors() {
        assert!(passed, "golden vector {name} failed");
    }
}

#[tokio::test]
async fn registry_writes_exactly_the_golden_bits() {
    for vector in all_vectors() {
        let store = Arc::new(MemoryBitStore::new());
        let registry = Registry::new_single_filter(Arc::clone(&store), vector.m, vector.k)
            .await
            .unwrap();
        registry.add_to_default(vector.value).await.unwrap();

        let key = registry.bit_key(registry.default_filter().unwrap().name());
        for &offset in vector.offsets {
            assert!(
                store.get_bit(&key, offset).await.unwrap(),
                "{}: offset {offset} unset",
                vector.name
            );
        }

        let raw = store.get(&key).await.unwrap().unwrap();
        let set_bits: u32 = raw.iter().map(|b| b.count_ones()).sum();
        let distinct: BTreeSet<u64> = vector.offsets.iter().copied().collect();
        assert_eq!(set_bits as usize, distinct.len(), "{}", vector.name);
    }
}
