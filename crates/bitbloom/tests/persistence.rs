//! Registries over the SQLite store, across process-like reopens.

use std::time::{Duration, Instant};

use bitbloom::store::SqliteBitStore;
use bitbloom::{BloomError, Registry, RegistryConfig};
use bitbloom_testkit::fixtures::{REFERENCE_K, REFERENCE_M};

#[tokio::test]
async fn filters_and_bits_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bloom.db");

    {
        let store = SqliteBitStore::open(&path).unwrap();
        let mut registry = Registry::new(store).await.unwrap();
        registry.register("emails", 1 << 20, 7).unwrap();
        registry.register("ids", 4096, 3).unwrap();
        registry.save().await.unwrap();

        registry.add("emails", b"alice@example.com").await.unwrap();
        registry
            .add_multi("ids", &[b"1001", b"1002", b"1003"])
            .await
            .unwrap();
    }

    let store = SqliteBitStore::open(&path).unwrap();
    let registry = Registry::new(store).await.unwrap();
    assert_eq!(registry.names(), vec!["emails", "ids"]);
    assert_eq!(registry.filter("emails").unwrap().params().m(), 1 << 20);
    assert_eq!(registry.filter("ids").unwrap().params().k(), 3);

    assert!(registry.test("emails", b"alice@example.com").await.unwrap());
    assert!(!registry.test("emails", b"bob@example.com").await.unwrap());
    assert!(registry
        .test_multi("ids", &[b"1001", b"1002", b"1003"])
        .await
        .unwrap());
}

#[tokio::test]
async fn checked_save_detects_a_concurrent_writer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bloom.db");

    let mut first = Registry::new(SqliteBitStore::open(&path).unwrap())
        .await
        .unwrap();
    let mut second = Registry::new(SqliteBitStore::open(&path).unwrap())
        .await
        .unwrap();

    first.register("a", 1024, 3).unwrap();
    first.save_checked().await.unwrap();

    second.register("b", 1024, 3).unwrap();
    assert!(matches!(
        second.save_checked().await,
        Err(BloomError::MetadataConflict)
    ));

    second.init().await.unwrap();
    second.register("b", 1024, 3).unwrap();
    second.save_checked().await.unwrap();

    first.init().await.unwrap();
    assert_eq!(first.names(), vec!["a", "b"]);
}

#[tokio::test]
async fn custom_keys_partition_one_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bloom.db");

    let tenant = |name: &str| RegistryConfig {
        metadata_key: format!("{name}:metadata"),
        filter_key_prefix: format!("{name}:filter:"),
        ..RegistryConfig::default()
    };

    let left = Registry::single_filter_with_config(
        SqliteBitStore::open(&path).unwrap(),
        tenant("left"),
        4096,
        4,
    )
    .await
    .unwrap();
    let right = Registry::single_filter_with_config(
        SqliteBitStore::open(&path).unwrap(),
        tenant("right"),
        4096,
        4,
    )
    .await
    .unwrap();

    left.add_to_default(b"shared").await.unwrap();
    assert!(left.test_to_default(b"shared").await.unwrap());
    assert!(!right.test_to_default(b"shared").await.unwrap());
}

#[tokio::test]
async fn reference_size_bit_traffic_does_not_scale_with_m() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bloom.db");
    let values: Vec<String> = (0..50).map(|i| format!("value-{i}")).collect();

    {
        let store = SqliteBitStore::open(&path).unwrap();
        let registry = Registry::new_single_filter(store, REFERENCE_M, REFERENCE_K)
            .await
            .unwrap();
        // The first write sizes the bitmap; time only what follows it.
        registry.add_to_default(b"warm-up").await.unwrap();

        let started = Instant::now();
        for value in &values {
            registry.add_to_default(value.as_bytes()).await.unwrap();
        }
        for value in &values {
            assert!(registry.test_to_default(value.as_bytes()).await.unwrap());
        }
        // 50 adds and 1150 reads against a 42 MB bitmap.
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "bit traffic took {:?}",
            started.elapsed()
        );
    }

    let registry = Registry::new(SqliteBitStore::open(&path).unwrap())
        .await
        .unwrap();
    assert_eq!(registry.default_filter().unwrap().params().m(), REFERENCE_M);
    assert!(registry.test_to_default(b"warm-up").await.unwrap());
    for value in &values {
        assert!(registry.test_to_default(value.as_bytes()).await.unwrap());
    }
    assert!(!registry.test_to_default(b"never-added").await.unwrap());
}
