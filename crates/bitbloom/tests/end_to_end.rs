//! End-to-end behaviour of a registry over an in-memory store.

use bitbloom::{BloomError, Registry, DEFAULT_FILTER_NAME};
use bitbloom_testkit::fixtures::{REFERENCE_K, REFERENCE_M};
use bitbloom_testkit::TestFixture;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

#[tokio::test]
async fn single_filter_add_and_test() {
    init_tracing();
    let fixture = TestFixture::new();
    let registry = fixture.single_filter(REFERENCE_M, REFERENCE_K).await.unwrap();

    registry.add_to_default(b"foo").await.unwrap();
    assert!(registry.test_to_default(b"foo").await.unwrap());
    assert!(!registry.test_to_default(b"baz").await.unwrap());

    let err = registry.add("unknown", b"foo").await.unwrap_err();
    assert!(matches!(&err, BloomError::FilterNotFound(name) if name == "unknown"));
    assert_eq!(err.to_string(), "filter [unknown] doesn't exist");

    let err = registry.test("unknown", b"foo").await.unwrap_err();
    assert!(matches!(err, BloomError::FilterNotFound(_)));

    registry
        .add_multi(DEFAULT_FILTER_NAME, &[b"multi1", b"multi2"])
        .await
        .unwrap();
    assert!(registry.test(DEFAULT_FILTER_NAME, b"multi1").await.unwrap());
    assert!(registry.test(DEFAULT_FILTER_NAME, b"multi2").await.unwrap());
}

#[tokio::test]
async fn filter_not_found_names_the_filter() {
    let fixture = TestFixture::new();
    let registry = fixture.registry().await.unwrap();

    let err = registry.test("unregistered", b"v").await.unwrap_err();
    assert!(err.to_string().contains("unregistered"));

    let err = registry
        .test_multi("unregistered", &[b"a", b"b"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unregistered"));

    let err = registry
        .add_multi("unregistered", &[b"a"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unregistered"));
}

#[tokio::test]
async fn catalog_round_trip_across_registries() {
    init_tracing();
    let fixture = TestFixture::new();

    let first = fixture
        .registry_with(&[("a", 335477044, 23), ("b", 1 << 20, 7)])
        .await
        .unwrap();
    first.add("a", b"foo").await.unwrap();
    first.add("b", b"bar").await.unwrap();

    let mut second = Registry::new(fixture.store.clone()).await.unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second.catalog(), first.catalog());
    assert!(second.test("a", b"foo").await.unwrap());
    assert!(second.test("b", b"bar").await.unwrap());
    assert!(matches!(
        second.test("unknown", b"foo").await,
        Err(BloomError::FilterNotFound(_))
    ));

    assert_eq!(second.init().await.unwrap(), 2);
}

#[tokio::test]
async fn filters_do_not_share_bits() {
    let fixture = TestFixture::new();
    let registry = fixture
        .registry_with(&[("left", 1 << 16, 5), ("right", 1 << 16, 5)])
        .await
        .unwrap();

    registry.add("left", b"only-left").await.unwrap();
    assert!(registry.test("left", b"only-left").await.unwrap());
    assert!(!registry.test("right", b"only-left").await.unwrap());
}

#[tokio::test]
async fn test_multi_is_conjunctive() {
    let fixture = TestFixture::new();
    let registry = fixture.single_filter(1 << 20, 7).await.unwrap();

    registry.add_to_default(b"v1").await.unwrap();
    assert!(!registry
        .test_multi(DEFAULT_FILTER_NAME, &[b"v1", b"v2"])
        .await
        .unwrap());

    registry.add_to_default(b"v2").await.unwrap();
    assert!(registry
        .test_multi(DEFAULT_FILTER_NAME, &[b"v1", b"v2"])
        .await
        .unwrap());
}

#[tokio::test]
async fn single_filter_refuses_existing_catalog() {
    let fixture = TestFixture::new();
    fixture.single_filter(1024, 3).await.unwrap();

    let err = fixture.single_filter(1024, 3).await.err().unwrap();
    assert!(matches!(err, BloomError::FiltersAlreadyRegistered(1)));
}

#[tokio::test]
async fn clean_returns_store_to_uninitialized() {
    let fixture = TestFixture::new();
    let registry = fixture.single_filter(1024, 3).await.unwrap();
    registry.add_to_default(b"foo").await.unwrap();
    fixture.clean(&[DEFAULT_FILTER_NAME]).await.unwrap();

    let fresh = fixture.single_filter(1024, 3).await.unwrap();
    assert!(!fresh.test_to_default(b"foo").await.unwrap());
}
