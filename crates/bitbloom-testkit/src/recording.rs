//! An instrumented store for asserting on command traffic.
//!
//! Wraps any [`BitStore`], counts the commands that pass through it and can
//! be switched into failing or stalling so error paths are reachable in tests.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use bitbloom_store::{BitBatch, BitStore, MemoryBitStore, Result, StoreError};

/// Command counters, shared between clones of a [`RecordingStore`].
#[derive(Debug, Default)]
pub struct StoreCounters {
    /// Batches submitted.
    pub batches: AtomicUsize,
    /// Individual SETBIT commands across all batches.
    pub set_bits: AtomicUsize,
    /// GETBIT commands.
    pub get_bits: AtomicUsize,
    /// Whole-value reads.
    pub gets: AtomicUsize,
    /// Whole-value writes, conditional or not.
    pub sets: AtomicUsize,
}

impl StoreCounters {
    fn bump(counter: &AtomicUsize, by: usize) {
        counter.fetch_add(by, Ordering::SeqCst);
    }

    /// Snapshot of `(batches, set_bits, get_bits)`.
    pub fn bit_traffic(&self) -> (usize, usize, usize) {
        (
            self.batches.load(Ordering::SeqCst),
            self.set_bits.load(Ordering::SeqCst),
            self.get_bits.load(Ordering::SeqCst),
        )
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for counter in [&self.batches, &self.set_bits, &self.get_bits, &self.gets, &self.sets] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

/// A [`BitStore`] wrapper that records traffic and injects faults.
pub struct RecordingStore<S = MemoryBitStore> {
    inner: S,
    counters: Arc<StoreCounters>,
    fail_batches: AtomicBool,
    fail_reads: AtomicBool,
    stall_ms: AtomicU64,
}

impl RecordingStore<MemoryBitStore> {
    /// Record traffic to a fresh in-memory store.
    pub fn memory() -> Self {
        Self::new(MemoryBitStore::new())
    }
}

impl<S: BitStore> RecordingStore<S> {
    /// Wrap a store.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counters: Arc::new(StoreCounters::default()),
            fail_batches: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            stall_ms: AtomicU64::new(0),
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Shared command counters.
    pub fn counters(&self) -> Arc<StoreCounters> {
        Arc::clone(&self.counters)
    }

    /// Reject every batch without applying any of it.
    pub fn fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    /// Fail every GETBIT and GET.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Delay every command by `stall`, to trip call deadlines.
    pub fn stall(&self, stall: Option<Duration>) {
        let ms = stall.map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self.stall_ms.store(ms, Ordering::SeqCst);
    }

    async fn maybe_stall(&self) {
        let ms = self.stall_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: BitStore> BitStore for RecordingStore<S> {
    async fn exec_batch(&self, batch: &BitBatch) -> Result<()> {
        self.maybe_stall().await;
        StoreCounters::bump(&self.counters.batches, 1);
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected batch failure".into()));
        }
        StoreCounters::bump(&self.counters.set_bits, batch.len());
        self.inner.exec_batch(batch).await
    }

    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool> {
        self.maybe_stall().await;
        StoreCounters::bump(&self.counters.get_bits, 1);
        self.check_reads()?;
        self.inner.get_bit(key, offset).await
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.maybe_stall().await;
        StoreCounters::bump(&self.counters.gets, 1);
        self.check_reads()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.maybe_stall().await;
        StoreCounters::bump(&self.counters.sets, 1);
        self.inner.set(key, value).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool> {
        self.maybe_stall().await;
        StoreCounters::bump(&self.counters.sets, 1);
        self.inner.compare_and_set(key, expected, value).await
    }

    async fn del(&self, keys: &[&str]) -> Result<u64> {
        self.maybe_stall().await;
        self.inner.del(keys).await
    }
}
