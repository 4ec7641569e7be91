//! Instrumented storage for cache and app tests

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::storage::{CachedQuote, MemoryStorage, QuoteStorage, StorageError};
use crate::data::Quote;

/// In-memory storage that counts write transactions and can be told to fail
#[derive(Debug, Default)]
pub(crate) struct CountingStorage {
    inner: MemoryStorage,
    appends: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl CountingStorage {
    /// Storage pre-filled with `quotes`, with the seeding writes not counted
    pub(crate) async fn seeded(quotes: &[Quote]) -> Self {
        let storage = Self::default();
        for quote in quotes {
            storage.inner.append(quote).await.expect("seed append");
        }
        storage
    }

    /// Number of write transactions opened since construction
    pub(crate) fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Quotes currently stored, without ids
    pub(crate) async fn quotes(&self) -> Vec<Quote> {
        self.inner
            .read_all()
            .await
            .expect("read_all")
            .into_iter()
            .map(CachedQuote::into_quote)
            .collect()
    }

    fn injected(&self, flag: &AtomicBool) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::Other,
                "injected failure",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl QuoteStorage for CountingStorage {
    async fn count(&self) -> Result<usize, StorageError> {
        self.injected(&self.fail_reads)?;
        self.inner.count().await
    }

    async fn append(&self, quote: &Quote) -> Result<u64, StorageError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.injected(&self.fail_writes)?;
        self.inner.append(quote).await
    }

    async fn read_all(&self) -> Result<Vec<CachedQuote>, StorageError> {
        self.injected(&self.fail_reads)?;
        self.inner.read_all().await
    }
}
