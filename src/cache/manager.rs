//! Bounded quote cache
//!
//! Provides a `QuoteCache` that appends every saved quote as a new record until
//! a fixed cap is reached and hands back a random stored quote on request.

use std::fmt;
use std::sync::Arc;

use log::debug;
use rand::Rng;
use thiserror::Error;
use tokio::sync::Mutex;

use super::storage::{QuoteStorage, StorageError};
use crate::data::Quote;

/// Default maximum number of cached quotes
pub const MAX_CACHED_QUOTES: usize = 200;

/// Errors surfaced by the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying storage transaction failed
    #[error("Quote cache unavailable: {0}")]
    Storage(#[from] StorageError),
}

type IndexPicker = Box<dyn Fn(usize) -> usize + Send + Sync>;

/// Capped, append-only store of previously seen quotes
///
/// Once the store holds `max_entries` records further saves are dropped
/// silently: nothing is evicted and the caller is not told.
pub struct QuoteCache {
    storage: Arc<dyn QuoteStorage>,
    max_entries: usize,
    picker: IndexPicker,
    /// Held across the cap check and the append
    save_lock: Mutex<()>,
}

impl fmt::Debug for QuoteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteCache")
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

impl QuoteCache {
    /// Creates a cache over `storage` with the default cap and a uniform random picker
    pub fn new(storage: Arc<dyn QuoteStorage>) -> Self {
        Self {
            storage,
            max_entries: MAX_CACHED_QUOTES,
            picker: Box::new(random_index),
            save_lock: Mutex::new(()),
        }
    }

    /// Overrides the maximum number of stored records
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Replaces the random index picker
    ///
    /// The picker receives the number of records (always at least one) and
    /// returns the index to hand out; out-of-range answers are clamped.
    pub fn with_picker(mut self, picker: impl Fn(usize) -> usize + Send + Sync + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    /// Maximum number of records this cache accepts
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Stores `quote` as a new record if the cache is below its cap
    ///
    /// The count is checked before any write is started, and concurrent saves
    /// take turns so the cap holds. Either way the quote is handed back
    /// unchanged.
    ///
    /// # Returns
    /// * `Ok(Quote)` - The same quote, whether or not it was written
    /// * `Err(CacheError)` - If counting or writing fails
    pub async fn save(&self, quote: Quote) -> Result<Quote, CacheError> {
        let _guard = self.save_lock.lock().await;
        let count = self.storage.count().await?;
        if count >= self.max_entries {
            debug!("Quote cache full ({} entries), not saving", count);
            return Ok(quote);
        }

        let id = self.storage.append(&quote).await?;
        debug!("Cached quote #{} by {}", id, quote.author);
        Ok(quote)
    }

    /// Returns one stored quote chosen at random
    ///
    /// # Returns
    /// * `Ok(Some(Quote))` - A stored quote, without its persistence key
    /// * `Ok(None)` - If the cache is empty
    /// * `Err(CacheError)` - If reading fails
    pub async fn read(&self) -> Result<Option<Quote>, CacheError> {
        let mut records = self.storage.read_all().await?;
        if records.is_empty() {
            return Ok(None);
        }

        let index = (self.picker)(records.len()).min(records.len() - 1);
        let record = records.swap_remove(index);
        debug!("Serving cached quote #{} saved at {}", record.id, record.saved_at);
        Ok(Some(record.into_quote()))
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<usize, CacheError> {
        Ok(self.storage.count().await?)
    }
}

fn random_index(len: usize) -> usize {
    rand::rng().random_range(0..len)
}
