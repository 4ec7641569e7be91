//! Durable record store behind the quote cache
//!
//! A store is addressed by a `(name, version)` pair and offers three
//! all-or-nothing operations: count, append with an auto-assigned id, and
//! read-all. `JsonFileStorage` keeps the records as a single JSON document in
//! the XDG cache directory (`~/.cache/quotebox/` on Linux); `MemoryStorage`
//! keeps them for the lifetime of the process only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::data::Quote;

/// Errors raised by a storage transaction
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a valid store
    #[error("Store at {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The store could not be encoded for writing
    #[error("Failed to encode store: {0}")]
    Encode(serde_json::Error),

    /// A previous transaction panicked while holding the store
    #[error("Store is unavailable")]
    Poisoned,
}

/// A quote as persisted, with its store-assigned key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedQuote {
    /// Monotonically increasing persistence key
    pub id: u64,
    /// The stored quote
    #[serde(flatten)]
    pub quote: Quote,
    /// When the record was written
    pub saved_at: DateTime<Utc>,
}

impl CachedQuote {
    /// Drops the persistence metadata and returns the plain quote
    pub fn into_quote(self) -> Quote {
        self.quote
    }
}

/// On-disk layout of a store
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreDocument {
    next_id: u64,
    records: Vec<CachedQuote>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

impl StoreDocument {
    fn append(&mut self, quote: &Quote) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(CachedQuote {
            id,
            quote: quote.clone(),
            saved_at: Utc::now(),
        });
        id
    }
}

/// Persistent storage collaborator used by [`QuoteCache`](super::QuoteCache)
#[async_trait]
pub trait QuoteStorage: Send + Sync {
    /// Number of stored records
    async fn count(&self) -> Result<usize, StorageError>;

    /// Stores `quote` as a new record and returns its id
    async fn append(&self, quote: &Quote) -> Result<u64, StorageError>;

    /// Every stored record, oldest first
    async fn read_all(&self) -> Result<Vec<CachedQuote>, StorageError>;
}

/// Store kept as one JSON file per `(name, version)`
///
/// The file is created by the first append; reads before that see an empty
/// store and touch nothing on disk. Writes go to a sibling temp file which is
/// then renamed over the store, so a failed write leaves the previous contents
/// intact.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    /// Serialises transactions within this process
    lock: tokio::sync::Mutex<()>,
}

impl JsonFileStorage {
    /// Opens the store `name`/`version` in the XDG cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new(name: &str, version: u32) -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "quotebox")?;
        Some(Self::with_dir(project_dirs.cache_dir(), name, version))
    }

    /// Opens the store `name`/`version` inside `dir`
    pub fn with_dir(dir: &Path, name: &str, version: u32) -> Self {
        Self {
            path: dir.join(format!("{}-v{}.json", name, version)),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document; a missing file reads as an empty store
    async fn load(&self) -> Result<StoreDocument, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
                    path: self.path.display().to_string(),
                    source,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomically replaces the store with `document`
    async fn commit(&self, document: &StoreDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(document).map_err(StorageError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl QuoteStorage for JsonFileStorage {
    async fn count(&self) -> Result<usize, StorageError> {
        let _tx = self.lock.lock().await;
        Ok(self.load().await?.records.len())
    }

    async fn append(&self, quote: &Quote) -> Result<u64, StorageError> {
        let _tx = self.lock.lock().await;
        let mut document = self.load().await?;
        let id = document.append(quote);
        self.commit(&document).await?;
        Ok(id)
    }

    async fn read_all(&self) -> Result<Vec<CachedQuote>, StorageError> {
        let _tx = self.lock.lock().await;
        Ok(self.load().await?.records)
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<StoreDocument>,
}

impl MemoryStorage {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn with_document<T>(&self, f: impl FnOnce(&mut StoreDocument) -> T) -> Result<T, StorageError> {
        let mut document = self.document.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(f(&mut document))
    }
}

#[async_trait]
impl QuoteStorage for MemoryStorage {
    async fn count(&self) -> Result<usize, StorageError> {
        self.with_document(|document| document.records.len())
    }

    async fn append(&self, quote: &Quote) -> Result<u64, StorageError> {
        self.with_document(|document| document.append(quote))
    }

    async fn read_all(&self) -> Result<Vec<CachedQuote>, StorageError> {
        self.with_document(|document| document.records.clone())
    }
}
