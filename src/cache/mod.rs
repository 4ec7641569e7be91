//! Cache module for keeping previously fetched quotes on disk
//!
//! This module provides a bounded, append-only quote cache on top of a small
//! storage abstraction. The cache stops accepting records once full and serves
//! a random stored quote when the providers are out of reach.

mod manager;
pub mod storage;
#[cfg(test)]
pub(crate) mod testing;

pub use manager::{CacheError, QuoteCache, MAX_CACHED_QUOTES};
pub use storage::{JsonFileStorage, MemoryStorage, QuoteStorage, StorageError};
