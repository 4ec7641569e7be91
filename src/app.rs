//! Quote acquisition and application state
//!
//! `App` runs the fallback chain (providers, then cache, then the local quote)
//! and publishes a `QuoteState` snapshot that presentation code can watch.

use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;
use tokio::sync::watch;

use crate::cache::{CacheError, JsonFileStorage, MemoryStorage, QuoteCache, QuoteStorage};
use crate::config::Config;
use crate::data::{HttpTransport, Quote, QuoteApiClient, RaceError, MAX_RATING, MIN_RATING};
use crate::reachability::Reachability;

/// Errors surfaced by the application
#[derive(Debug, Error)]
pub enum AppError {
    /// Neither provider produced a quote
    #[error(transparent)]
    Race(#[from] RaceError),

    /// The quote cache could not be read or written
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The rating is outside 1..=5
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// There is no quote to rate
    #[error("No quote loaded yet")]
    NoCurrentQuote,
}

/// Snapshot of what presentation code needs to render
///
/// Never mutated in place; each transition returns a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteState {
    /// Last quote successfully resolved
    pub current_quote: Option<Quote>,
    /// Whether a load is in flight
    pub loading: bool,
    /// Message of the last failed load
    pub error: Option<String>,
}

impl QuoteState {
    /// A load has begun
    pub fn started(&self) -> Self {
        Self {
            current_quote: self.current_quote.clone(),
            loading: true,
            error: None,
        }
    }

    /// A load finished with `quote`
    pub fn succeeded(&self, quote: Quote) -> Self {
        Self {
            current_quote: Some(quote),
            loading: false,
            error: None,
        }
    }

    /// A load finished with an error
    pub fn failed(&self, message: String) -> Self {
        Self {
            current_quote: self.current_quote.clone(),
            loading: false,
            error: Some(message),
        }
    }

    /// The current quote was re-rated
    pub fn rated(&self, quote: Quote) -> Self {
        Self {
            current_quote: Some(quote),
            ..self.clone()
        }
    }
}

/// Main application struct wiring providers, cache and reachability together
pub struct App {
    api: QuoteApiClient,
    cache: QuoteCache,
    reachability: Arc<dyn Reachability>,
    state: watch::Sender<QuoteState>,
}

impl App {
    /// Creates an App from its collaborators
    pub fn new(api: QuoteApiClient, cache: QuoteCache, reachability: Arc<dyn Reachability>) -> Self {
        let (state, _) = watch::channel(QuoteState::default());
        Self {
            api,
            cache,
            reachability,
            state,
        }
    }

    /// Creates an App talking to the real providers with the configured cache
    pub fn from_config(config: &Config, reachability: Arc<dyn Reachability>) -> Self {
        let api = QuoteApiClient::new(
            Arc::new(HttpTransport::new()),
            &config.dummy_json_base,
            &config.zen_quotes_base,
        )
        .with_timeout(config.request_timeout);

        let cache = QuoteCache::new(open_storage(config)).with_max_entries(config.max_cached_quotes);

        Self::new(api, cache, reachability)
    }

    /// Returns a receiver that is notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<QuoteState> {
        self.state.subscribe()
    }

    /// Current state snapshot
    pub fn state(&self) -> QuoteState {
        self.state.borrow().clone()
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// The last successfully resolved quote
    pub fn current_quote(&self) -> Option<Quote> {
        self.state.borrow().current_quote.clone()
    }

    /// Loads a quote through the fallback chain and publishes the outcome
    ///
    /// `loading` is set before the first suspension point, so callers can
    /// check `is_loading` to avoid overlapping calls.
    ///
    /// # Returns
    /// * `Ok(Quote)` - From a provider, the cache, or the local fallback
    /// * `Err(AppError)` - If the last fallback step failed
    pub async fn load_random_quote(&self) -> Result<Quote, AppError> {
        self.state.send_modify(|state| *state = state.started());

        match self.quote_with_fallback().await {
            Ok(quote) => {
                self.state
                    .send_modify(|state| *state = state.succeeded(quote.clone()));
                Ok(quote)
            }
            Err(e) => {
                warn!("Failed to load quote: {}", e);
                self.state
                    .send_modify(|state| *state = state.failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn quote_with_fallback(&self) -> Result<Quote, AppError> {
        if !self.reachability.is_online() {
            info!("Offline, serving a cached quote");
            return self.fallback_to_cached().await;
        }

        match self.fetch_and_save().await {
            Ok(quote) => Ok(quote),
            Err(e) => {
                info!("Falling back to the cache: {}", e);
                self.fallback_to_cached().await
            }
        }
    }

    async fn fetch_and_save(&self) -> Result<Quote, AppError> {
        let quote = self.api.random_quote().await?;
        Ok(self.cache.save(quote).await?)
    }

    async fn fallback_to_cached(&self) -> Result<Quote, AppError> {
        match self.cache.read().await? {
            Some(quote) => Ok(quote),
            None => {
                info!("Cache is empty, using the local quote");
                Ok(self.cache.save(Quote::local_fallback()).await?)
            }
        }
    }

    /// Rates the current quote, or clears the rating if it already has `star`
    ///
    /// Publishes the re-rated quote and saves it to the cache exactly once.
    pub async fn set_rating(&self, star: u8) -> Result<Quote, AppError> {
        if !(MIN_RATING..=MAX_RATING).contains(&star) {
            return Err(AppError::InvalidRating(star));
        }

        let current = self.current_quote().ok_or(AppError::NoCurrentQuote)?;
        let rating = if current.rating == Some(star) {
            None
        } else {
            Some(star)
        };

        self.apply_rating(current.with_rating(rating)).await
    }

    /// Clears the current quote's rating
    ///
    /// Does nothing and returns `Ok(None)` when there is no quote or no rating.
    pub async fn clear_rating(&self) -> Result<Option<Quote>, AppError> {
        let Some(current) = self.current_quote().filter(|quote| quote.rating.is_some()) else {
            return Ok(None);
        };

        self.apply_rating(current.with_rating(None)).await.map(Some)
    }

    async fn apply_rating(&self, updated: Quote) -> Result<Quote, AppError> {
        self.state
            .send_modify(|state| *state = state.rated(updated.clone()));
        Ok(self.cache.save(updated).await?)
    }
}

/// Picks the storage backend the configuration asks for
fn open_storage(config: &Config) -> Arc<dyn QuoteStorage> {
    if config.ephemeral {
        return Arc::new(MemoryStorage::new());
    }

    let storage = match &config.cache_dir {
        Some(dir) => Some(JsonFileStorage::with_dir(dir, &config.store_name, config.store_version)),
        None => JsonFileStorage::new(&config.store_name, config.store_version),
    };

    match storage {
        Some(storage) => Arc::new(storage),
        None => {
            warn!("No cache directory available, quotes will not persist");
            Arc::new(MemoryStorage::new())
        }
    }
}
