//! Provider race client
//!
//! Asks DummyJSON and ZenQuotes for a random quote at the same time and hands
//! back whichever produces a usable quote first. A provider that errors or comes
//! back empty is dropped silently so the other one still gets its chance; only
//! when both drop out does the race fail.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{self, Either};
use log::{debug, info, warn};
use thiserror::Error;
use tokio::task::JoinError;

use super::transport::{AbortController, AbortSignal, Transport, TransportError};
use super::{dummy_json, zen_quotes, Quote};

/// Errors surfaced by the race as a whole
#[derive(Debug, Error)]
pub enum RaceError {
    /// Neither provider produced a quote
    #[error("Both quote providers failed")]
    BothProvidersFailed,
}

/// Why a single provider dropped out of the race
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request itself failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body did not have the expected shape
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The provider had no quotes to offer
    #[error("Provider returned no quotes")]
    Empty,

    /// The per-provider time limit ran out
    #[error("No response within {0:?}")]
    TimedOut(Duration),
}

/// The two upstream quote providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    DummyJson,
    ZenQuotes,
}

impl Provider {
    fn parse(self, body: &str) -> Result<Quote, ProviderError> {
        match self {
            Provider::DummyJson => Ok(dummy_json::parse_random(body)?),
            Provider::ZenQuotes => zen_quotes::parse_random(body)?.ok_or(ProviderError::Empty),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::DummyJson => write!(f, "dummyjson"),
            Provider::ZenQuotes => write!(f, "zenquotes"),
        }
    }
}

/// Client that races both providers for a single random quote
#[derive(Clone)]
pub struct QuoteApiClient {
    transport: Arc<dyn Transport>,
    dummy_json_url: String,
    zen_quotes_url: String,
    timeout: Option<Duration>,
}

impl fmt::Debug for QuoteApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteApiClient")
            .field("dummy_json_url", &self.dummy_json_url)
            .field("zen_quotes_url", &self.zen_quotes_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl QuoteApiClient {
    /// Creates a client for the given provider base URLs
    pub fn new(transport: Arc<dyn Transport>, dummy_json_base: &str, zen_quotes_base: &str) -> Self {
        Self {
            transport,
            dummy_json_url: dummy_json::random_url(dummy_json_base),
            zen_quotes_url: zen_quotes::random_url(zen_quotes_base),
            timeout: None,
        }
    }

    /// Gives up on a provider that has not answered within `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches one random quote from whichever provider answers first
    ///
    /// # Returns
    /// * `Ok(Quote)` - The first normalized quote to arrive; the other request is aborted
    /// * `Err(RaceError::BothProvidersFailed)` - If both providers failed or came back empty
    pub async fn random_quote(&self) -> Result<Quote, RaceError> {
        let controller = AbortController::new();

        let dummy = tokio::spawn(fetch_provider(
            Provider::DummyJson,
            self.transport.clone(),
            self.dummy_json_url.clone(),
            controller.signal(),
            self.timeout,
        ));
        let zen = tokio::spawn(fetch_provider(
            Provider::ZenQuotes,
            self.transport.clone(),
            self.zen_quotes_url.clone(),
            controller.signal(),
            self.timeout,
        ));

        let (first, rest) = match future::select(dummy, zen).await {
            Either::Left(pair) | Either::Right(pair) => pair,
        };

        if let Some((provider, quote)) = settled(first) {
            // The loser's handle is dropped with `rest`, so a late answer is never read.
            controller.abort();
            info!("{} won the quote race", provider);
            return Ok(quote);
        }

        match settled(rest.await) {
            Some((provider, quote)) => {
                info!("{} won the quote race", provider);
                Ok(quote)
            }
            None => Err(RaceError::BothProvidersFailed),
        }
    }
}

/// Runs one provider's request to completion, folding every failure into `None`
async fn fetch_provider(
    provider: Provider,
    transport: Arc<dyn Transport>,
    url: String,
    abort: AbortSignal,
    timeout: Option<Duration>,
) -> Option<(Provider, Quote)> {
    let request = request_quote(provider, transport.as_ref(), &url, abort);

    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .unwrap_or(Err(ProviderError::TimedOut(limit))),
        None => request.await,
    };

    match outcome {
        Ok(quote) => Some((provider, quote)),
        Err(e) => {
            debug!("{} dropped out of the race: {}", provider, e);
            None
        }
    }
}

async fn request_quote(
    provider: Provider,
    transport: &dyn Transport,
    url: &str,
    abort: AbortSignal,
) -> Result<Quote, ProviderError> {
    let body = transport.get(url, abort).await?;
    provider.parse(&body)
}

fn settled(joined: Result<Option<(Provider, Quote)>, JoinError>) -> Option<(Provider, Quote)> {
    joined.unwrap_or_else(|e| {
        warn!("Provider task did not finish: {}", e);
        None
    })
}
