//! HTTP transport used by the quote providers
//!
//! Requests carry an explicit [`AbortSignal`]. The transport watches it while the
//! request is in flight and drops the request as soon as an abort is asked for.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tokio::sync::watch;

/// Errors that can occur while talking to a provider
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// The request was aborted before it completed
    #[error("Request aborted")]
    Aborted,
}

/// Owner side of an abort signal
///
/// Dropping the controller counts as an abort, so tasks never outlive an
/// abandoned race.
#[derive(Debug)]
pub struct AbortController {
    tx: watch::Sender<bool>,
}

/// Listener side of an abort signal, handed to each in-flight request
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    /// Creates a controller that has not been aborted yet
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Returns a new signal tied to this controller
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Asks every outstanding signal to abort
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }
}

impl AbortSignal {
    /// Whether an abort has already been requested
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once abort is requested or the controller is gone
    pub async fn aborted(&mut self) {
        let _ = self.rx.wait_for(|aborted| *aborted).await;
    }
}

/// Issues GET requests on behalf of the providers
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the response body
    ///
    /// Non-2xx responses are errors. Once `abort` fires the request is dropped
    /// and `TransportError::Aborted` is returned.
    async fn get(&self, url: &str, abort: AbortSignal) -> Result<String, TransportError>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HttpTransport with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, mut abort: AbortSignal) -> Result<String, TransportError> {
        if abort.is_aborted() {
            return Err(TransportError::Aborted);
        }

        tokio::select! {
            _ = abort.aborted() => Err(TransportError::Aborted),
            body = self.fetch(url) => body,
        }
    }
}
