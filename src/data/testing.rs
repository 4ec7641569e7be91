//! Scripted transport for exercising the race without a network
//!
//! Each registered URL stays pending until the test answers it through its
//! [`Responder`]; the responder also reports whether the request was aborted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::transport::{AbortSignal, Transport, TransportError};

type Reply = Result<String, TransportError>;

struct Route {
    reply: oneshot::Receiver<Reply>,
    cancelled: oneshot::Sender<()>,
}

/// Test handle for one scripted URL
pub(crate) struct Responder {
    reply: Option<oneshot::Sender<Reply>>,
    cancelled: oneshot::Receiver<()>,
}

impl Responder {
    /// Answers the request with a 200 and `body`
    pub(crate) fn body(&mut self, body: &str) {
        if let Some(tx) = self.reply.take() {
            let _ = tx.send(Ok(body.to_string()));
        }
    }

    /// Answers the request with an HTTP error status
    pub(crate) fn fail(&mut self, status: u16) {
        if let Some(tx) = self.reply.take() {
            let _ = tx.send(Err(TransportError::Status(status)));
        }
    }

    /// Waits briefly for the transport to report an abort
    pub(crate) async fn cancelled(self) -> bool {
        matches!(
            tokio::time::timeout(Duration::from_secs(1), self.cancelled).await,
            Ok(Ok(()))
        )
    }
}

/// Transport whose answers are supplied by the test
///
/// Requests to URLs without a route fail immediately with a 404.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<HashMap<String, Route>>,
    requests: AtomicUsize,
}

impl ScriptedTransport {
    /// Registers `url` and returns the handle that controls its answer
    pub(crate) fn route(&self, url: &str) -> Responder {
        let (reply_tx, reply_rx) = oneshot::channel();
        let (cancelled_tx, cancelled_rx) = oneshot::channel();
        self.routes.lock().expect("routes lock").insert(
            url.to_string(),
            Route {
                reply: reply_rx,
                cancelled: cancelled_tx,
            },
        );
        Responder {
            reply: Some(reply_tx),
            cancelled: cancelled_rx,
        }
    }

    /// Number of requests issued so far
    pub(crate) fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, mut abort: AbortSignal) -> Result<String, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let route = self.routes.lock().expect("routes lock").remove(url);
        let Some(Route { reply, cancelled }) = route else {
            return Err(TransportError::Status(404));
        };

        tokio::select! {
            _ = abort.aborted() => {
                let _ = cancelled.send(());
                Err(TransportError::Aborted)
            }
            answer = reply => answer.unwrap_or(Err(TransportError::Status(503))),
        }
    }
}
