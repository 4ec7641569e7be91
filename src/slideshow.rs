//! Periodic quote rotation
//!
//! Loads a new quote on a fixed interval in the background and reports each
//! outcome over a tokio channel. A tick that arrives while a load is already in
//! flight is dropped, never queued.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::app::App;
use crate::data::Quote;

/// Messages sent from the slideshow task to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideshowEvent {
    /// A new quote was loaded
    Loaded(Quote),
    /// The load failed with this message
    Failed(String),
    /// A tick was dropped because a load was still running
    Skipped,
}

/// Handle for controlling the background slideshow
pub struct Slideshow {
    /// Channel for receiving slideshow events
    pub receiver: mpsc::Receiver<SlideshowEvent>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl Slideshow {
    /// Spawns the slideshow task
    ///
    /// The first quote arrives one `interval` after the call, not immediately.
    pub fn spawn(app: Arc<App>, interval: Duration) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // Skip the first tick (immediate)
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let event = if app.is_loading() {
                            debug!("Slideshow tick dropped, a load is still running");
                            SlideshowEvent::Skipped
                        } else {
                            match app.load_random_quote().await {
                                Ok(quote) => SlideshowEvent::Loaded(quote),
                                Err(e) => SlideshowEvent::Failed(e.to_string()),
                            }
                        };

                        if msg_tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Waits for the next slideshow event
    pub async fn next_event(&mut self) -> Option<SlideshowEvent> {
        self.receiver.recv().await
    }

    /// Stops the slideshow task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
