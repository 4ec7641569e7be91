//! Network reachability signal
//!
//! The orchestrator reads this once at the start of every acquisition to decide
//! whether the providers are worth asking at all.

use std::sync::atomic::{AtomicBool, Ordering};

/// Synchronous "is the network reachable" signal
pub trait Reachability: Send + Sync {
    /// Whether a provider request is worth attempting right now
    fn is_online(&self) -> bool;
}

/// Reachability flag that can be flipped while the app is running
#[derive(Debug)]
pub struct NetworkStatus {
    online: AtomicBool,
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NetworkStatus {
    /// Creates a status that starts as `online`
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    /// Updates the flag
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Reachability for NetworkStatus {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
