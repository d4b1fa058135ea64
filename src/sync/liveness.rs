//! Liveness flag for results that outlive their consumer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag checked before applying async results to visible state.
#[derive(Debug, Clone)]
pub struct Liveness {
    live: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Mark the consumer gone. Every clone observes it.
    pub fn close(&self) {
        self.live.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
