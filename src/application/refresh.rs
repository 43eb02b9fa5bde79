//! Pull-based data invalidation.
//!
//! Views that show server data (orders, listings, stats) remember the
//! counter value they last loaded at and reload when it moves. Anything that
//! changes server state bumps it.

use std::sync::Arc;

use tokio::sync::watch;

/// Monotonically increasing refresh counter shared by the stores.
#[derive(Debug, Clone)]
pub struct RefreshSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Bump the counter by one, waking subscribers.
    pub fn trigger(&self) -> u64 {
        let mut next = 0;
        self.tx.send_modify(|value| {
            *value += 1;
            next = *value;
        });
        tracing::debug!(counter = next, "Data refresh triggered");
        next
    }

    pub fn current(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Receiver that observes every future bump.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}
