//! Cancellation token shared between a task and its owner
//!
//! Cancelling is idempotent, can happen from any thread, and can happen
//! before the task even starts: a task that checks a cancelled token simply
//! returns right away.

use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable cancellation flag with an async wait
#[derive(Debug, Clone)]
pub struct CancellationToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation; later calls are no-ops
    pub fn cancel(&self) {
        self.tx.send_if_modified(|cancelled| {
            let first = !*cancelled;
            *cancelled = true;
            first
        });
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the token is cancelled
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
