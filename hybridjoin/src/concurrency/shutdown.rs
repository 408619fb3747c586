//! Broadcast shutdown signal observed by join runs between batches.

use std::sync::Arc;

use tokio::sync::watch;

/// Receiver side of the shutdown signal.
///
/// The value is latched: once shutdown is requested, every receiver sees it, including receivers
/// subscribed afterwards.
pub type ShutdownRx = watch::Receiver<bool>;

/// Sender side of the shutdown signal, cheap to clone and share with a signal handler.
#[derive(Debug, Clone)]
pub struct ShutdownTx(Arc<watch::Sender<bool>>);

impl ShutdownTx {
    /// Requests every run holding a receiver to stop at its next batch boundary.
    ///
    /// Succeeds even when nobody is subscribed yet.
    pub fn shutdown(&self) {
        self.0.send_replace(true);
    }

    pub fn subscribe(&self) -> ShutdownRx {
        self.0.subscribe()
    }
}

/// Creates a new shutdown channel.
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTx(Arc::new(tx)), rx)
}

/// Returns whether shutdown was requested. A dropped sender is not a shutdown request.
pub fn is_shutdown_requested(rx: &ShutdownRx) -> bool {
    *rx.borrow()
}
