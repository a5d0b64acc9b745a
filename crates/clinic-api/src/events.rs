//! Queue change broadcast.
//!
//! A `tokio::sync::broadcast` channel fanned out to any listeners (the
//! server binary logs events; tests subscribe directly). Delivery is
//! best-effort: a send with no receivers is not an error.

use tokio::sync::broadcast;

use clinic_core::QueueNotifier;

const CHANNEL_CAPACITY: usize = 64;

/// Events emitted when the waiting queue changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEvent {
    QueueUpdated,
}

/// Cloneable broadcast handle. Implements `QueueNotifier` so the queue
/// manager can emit without knowing about channels.
#[derive(Debug, Clone)]
pub struct QueueEvents {
    tx: broadcast::Sender<QueueEvent>,
}

impl QueueEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }
}

impl Default for QueueEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueNotifier for QueueEvents {
    fn queue_changed(&self) {
        // A send error only means nobody is listening.
        let _ = self.tx.send(QueueEvent::QueueUpdated);
    }
}
