//! Bounded-channel subscriber for in-process consumers.
//!
//! Ingestion never blocks on a consumer: delivery uses `try_send`, and a
//! full channel drops the update and bumps a counter. Consumers that need
//! every update belong on the store, not on this channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use crate::ports::{BiometricSubscriber, NormalizedUpdate};

/// Fan-out endpoint backed by a bounded mpsc channel.
pub struct ChannelSubscriber {
    name: &'static str,
    tx: mpsc::Sender<NormalizedUpdate>,
    dropped: AtomicU64,
}

impl ChannelSubscriber {
    /// Creates the subscriber and the receiving half for the consumer task.
    pub fn new(
        name: &'static str,
        capacity: usize,
    ) -> (Arc<Self>, mpsc::Receiver<NormalizedUpdate>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Arc::new(Self {
                name,
                tx,
                dropped: AtomicU64::new(0),
            }),
            rx,
        )
    }

    /// Updates lost to a full channel since startup.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BiometricSubscriber for ChannelSubscriber {
    async fn on_update(&self, update: &NormalizedUpdate) {
        if let Err(mpsc::error::TrySendError::Full(_)) = self.tx.try_send(update.clone()) {
            let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                subscriber = self.name,
                dropped_total = total,
                user_id = %update.user_id,
                "subscriber channel full; update dropped"
            );
        }
    }
}
