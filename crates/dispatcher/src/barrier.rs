//! SyncBarrier - counting rendezvous for dispatch workers
//!
//! Atomic arrival counter plus a `watch` release signal flipped by the last
//! arriver. Waiters subscribe before counting themselves, so the release can
//! never be missed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

/// Releases all parties once `parties` arrivals have been counted
#[derive(Debug)]
pub struct SyncBarrier {
    parties: usize,
    arrived: AtomicUsize,
    release: watch::Sender<bool>,
}

impl SyncBarrier {
    /// Barrier for `parties` workers; zero parties is released from the start
    pub fn new(parties: usize) -> Self {
        let (release, _) = watch::channel(parties == 0);
        Self {
            parties,
            arrived: AtomicUsize::new(0),
            release,
        }
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Arrivals counted so far (forfeits included)
    pub fn arrived(&self) -> usize {
        self.arrived.load(Ordering::Acquire)
    }

    pub fn is_released(&self) -> bool {
        *self.release.borrow()
    }

    /// Count this caller and suspend until every party has arrived
    pub async fn wait(&self) {
        let mut rx = self.release.subscribe();
        self.arrive();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|released| *released).await;
    }

    /// Count an arrival without waiting
    ///
    /// Used for workers that cannot take part, so the others are not held forever.
    pub fn forfeit(&self) {
        self.arrive();
    }

    /// Ticket that forfeits its arrival if dropped unused
    pub fn ticket(self: &Arc<Self>) -> ArrivalTicket {
        ArrivalTicket {
            barrier: Some(Arc::clone(self)),
        }
    }

    fn arrive(&self) {
        let arrived = self.arrived.fetch_add(1, Ordering::AcqRel) + 1;
        trace!(arrived, parties = self.parties, "Barrier arrival");
        if arrived >= self.parties {
            self.release.send_replace(true);
        }
    }
}

/// One party's right to arrive at a `SyncBarrier`
///
/// Exactly one arrival is counted per ticket: by `wait`, or on drop.
#[derive(Debug)]
pub struct ArrivalTicket {
    barrier: Option<Arc<SyncBarrier>>,
}

impl ArrivalTicket {
    /// Arrive and wait for release
    pub async fn wait(mut self) {
        if let Some(barrier) = self.barrier.take() {
            barrier.wait().await;
        }
    }
}

impl Drop for ArrivalTicket {
    fn drop(&mut self) {
        if let Some(barrier) = self.barrier.take() {
            barrier.forfeit();
        }
    }
}
