//! Timer-driven schedulers.
//!
//! Two independent background tasks pull from the host's
//! [`PlayerStateSource`] on their own intervals:
//!
//! - [`ReconcileDaemon`] periodically snapshots the full player state and
//!   enqueues a reconciling sync when it changed significantly, backing off
//!   when deliveries keep failing.
//! - [`HeartbeatDaemon`] emits a liveness signal so the aggregator can mark
//!   the player online without waiting for a state change.
//!
//! [`PlayerStateSource`]: crate::source::PlayerStateSource

mod heartbeat;
mod reconcile;

pub use heartbeat::HeartbeatDaemon;
pub use reconcile::ReconcileDaemon;

use std::sync::atomic::{AtomicU32, Ordering};

/// Shared view of recent sync delivery outcomes.
///
/// Written by the sync lane's dispatch worker, read by the reconciliation
/// scheduler. Only consecutive failures matter: one success resets the
/// count.
#[derive(Debug, Default)]
pub struct SyncHealth {
    consecutive_failures: AtomicU32,
}

impl SyncHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful sync delivery.
    pub fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }

    /// Records a failed sync delivery.
    pub fn record_failure(&self) {
        self.consecutive_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Current run of consecutive failures.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    /// Resets the failure count (used when the scheduler enters backoff).
    pub fn reset(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }
}
