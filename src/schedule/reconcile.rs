//! Full-state reconciliation scheduler.
//!
//! Incremental events can be lost (dropped sends, host restarts mid-queue),
//! so the pipeline periodically snapshots the complete player state and
//! resends it when it differs significantly from the last snapshot sent.
//! A successful reconciliation also clears the [`SignificanceFilter`], so
//! incremental dedup state never outlives the last known-good baseline.
//!
//! When sync deliveries keep failing the scheduler backs off by skipping a
//! fixed number of firings instead of hammering a dead endpoint; the
//! interval itself never changes, so recovery latency stays bounded.

use super::SyncHealth;
use crate::dispatch::Dispatcher;
use crate::event::{ChangeEvent, EventKind, EventPayload};
use crate::filter::SignificanceFilter;
use crate::source::{PlayerSnapshot, PlayerStateSource};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Consecutive sync failures that trigger backoff.
const BACKOFF_FAILURE_THRESHOLD: u32 = 2;

/// Periodically reconciles full player state with the aggregator.
pub struct ReconcileDaemon<S: PlayerStateSource> {
    source: Arc<S>,
    dispatcher: Dispatcher,
    filter: Arc<SignificanceFilter>,
    health: Arc<SyncHealth>,
    interval: Duration,
    xp_threshold: u64,
    failure_skip: u32,
    last_synced: Option<PlayerSnapshot>,
    skip_remaining: u32,
}

impl<S: PlayerStateSource> ReconcileDaemon<S> {
    pub fn new(
        source: Arc<S>,
        dispatcher: Dispatcher,
        filter: Arc<SignificanceFilter>,
        health: Arc<SyncHealth>,
        interval: Duration,
        xp_threshold: u64,
        failure_skip: u32,
    ) -> Self {
        Self {
            source,
            dispatcher,
            filter,
            health,
            interval,
            xp_threshold,
            failure_skip,
            last_synced: None,
            skip_remaining: 0,
        }
    }

    /// Runs the scheduler until shutdown is signaled.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "Reconciliation scheduler starting");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // interval fires immediately; the first reconciliation should wait
        // a full period so the host has state to snapshot.
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    debug!("Reconciliation scheduler shutting down");
                    break;
                }

                _ = interval.tick() => {
                    self.tick();
                }
            }
        }
    }

    /// One scheduler firing. Split from `run` so backoff and significance
    /// logic is testable without timers.
    pub fn tick(&mut self) {
        if self.skip_remaining > 0 {
            self.skip_remaining -= 1;
            debug!(remaining = self.skip_remaining, "Skipping reconciliation (backoff)");
            return;
        }

        let failures = self.health.consecutive_failures();
        if failures >= BACKOFF_FAILURE_THRESHOLD {
            warn!(
                skipped_firings = self.failure_skip,
                "Sync deliveries failing, backing off"
            );
            self.skip_remaining = self.failure_skip;
            self.health.reset();
            // The baseline was never confirmed; retry after the window.
            self.last_synced = None;
            return;
        }

        let Some(snapshot) = self.source.snapshot() else {
            // No active session; forget the baseline so the next session
            // always syncs.
            self.last_synced = None;
            return;
        };

        // A pending delivery failure means the last baseline never landed;
        // resync regardless of significance.
        let significant = failures > 0
            || match &self.last_synced {
                Some(last) => snapshot.significantly_differs_from(last, self.xp_threshold),
                None => true,
            };
        if !significant {
            return;
        }

        debug!(player = %snapshot.player, "Enqueueing full-state sync");
        let event = ChangeEvent::new(
            EventKind::FullStateSync,
            snapshot.player.clone(),
            EventPayload::Sync(snapshot.to_sync_payload()),
        );
        if self.dispatcher.enqueue(event) {
            self.last_synced = Some(snapshot);
            // New baseline: incremental dedup state is stale.
            self.filter.clear();
        }
    }
}
