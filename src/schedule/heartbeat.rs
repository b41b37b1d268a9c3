//! Heartbeat scheduler.
//!
//! Emits a periodic liveness signal so the aggregator can show the player as
//! online even when nothing is changing. No heartbeat is sent while the host
//! has no active session.

use crate::dispatch::Dispatcher;
use crate::event::{ChangeEvent, EventKind, EventPayload, HeartbeatPayload};
use crate::source::PlayerStateSource;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Periodically enqueues heartbeat events.
pub struct HeartbeatDaemon<S: PlayerStateSource> {
    source: Arc<S>,
    dispatcher: Dispatcher,
    interval: Duration,
}

impl<S: PlayerStateSource> HeartbeatDaemon<S> {
    pub fn new(source: Arc<S>, dispatcher: Dispatcher, interval: Duration) -> Self {
        Self {
            source,
            dispatcher,
            interval,
        }
    }

    /// Runs the scheduler until shutdown is signaled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "Heartbeat scheduler starting");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    debug!("Heartbeat scheduler shutting down");
                    break;
                }

                _ = interval.tick() => {
                    self.beat();
                }
            }
        }
    }

    /// One heartbeat firing. Split from `run` for timer-free tests.
    pub fn beat(&self) {
        let Some(player) = self.source.player_name() else {
            trace!("No active session, skipping heartbeat");
            return;
        };

        self.dispatcher.enqueue(ChangeEvent::new(
            EventKind::Heartbeat,
            player,
            EventPayload::Heartbeat(HeartbeatPayload {
                status: "online".into(),
            }),
        ));
    }
}
