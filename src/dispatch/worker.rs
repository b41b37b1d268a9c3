//! Per-lane dispatch worker.
//!
//! One worker task per event kind. The worker owns its lane's receiver,
//! delivers events in arrival order through the shared [`DeliveryClient`],
//! and reports sync-lane outcomes to [`SyncHealth`] so the reconciliation
//! scheduler can back off a failing endpoint.
//!
//! Delivery is best-effort: failures are logged and counted, never retried
//! here. On shutdown the worker drains whatever is already queued before
//! exiting, bounded by the tracker's grace period.

use crate::delivery::DeliveryClient;
use crate::event::{ChangeEvent, EventKind};
use crate::schedule::SyncHealth;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Drains one event-kind lane and delivers its events.
pub struct DispatchWorker<C: DeliveryClient> {
    kind: EventKind,
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
    client: Arc<C>,
    sync_health: Arc<SyncHealth>,
}

impl<C: DeliveryClient> DispatchWorker<C> {
    pub fn new(
        kind: EventKind,
        rx: mpsc::UnboundedReceiver<ChangeEvent>,
        client: Arc<C>,
        sync_health: Arc<SyncHealth>,
    ) -> Self {
        Self {
            kind,
            rx,
            client,
            sync_health,
        }
    }

    /// Runs the worker until shutdown is signaled and the lane is drained.
    pub async fn run(mut self, shutdown: CancellationToken) {
        debug!(kind = %self.kind, "Dispatch worker starting");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    break;
                }

                event = self.rx.recv() => {
                    match event {
                        Some(event) => self.deliver(event).await,
                        // Dispatcher dropped; nothing more will arrive.
                        None => break,
                    }
                }
            }
        }

        // Drain what was queued before the shutdown signal. The tracker
        // bounds this with its grace period.
        while let Ok(event) = self.rx.try_recv() {
            self.deliver(event).await;
        }

        debug!(kind = %self.kind, "Dispatch worker stopped");
    }

    async fn deliver(&self, event: ChangeEvent) {
        let is_sync = event.kind == EventKind::FullStateSync;

        match self.client.deliver(event).await {
            Ok(()) => {
                if is_sync {
                    self.sync_health.record_success();
                }
            }
            Err(err) => {
                warn!(kind = %self.kind, error = %err, "Event delivery failed");
                if is_sync && err.is_endpoint_failure() {
                    self.sync_health.record_failure();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::client::tests::RecordingClient;
    use crate::event::{EventPayload, HeartbeatPayload, SkillPayload};
    use std::time::Duration;

    fn event(kind: EventKind) -> ChangeEvent {
        let payload = match kind {
            EventKind::SkillUp => EventPayload::Skill(SkillPayload {
                skill: "Attack".into(),
                level: 71,
                xp: 850_000,
                xp_gained: 20_000,
                levels_gained: 1,
            }),
            _ => EventPayload::Heartbeat(HeartbeatPayload {
                status: "online".into(),
            }),
        };
        ChangeEvent::new(kind, "Zezima", payload)
    }

    fn worker(
        kind: EventKind,
        client: &RecordingClient,
    ) -> (
        DispatchWorker<RecordingClient>,
        mpsc::UnboundedSender<ChangeEvent>,
        Arc<SyncHealth>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let health = Arc::new(SyncHealth::new());
        let worker = DispatchWorker::new(kind, rx, Arc::new(client.clone()), Arc::clone(&health));
        (worker, tx, health)
    }

    #[tokio::test]
    async fn delivers_events_in_order() {
        let client = RecordingClient::new();
        let (worker, tx, _health) = worker(EventKind::SkillUp, &client);
        let shutdown = CancellationToken::new();

        tx.send(event(EventKind::SkillUp)).unwrap();
        tx.send(event(EventKind::SkillUp)).unwrap();

        let handle = tokio::spawn(worker.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(client.delivered().len(), 2);
    }

    #[tokio::test]
    async fn drains_queue_on_shutdown() {
        let client = RecordingClient::new();
        let (worker, tx, _health) = worker(EventKind::Heartbeat, &client);
        let shutdown = CancellationToken::new();

        // Cancel before the worker ever runs; queued events still go out.
        tx.send(event(EventKind::Heartbeat)).unwrap();
        tx.send(event(EventKind::Heartbeat)).unwrap();
        shutdown.cancel();

        worker.run(shutdown).await;
        assert_eq!(client.delivered().len(), 2);
    }

    #[tokio::test]
    async fn sync_failures_are_counted() {
        let client = RecordingClient::new();
        client.set_failing(true);
        let (worker, tx, health) = worker(EventKind::FullStateSync, &client);
        let shutdown = CancellationToken::new();

        tx.send(event(EventKind::FullStateSync)).unwrap();
        tx.send(event(EventKind::FullStateSync)).unwrap();

        let handle = tokio::spawn(worker.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(health.consecutive_failures(), 2);
    }

    #[tokio::test]
    async fn sync_success_resets_failure_count() {
        let client = RecordingClient::new();
        let (worker, tx, health) = worker(EventKind::FullStateSync, &client);
        health.record_failure();
        health.record_failure();
        let shutdown = CancellationToken::new();

        tx.send(event(EventKind::FullStateSync)).unwrap();

        let handle = tokio::spawn(worker.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(health.consecutive_failures(), 0);
    }

    #[tokio::test]
    async fn non_sync_failures_do_not_touch_sync_health() {
        let client = RecordingClient::new();
        client.set_failing(true);
        let (worker, tx, health) = worker(EventKind::SkillUp, &client);
        let shutdown = CancellationToken::new();

        tx.send(event(EventKind::SkillUp)).unwrap();

        let handle = tokio::spawn(worker.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(health.consecutive_failures(), 0);
    }
}
