//! Event dispatch.
//!
//! Routing between detectors and delivery. Each [`EventKind`] gets its own
//! unbounded channel and its own [`DispatchWorker`] task, so a slow or
//! failing lane (a flapping endpoint during a full-state sync, say) never
//! blocks level-ups from going out.
//!
//! The [`Dispatcher`] half is held by the tracker facade and is cheap to
//! clone; enqueueing never blocks the host's observation thread.

mod worker;

pub use worker::DispatchWorker;

use crate::event::{ChangeEvent, EventKind};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::warn;

/// Per-kind receivers handed to dispatch workers.
pub type LaneReceivers = HashMap<EventKind, mpsc::UnboundedReceiver<ChangeEvent>>;

/// Sender half of the per-kind lane channels.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    lanes: HashMap<EventKind, mpsc::UnboundedSender<ChangeEvent>>,
}

impl Dispatcher {
    /// Builds one channel per event kind, returning the sender half and the
    /// map of receivers to hand to workers.
    pub fn new() -> (Self, LaneReceivers) {
        let mut lanes = HashMap::with_capacity(EventKind::ALL.len());
        let mut receivers = HashMap::with_capacity(EventKind::ALL.len());

        for kind in EventKind::ALL {
            let (tx, rx) = mpsc::unbounded_channel();
            lanes.insert(kind, tx);
            receivers.insert(kind, rx);
        }

        (Self { lanes }, receivers)
    }

    /// Routes an event to its lane. Returns false when the lane's worker is
    /// gone (pipeline stopped); the event is dropped.
    pub fn enqueue(&self, event: ChangeEvent) -> bool {
        let kind = event.kind;
        let Some(lane) = self.lanes.get(&kind) else {
            warn!(%kind, "No lane for event kind");
            return false;
        };

        match lane.send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!(%kind, "Dispatch lane closed, dropping event");
                false
            }
        }
    }
}
