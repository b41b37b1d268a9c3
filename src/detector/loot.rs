//! Drop detection.
//!
//! Drops arrive as discrete host notifications rather than polled state, so
//! this detector is stateless: every observation with a positive quantity
//! becomes an event. Dedup of repeated kills is the aggregator's concern.

use crate::event::{ChangeEvent, DropPayload, EventKind, EventPayload};
use tracing::info;

/// One drop notification from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct LootObservation {
    pub item_name: String,
    pub item_id: i32,
    pub quantity: u32,
    /// What produced the drop (NPC name, "Pickpocket", event chest, ...).
    pub source: String,
    /// Stack value in coins, pre-multiplied by quantity by the host.
    pub value: u64,
    /// Human-readable location name, when the host knows it.
    pub location: Option<String>,
}

/// Converts drop notifications into events.
#[derive(Debug, Default)]
pub struct LootDetector;

impl LootDetector {
    pub fn new() -> Self {
        Self
    }

    /// Builds an event for the drop; zero-quantity notifications are noise.
    pub fn observe(&self, player: &str, obs: LootObservation) -> Option<ChangeEvent> {
        if obs.quantity == 0 {
            return None;
        }

        info!(
            player,
            item = %obs.item_name,
            quantity = obs.quantity,
            value = obs.value,
            source = %obs.source,
            "Drop received"
        );

        Some(ChangeEvent::new(
            EventKind::DropReceived,
            player,
            EventPayload::Drop(DropPayload {
                item_name: obs.item_name,
                item_id: obs.item_id,
                quantity: obs.quantity,
                source: obs.source,
                value: obs.value,
                location: obs.location,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_produces_event() {
        let detector = LootDetector::new();
        let event = detector
            .observe(
                "Zezima",
                LootObservation {
                    item_name: "Dragon bones".into(),
                    item_id: 536,
                    quantity: 1,
                    source: "Green dragon".into(),
                    value: 2_800,
                    location: Some("Wilderness".into()),
                },
            )
            .unwrap();

        assert_eq!(event.kind, EventKind::DropReceived);
        match &event.payload {
            EventPayload::Drop(p) => {
                assert_eq!(p.item_name, "Dragon bones");
                assert_eq!(p.value, 2_800);
                assert_eq!(p.location.as_deref(), Some("Wilderness"));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn zero_quantity_is_dropped() {
        let detector = LootDetector::new();
        assert!(detector
            .observe(
                "Zezima",
                LootObservation {
                    item_name: "Nothing".into(),
                    item_id: -1,
                    quantity: 0,
                    source: "Barrows".into(),
                    value: 0,
                    location: None,
                },
            )
            .is_none());
    }

    #[test]
    fn identical_drops_are_reported_each_time() {
        let detector = LootDetector::new();
        let obs = LootObservation {
            item_name: "Coins".into(),
            item_id: 995,
            quantity: 500,
            source: "Man".into(),
            value: 500,
            location: None,
        };

        assert!(detector.observe("Zezima", obs.clone()).is_some());
        assert!(detector.observe("Zezima", obs).is_some());
    }
}
