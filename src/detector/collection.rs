//! Collection log detection.
//!
//! The host notifies when a collection log entry is obtained; the detector
//! keeps the set of entries already seen so repeated notifications of the
//! same item (bank re-scans, duplicate drops) are reported only once. It
//! also maintains per-category counts so every event carries the current
//! progress map.

use crate::event::{ChangeEvent, CollectionPayload, EventKind, EventPayload};
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// Total number of unique collection log slots in the game.
const COLLECTION_LOG_TOTAL: u32 = 1400;

/// One collection log notification from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionObservation {
    pub item_name: String,
    /// Log category ("Bosses", "Raids", "Clues", ...).
    pub category: String,
}

/// Detects new collection log entries.
#[derive(Debug, Default)]
pub struct CollectionDetector {
    seen: HashSet<String>,
    categories: BTreeMap<String, u32>,
}

impl CollectionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the detector with entries already collected before attach.
    pub fn prime(&mut self, entries: impl IntoIterator<Item = CollectionObservation>) {
        for entry in entries {
            if self.seen.insert(entry.item_name) {
                *self.categories.entry(entry.category).or_insert(0) += 1;
            }
        }
    }

    /// Reports the entry unless it was already seen.
    pub fn observe(&mut self, player: &str, obs: CollectionObservation) -> Option<ChangeEvent> {
        if !self.seen.insert(obs.item_name.clone()) {
            return None;
        }
        *self.categories.entry(obs.category.clone()).or_insert(0) += 1;

        let collected = self.seen.len() as u32;
        info!(
            player,
            item = %obs.item_name,
            category = %obs.category,
            collected,
            "New collection log entry"
        );

        Some(ChangeEvent::new(
            EventKind::CollectionEntryAdded,
            player,
            EventPayload::Collection(CollectionPayload {
                item_name: obs.item_name,
                category: obs.category,
                collected,
                total: COLLECTION_LOG_TOTAL,
                category_progress: self.categories.clone(),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(item: &str, category: &str) -> CollectionObservation {
        CollectionObservation {
            item_name: item.into(),
            category: category.into(),
        }
    }

    #[test]
    fn new_entry_reports_with_progress() {
        let mut detector = CollectionDetector::new();
        let event = detector
            .observe("Zezima", obs("Abyssal whip", "Bosses"))
            .unwrap();

        assert_eq!(event.kind, EventKind::CollectionEntryAdded);
        match &event.payload {
            EventPayload::Collection(p) => {
                assert_eq!(p.item_name, "Abyssal whip");
                assert_eq!(p.collected, 1);
                assert_eq!(p.total, 1400);
                assert_eq!(p.category_progress.get("Bosses"), Some(&1));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn duplicate_entry_is_silent() {
        let mut detector = CollectionDetector::new();
        assert!(detector
            .observe("Zezima", obs("Abyssal whip", "Bosses"))
            .is_some());
        assert!(detector
            .observe("Zezima", obs("Abyssal whip", "Bosses"))
            .is_none());
    }

    #[test]
    fn category_progress_accumulates() {
        let mut detector = CollectionDetector::new();
        detector.observe("Zezima", obs("Abyssal whip", "Bosses"));
        detector.observe("Zezima", obs("Ranger boots", "Clues"));

        let event = detector
            .observe("Zezima", obs("Kraken tentacle", "Bosses"))
            .unwrap();
        match &event.payload {
            EventPayload::Collection(p) => {
                assert_eq!(p.collected, 3);
                assert_eq!(p.category_progress.get("Bosses"), Some(&2));
                assert_eq!(p.category_progress.get("Clues"), Some(&1));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn primed_entries_do_not_report() {
        let mut detector = CollectionDetector::new();
        detector.prime(vec![
            obs("Abyssal whip", "Bosses"),
            obs("Ranger boots", "Clues"),
        ]);

        assert!(detector
            .observe("Zezima", obs("Abyssal whip", "Bosses"))
            .is_none());

        let event = detector
            .observe("Zezima", obs("Dragon pickaxe", "Bosses"))
            .unwrap();
        match &event.payload {
            EventPayload::Collection(p) => assert_eq!(p.collected, 3),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
