//! Container snapshot detection.
//!
//! Inventory, equipment, bank, STASH units and group storage are all sampled
//! the same way: each container kind keeps its own tick counter and its own
//! hash of the last reported contents, so a busy inventory never drowns out
//! a rarely-touched bank. A snapshot is reported only when the contents hash
//! actually changed.

use crate::event::{ChangeEvent, EventKind, EventPayload, InventoryPayload, ItemStack};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Kinds of item containers the pipeline can snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Inventory,
    Equipment,
    Bank,
    Stash,
    GroupStorage,
}

impl ContainerKind {
    /// Wire name used in the `container` payload field.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ContainerKind::Inventory => "INVENTORY",
            ContainerKind::Equipment => "EQUIPMENT",
            ContainerKind::Bank => "BANK",
            ContainerKind::Stash => "STASH",
            ContainerKind::GroupStorage => "GROUP_STORAGE",
        }
    }
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One raw container observation from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerObservation {
    pub kind: ContainerKind,
    /// Occupied slots only; empty slots are omitted by the host.
    pub items: Vec<ItemStack>,
}

/// Detects changed container contents, rate-limited per container kind.
#[derive(Debug)]
pub struct ContainerDetector {
    sample_ticks: u32,
    ticks: HashMap<ContainerKind, u32>,
    last_hash: HashMap<ContainerKind, u64>,
}

impl ContainerDetector {
    pub fn new(sample_ticks: u32) -> Self {
        Self {
            sample_ticks: sample_ticks.max(1),
            ticks: HashMap::new(),
            last_hash: HashMap::new(),
        }
    }

    /// Diffs one observation against the last reported snapshot of that kind.
    pub fn observe(&mut self, player: &str, obs: ContainerObservation) -> Option<ChangeEvent> {
        let ticks = self.ticks.entry(obs.kind).or_insert(0);
        *ticks += 1;
        if *ticks < self.sample_ticks {
            return None;
        }
        *ticks = 0;

        let hash = contents_hash(&obs.items);
        if self.last_hash.get(&obs.kind) == Some(&hash) {
            return None;
        }
        self.last_hash.insert(obs.kind, hash);

        debug!(
            player,
            container = %obs.kind,
            items = obs.items.len(),
            "Container contents changed"
        );

        let total_quantity = obs.items.iter().map(|i| i.quantity as u64).sum();
        let distinct_items = obs.items.len() as u32;
        Some(ChangeEvent::new(
            EventKind::InventorySnapshot,
            player,
            EventPayload::Inventory(InventoryPayload {
                container: obs.kind.wire_name().to_string(),
                items: obs.items,
                total_quantity,
                distinct_items,
            }),
        ))
    }
}

/// Order-sensitive hash of (id, quantity, slot) triples.
fn contents_hash(items: &[ItemStack]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for item in items {
        (item.id, item.quantity, item.slot).hash(&mut hasher);
    }
    items.len().hash(&mut hasher);
    hasher.finish()
}
