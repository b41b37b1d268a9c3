//! Achievement diary detection.
//!
//! The host polls full diary state per (area, tier) pair; the detector keeps
//! the set of task indices already seen complete and reports one event per
//! newly completed task. Tasks never un-complete, so a true-to-false flip in
//! an observation is treated as a stale read and ignored.

use crate::event::{ChangeEvent, DiaryPayload, EventKind, EventPayload};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Full state of one diary tier, as polled from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryTaskObservation {
    /// Diary area ("Lumbridge & Draynor", "Varrock", ...).
    pub area: String,
    /// Tier within the area ("Easy", "Medium", "Hard", "Elite").
    pub tier: String,
    /// Per-task completion flags, in the tier's task order.
    pub tasks: Vec<bool>,
}

/// Detects newly completed diary tasks.
#[derive(Debug, Default)]
pub struct DiaryDetector {
    completed: HashMap<(String, String), HashSet<u32>>,
}

impl DiaryDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs a tier's task flags against the already-seen completions.
    ///
    /// Returns an event when at least one task flipped false-to-true; the
    /// payload carries the tier's aggregate progress after the flip. The
    /// first observation of a tier primes silently so attaching mid-game
    /// does not replay the whole diary.
    pub fn observe(&mut self, player: &str, obs: DiaryTaskObservation) -> Option<ChangeEvent> {
        let key = (obs.area.clone(), obs.tier.clone());
        let total_tasks = obs.tasks.len() as u32;
        let done: HashSet<u32> = obs
            .tasks
            .iter()
            .enumerate()
            .filter_map(|(i, complete)| complete.then_some(i as u32))
            .collect();

        let Some(seen) = self.completed.get_mut(&key) else {
            self.completed.insert(key, done);
            return None;
        };

        let newly: Vec<u32> = done.difference(seen).copied().collect();
        if newly.is_empty() {
            return None;
        }
        // Stale reads may drop flags; the seen set only ever grows.
        seen.extend(newly);

        let completed_tasks = seen.len() as u32;
        let completed = completed_tasks >= total_tasks && total_tasks > 0;
        info!(
            player,
            area = %obs.area,
            tier = %obs.tier,
            completed_tasks,
            total_tasks,
            "Diary task completed"
        );

        Some(ChangeEvent::new(
            EventKind::DiaryTaskCompleted,
            player,
            EventPayload::Diary(DiaryPayload {
                area: obs.area,
                tier: obs.tier,
                completed_tasks,
                total_tasks,
                completed,
            }),
        ))
    }
}
