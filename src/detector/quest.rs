//! Quest state detection.
//!
//! Quest state is polled, so the detector keeps the last-seen status per
//! quest and reports only on a transition. Completion is terminal: once a
//! quest has been seen `Completed`, later observations of it are ignored
//! even if the host re-reads the same state after a reload.

use crate::event::{ChangeEvent, EventKind, EventPayload, QuestPayload};
use std::collections::HashMap;
use tracing::info;

/// Progress state of a single quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl QuestStatus {
    /// Wire name used in the `status` payload field.
    pub fn wire_name(&self) -> &'static str {
        match self {
            QuestStatus::NotStarted => "NOT_STARTED",
            QuestStatus::InProgress => "IN_PROGRESS",
            QuestStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One quest state observation from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestObservation {
    pub quest_name: String,
    pub status: QuestStatus,
    /// Account-wide quest points after this state.
    pub quest_points: u32,
    /// Account-wide completed quest count after this state.
    pub quests_completed: u32,
}

/// Detects quest state transitions.
#[derive(Debug, Default)]
pub struct QuestDetector {
    last: HashMap<String, QuestStatus>,
}

impl QuestDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs one observation against the quest's last-seen status.
    ///
    /// The first observation of a quest in `NotStarted` primes silently;
    /// starting from any other state is itself a transition worth reporting
    /// (the pipeline may have attached mid-game).
    pub fn observe(&mut self, player: &str, obs: QuestObservation) -> Option<ChangeEvent> {
        let previous = self.last.insert(obs.quest_name.clone(), obs.status);

        match previous {
            Some(QuestStatus::Completed) => {
                // Terminal; keep the map entry but never re-report.
                self.last.insert(obs.quest_name, QuestStatus::Completed);
                return None;
            }
            Some(prev) if prev == obs.status => return None,
            None if obs.status == QuestStatus::NotStarted => return None,
            _ => {}
        }

        if obs.status == QuestStatus::Completed {
            info!(
                player,
                quest = %obs.quest_name,
                quest_points = obs.quest_points,
                "Quest completed"
            );
        }

        Some(ChangeEvent::new(
            EventKind::QuestProgressed,
            player,
            EventPayload::Quest(QuestPayload {
                quest_name: obs.quest_name,
                status: obs.status.wire_name().to_string(),
                quest_points: obs.quest_points,
                quests_completed: obs.quests_completed,
            }),
        ))
    }
}
