//! Combat achievement detection.
//!
//! Task completions arrive as discrete notifications; the detector dedups
//! them by task name and keeps per-tier completion counts plus a running
//! point total so every event carries the account's current standing.

use crate::event::{ChangeEvent, CombatAchievementPayload, EventKind, EventPayload};
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// One combat achievement notification from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatAchievementObservation {
    pub task: String,
    /// Difficulty tier ("Easy" through "Grandmaster").
    pub tier: String,
    /// Points awarded by this task.
    pub points: u32,
}

/// Detects newly completed combat achievement tasks.
#[derive(Debug, Default)]
pub struct CombatAchievementDetector {
    seen: HashSet<String>,
    tier_progress: BTreeMap<String, u32>,
    total_points: u32,
}

impl CombatAchievementDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the detector with tasks already completed before attach.
    pub fn prime(&mut self, tasks: impl IntoIterator<Item = CombatAchievementObservation>) {
        for task in tasks {
            if self.seen.insert(task.task) {
                *self.tier_progress.entry(task.tier).or_insert(0) += 1;
                self.total_points += task.points;
            }
        }
    }

    /// Reports the task unless it was already seen.
    pub fn observe(
        &mut self,
        player: &str,
        obs: CombatAchievementObservation,
    ) -> Option<ChangeEvent> {
        if !self.seen.insert(obs.task.clone()) {
            return None;
        }
        *self.tier_progress.entry(obs.tier.clone()).or_insert(0) += 1;
        self.total_points += obs.points;

        info!(
            player,
            task = %obs.task,
            tier = %obs.tier,
            total_points = self.total_points,
            "Combat achievement completed"
        );

        Some(ChangeEvent::new(
            EventKind::CombatAchievementCompleted,
            player,
            EventPayload::CombatAchievement(CombatAchievementPayload {
                task: obs.task,
                tier: obs.tier,
                points: obs.points,
                total_points: self.total_points,
                tier_progress: self.tier_progress.clone(),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(task: &str, tier: &str, points: u32) -> CombatAchievementObservation {
        CombatAchievementObservation {
            task: task.into(),
            tier: tier.into(),
            points,
        }
    }

    #[test]
    fn new_task_reports_with_totals() {
        let mut detector = CombatAchievementDetector::new();
        let event = detector
            .observe("Zezima", obs("Noxious Foe", "Easy", 1))
            .unwrap();

        assert_eq!(event.kind, EventKind::CombatAchievementCompleted);
        match &event.payload {
            EventPayload::CombatAchievement(p) => {
                assert_eq!(p.task, "Noxious Foe");
                assert_eq!(p.points, 1);
                assert_eq!(p.total_points, 1);
                assert_eq!(p.tier_progress.get("Easy"), Some(&1));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn duplicate_task_is_silent() {
        let mut detector = CombatAchievementDetector::new();
        assert!(detector
            .observe("Zezima", obs("Noxious Foe", "Easy", 1))
            .is_some());
        assert!(detector
            .observe("Zezima", obs("Noxious Foe", "Easy", 1))
            .is_none());
    }

    #[test]
    fn points_accumulate_across_tiers() {
        let mut detector = CombatAchievementDetector::new();
        detector.observe("Zezima", obs("Noxious Foe", "Easy", 1));
        detector.observe("Zezima", obs("Fight Caves Veteran", "Hard", 3));

        let event = detector
            .observe("Zezima", obs("Perfect TzTok-Jad", "Master", 5))
            .unwrap();
        match &event.payload {
            EventPayload::CombatAchievement(p) => {
                assert_eq!(p.total_points, 9);
                assert_eq!(p.tier_progress.get("Easy"), Some(&1));
                assert_eq!(p.tier_progress.get("Hard"), Some(&1));
                assert_eq!(p.tier_progress.get("Master"), Some(&1));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn primed_tasks_do_not_report_but_count() {
        let mut detector = CombatAchievementDetector::new();
        detector.prime(vec![obs("Noxious Foe", "Easy", 1)]);

        assert!(detector
            .observe("Zezima", obs("Noxious Foe", "Easy", 1))
            .is_none());

        let event = detector
            .observe("Zezima", obs("Fight Caves Veteran", "Hard", 3))
            .unwrap();
        match &event.payload {
            EventPayload::CombatAchievement(p) => assert_eq!(p.total_points, 4),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
