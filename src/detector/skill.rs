//! Skill change detection.
//!
//! Tracks per-skill (level, xp) pairs and reports a [`SkillUp`] on a strict
//! level increase. XP-only gains are reported as a distinct, lower-priority
//! [`XpGain`] event on its own lane rather than suppressed, so the dashboard
//! can render live XP rates without level-up events losing priority.
//!
//! The aggregate "Overall" pseudo-skill is never tracked or reported.
//!
//! [`SkillUp`]: EventKind::SkillUp
//! [`XpGain`]: EventKind::XpGain

use crate::event::{ChangeEvent, EventKind, EventPayload, SkillPayload};
use std::collections::HashMap;
use tracing::{debug, info};

/// One raw skill observation from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillObservation {
    /// Skill name as reported by the game client.
    pub skill: String,
    /// Real (unboosted) level.
    pub level: u32,
    /// Total experience in the skill.
    pub xp: u64,
}

/// Detects level-ups and XP gains against the last-seen skill snapshot.
#[derive(Debug, Default)]
pub struct SkillDetector {
    last: HashMap<String, (u32, u64)>,
}

impl SkillDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs one observation against the snapshot.
    ///
    /// The first observation of a skill primes the snapshot silently; a
    /// level increase yields a `SkillUp`, an XP-only increase yields an
    /// `XpGain`, anything else (including stat drains) only updates the
    /// snapshot.
    pub fn observe(&mut self, player: &str, obs: SkillObservation) -> Option<ChangeEvent> {
        if obs.skill.eq_ignore_ascii_case("overall") {
            return None;
        }

        let previous = self.last.insert(obs.skill.clone(), (obs.level, obs.xp));
        let (prev_level, prev_xp) = match previous {
            Some(prev) => prev,
            None => {
                debug!(skill = %obs.skill, level = obs.level, "Priming skill snapshot");
                return None;
            }
        };

        let payload = SkillPayload {
            skill: obs.skill.clone(),
            level: obs.level,
            xp: obs.xp,
            xp_gained: obs.xp.saturating_sub(prev_xp),
            levels_gained: obs.level.saturating_sub(prev_level),
        };

        if obs.level > prev_level {
            info!(
                player,
                skill = %obs.skill,
                level = obs.level,
                xp_gained = payload.xp_gained,
                "Level up"
            );
            Some(ChangeEvent::new(
                EventKind::SkillUp,
                player,
                EventPayload::Skill(payload),
            ))
        } else if obs.xp > prev_xp {
            Some(ChangeEvent::new(
                EventKind::XpGain,
                player,
                EventPayload::Skill(payload),
            ))
        } else {
            None
        }
    }
}
