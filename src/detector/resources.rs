//! Resource change detection.
//!
//! Health, prayer, energy and special attack change almost every tick during
//! combat, so raw observations are sampled (`sample_ticks`) and compared
//! against the last *reported* state with a per-field policy: health and
//! prayer compare exactly, energy and special attack only count once they
//! drift outside a tolerance band. The bucketed signature handed to the
//! [`SignificanceFilter`] uses the same tolerance so equivalent states
//! collide on purpose.

use crate::event::{ChangeEvent, EventKind, EventPayload, ResourcesPayload};
use crate::filter::SignificanceFilter;
use crate::source::ResourceState;

/// One raw resource observation from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceObservation {
    pub state: ResourceState,
}

/// Detects meaningful resource changes.
#[derive(Debug)]
pub struct ResourceDetector {
    sample_ticks: u32,
    tolerance: i32,
    ticks: u32,
    last_reported: Option<ResourceState>,
}

impl ResourceDetector {
    /// # Arguments
    ///
    /// * `sample_ticks` - consider only every Nth observation
    /// * `tolerance` - band for the noisy fields (energy, special attack)
    pub fn new(sample_ticks: u32, tolerance: i32) -> Self {
        Self {
            sample_ticks: sample_ticks.max(1),
            tolerance: tolerance.max(0),
            ticks: 0,
            last_reported: None,
        }
    }

    /// Diffs one observation against the last reported state.
    ///
    /// `last_reported` only advances when an event is actually produced, so
    /// slow drift in a tolerated field accumulates until it crosses the band
    /// instead of being forgotten each sample.
    pub fn observe(
        &mut self,
        player: &str,
        obs: ResourceObservation,
        filter: &SignificanceFilter,
    ) -> Option<ChangeEvent> {
        self.ticks += 1;
        if self.ticks < self.sample_ticks {
            return None;
        }
        self.ticks = 0;

        let state = obs.state;
        if let Some(last) = self.last_reported {
            if !self.changed(&last, &state) {
                return None;
            }
        }

        let signature = self.signature(&state);
        if filter.should_suppress(&signature) {
            return None;
        }
        filter.record(signature);

        self.last_reported = Some(state);
        Some(ChangeEvent::new(
            EventKind::ResourcesChanged,
            player,
            EventPayload::Resources(ResourcesPayload {
                health: state.health,
                max_health: state.max_health,
                prayer: state.prayer,
                max_prayer: state.max_prayer,
                energy: state.energy,
                special_attack: state.special_attack,
            }),
        ))
    }

    fn changed(&self, last: &ResourceState, now: &ResourceState) -> bool {
        now.health != last.health
            || now.max_health != last.max_health
            || now.prayer != last.prayer
            || now.max_prayer != last.max_prayer
            || (now.energy - last.energy).abs() > self.tolerance
            || (now.special_attack - last.special_attack).abs() > self.tolerance
    }

    /// Signature bucketing the tolerated fields so near-equal states collide.
    fn signature(&self, state: &ResourceState) -> String {
        let bucket = self.tolerance.max(1) as i64;
        format!(
            "resources:{}:{}:{}:{}:{}:{}",
            state.health,
            state.max_health,
            state.prayer,
            state.max_prayer,
            (state.energy as i64) / bucket,
            (state.special_attack as i64) / bucket,
        )
    }
}
