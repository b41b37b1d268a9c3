//! Location change detection.
//!
//! Location observations arrive every host tick, which is far too often to
//! report. Three gates stand between an observation and an event:
//!
//! 1. tick sampling (`sample_ticks`),
//! 2. the displacement/activity rule: the player must have moved at least
//!    `min_distance` tiles from the last *reported* position, or the
//!    derived activity label must have changed,
//! 3. the shared [`SignificanceFilter`], keyed by exact tile coordinates,
//!    which suppresses re-reports of a position already sent (unless the
//!    activity changed).

use crate::event::{ChangeEvent, EventKind, EventPayload, LocationPayload};
use crate::filter::SignificanceFilter;
use tracing::debug;

/// One raw position observation from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationObservation {
    /// World tile coordinates.
    pub x: i32,
    pub y: i32,
    pub plane: i32,
    /// Game world the player is logged into.
    pub world: u32,
    /// Derived activity label ("Idle", "In Combat", ...), supplied by the host.
    pub activity: String,
}

impl LocationObservation {
    /// Map region id derived from tile coordinates (64x64 tile regions).
    ///
    /// Negative coordinates (off-map instance positions) clamp to zero
    /// rather than wrapping into a garbage region.
    pub fn region_id(&self) -> u32 {
        let x = self.x.max(0) as u32;
        let y = self.y.max(0) as u32;
        ((x >> 6) << 8) | (y >> 6)
    }
}

/// Detects reportable movement and activity changes.
#[derive(Debug)]
pub struct LocationDetector {
    sample_ticks: u32,
    min_distance: i32,
    ticks: u32,
    last_reported: Option<(i32, i32, i32)>,
    last_activity: Option<String>,
}

impl LocationDetector {
    /// # Arguments
    ///
    /// * `sample_ticks` - consider only every Nth observation
    /// * `min_distance` - minimum tile displacement to report
    pub fn new(sample_ticks: u32, min_distance: i32) -> Self {
        Self {
            sample_ticks: sample_ticks.max(1),
            min_distance: min_distance.max(1),
            ticks: 0,
            last_reported: None,
            last_activity: None,
        }
    }

    /// Diffs one observation against the last reported position.
    pub fn observe(
        &mut self,
        player: &str,
        obs: LocationObservation,
        filter: &SignificanceFilter,
    ) -> Option<ChangeEvent> {
        self.ticks += 1;
        if self.ticks < self.sample_ticks {
            return None;
        }
        self.ticks = 0;

        let moved = match self.last_reported {
            Some(last) => tile_distance(last, (obs.x, obs.y, obs.plane)) >= self.min_distance,
            None => true,
        };
        let activity_changed = self.last_activity.as_deref() != Some(obs.activity.as_str());

        if !moved && !activity_changed {
            return None;
        }

        let signature = format!("location:{}:{}:{}", obs.x, obs.y, obs.plane);
        if !activity_changed && filter.should_suppress(&signature) {
            debug!(player, signature, "Suppressing already-reported position");
            return None;
        }
        filter.record(signature);

        let region = obs.region_id();
        let payload = LocationPayload {
            x: obs.x,
            y: obs.y,
            plane: obs.plane,
            world_id: obs.world,
            region,
            location_name: region_name(region),
            current_activity: obs.activity.clone(),
        };

        self.last_reported = Some((obs.x, obs.y, obs.plane));
        self.last_activity = Some(obs.activity);

        Some(ChangeEvent::new(
            EventKind::LocationChanged,
            player,
            EventPayload::Location(payload),
        ))
    }
}

/// Chebyshev distance between tiles; different planes never count as near.
fn tile_distance(a: (i32, i32, i32), b: (i32, i32, i32)) -> i32 {
    if a.2 != b.2 {
        return i32::MAX;
    }
    (a.0 - b.0).abs().max((a.1 - b.1).abs())
}

/// Human-readable name for well-known map regions.
fn region_name(region_id: u32) -> String {
    match region_id {
        12850 => "Lumbridge".into(),
        12597 => "Varrock".into(),
        12342 => "Falador".into(),
        11828 => "Draynor Village".into(),
        12954 => "Al Kharid".into(),
        10547 => "Rimmington".into(),
        12596 => "Barbarian Village".into(),
        13105 => "Edgeville".into(),
        12853 => "Port Sarim".into(),
        11319 => "Karamja".into(),
        other => format!("Region {other}"),
    }
}
