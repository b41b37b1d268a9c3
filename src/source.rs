//! Host state boundary.
//!
//! The pipeline never talks to the game client directly. The host implements
//! [`PlayerStateSource`] and the schedulers pull from it on their own timers:
//! the heartbeat needs only the subject name, reconciliation needs a full
//! [`PlayerSnapshot`]. Returning `None` from either method (no active
//! session) is a normal condition, not an error.

use crate::event::{SyncLocation, SyncPayload, SyncResources};

/// Current resource values for the tracked player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceState {
    pub health: i32,
    pub max_health: i32,
    pub prayer: i32,
    pub max_prayer: i32,
    pub energy: i32,
    pub special_attack: i32,
}

/// Complete point-in-time state used by full-state reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    /// Stable subject identifier (display name).
    pub player: String,
    pub total_level: u32,
    pub combat_level: u32,
    pub total_xp: u64,
    pub world: u32,
    pub x: i32,
    pub y: i32,
    pub plane: i32,
    pub activity: String,
    pub resources: ResourceState,
}

impl PlayerSnapshot {
    /// Whether this snapshot differs enough from `previous` to resend.
    ///
    /// Exact-match fields: position, world, total level, combat level,
    /// activity. Total XP only counts once the delta exceeds `xp_threshold`,
    /// so steady skilling does not resync the full state every interval.
    pub fn significantly_differs_from(&self, previous: &PlayerSnapshot, xp_threshold: u64) -> bool {
        (self.x, self.y, self.plane) != (previous.x, previous.y, previous.plane)
            || self.world != previous.world
            || self.total_level != previous.total_level
            || self.combat_level != previous.combat_level
            || self.activity != previous.activity
            || self.total_xp.abs_diff(previous.total_xp) > xp_threshold
    }

    /// Converts the snapshot into a full-state sync payload.
    pub fn to_sync_payload(&self) -> SyncPayload {
        SyncPayload {
            total_level: self.total_level,
            combat_level: self.combat_level,
            total_xp: self.total_xp,
            is_online: true,
            current_world: self.world,
            current_activity: self.activity.clone(),
            location: SyncLocation {
                x: self.x,
                y: self.y,
                plane: self.plane,
            },
            resources: SyncResources {
                health: self.resources.health,
                max_health: self.resources.max_health,
                prayer: self.resources.prayer,
                max_prayer: self.resources.max_prayer,
                energy: self.resources.energy,
                special_attack: self.resources.special_attack,
            },
        }
    }
}

/// Host-implemented provider of current player state.
///
/// Both methods are called from background timer tasks and must be cheap
/// and non-blocking; the host typically serves them from its own cached
/// client state.
pub trait PlayerStateSource: Send + Sync + 'static {
    /// The tracked player's stable name, or `None` when no session is active.
    fn player_name(&self) -> Option<String>;

    /// A full current-state snapshot, or `None` when no session is active.
    fn snapshot(&self) -> Option<PlayerSnapshot>;
}
