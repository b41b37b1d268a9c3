//! Change event types.
//!
//! A [`ChangeEvent`] is the unit of work flowing through the pipeline: built
//! by a change detector on the host's observation thread, handed across a
//! queue boundary to a dispatch worker, serialized and POSTed to the remote
//! endpoint. Events are immutable once constructed and cheap to clone.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Every kind of change the pipeline can report.
///
/// Each kind gets its own dispatch lane so a slow or failing kind cannot
/// starve the others, and maps to a stable wire discriminator understood by
/// the remote aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A skill reached a new level.
    SkillUp,
    /// XP gained without a level change.
    XpGain,
    /// A drop was received.
    DropReceived,
    /// The player moved or changed activity.
    LocationChanged,
    /// Health/prayer/energy/special attack changed.
    ResourcesChanged,
    /// A quest changed state.
    QuestProgressed,
    /// A sampled container snapshot.
    InventorySnapshot,
    /// An achievement diary task was completed.
    DiaryTaskCompleted,
    /// A new collection log entry was obtained.
    CollectionEntryAdded,
    /// A combat achievement task was completed.
    CombatAchievementCompleted,
    /// Periodic full-state reconciliation.
    FullStateSync,
    /// Liveness signal.
    Heartbeat,
}

impl EventKind {
    /// All kinds, in lane order.
    pub const ALL: [EventKind; 12] = [
        EventKind::SkillUp,
        EventKind::XpGain,
        EventKind::DropReceived,
        EventKind::LocationChanged,
        EventKind::ResourcesChanged,
        EventKind::QuestProgressed,
        EventKind::InventorySnapshot,
        EventKind::DiaryTaskCompleted,
        EventKind::CollectionEntryAdded,
        EventKind::CombatAchievementCompleted,
        EventKind::FullStateSync,
        EventKind::Heartbeat,
    ];

    /// Wire discriminator sent in the envelope's `type` field.
    ///
    /// These values are an external contract with the aggregator and must
    /// not change.
    pub fn wire_type(&self) -> &'static str {
        match self {
            EventKind::SkillUp => "LEVEL",
            EventKind::XpGain => "XP_GAIN",
            EventKind::DropReceived => "LOOT",
            EventKind::LocationChanged => "LOCATION",
            EventKind::ResourcesChanged => "RESOURCES",
            EventKind::QuestProgressed => "QUEST",
            EventKind::InventorySnapshot => "INVENTORY",
            EventKind::DiaryTaskCompleted => "DIARY",
            EventKind::CollectionEntryAdded => "COLLECTION_LOG",
            EventKind::CombatAchievementCompleted => "COMBAT_ACHIEVEMENT",
            EventKind::FullStateSync => "PLAYER_SYNC",
            EventKind::Heartbeat => "HEARTBEAT",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_type())
    }
}

/// A single item stack inside a container snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStack {
    pub id: u32,
    pub name: String,
    pub quantity: u32,
    pub slot: u32,
}

/// Payload for [`EventKind::SkillUp`] and [`EventKind::XpGain`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPayload {
    pub skill: String,
    pub level: u32,
    pub xp: u64,
    pub xp_gained: u64,
    pub levels_gained: u32,
}

/// Payload for [`EventKind::DropReceived`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropPayload {
    pub item_name: String,
    pub item_id: i32,
    pub quantity: u32,
    pub source: String,
    pub value: u64,
    pub location: Option<String>,
}

/// Payload for [`EventKind::LocationChanged`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
    pub world_id: u32,
    pub region: u32,
    pub location_name: String,
    pub current_activity: String,
}

/// Payload for [`EventKind::ResourcesChanged`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesPayload {
    pub health: i32,
    pub max_health: i32,
    pub prayer: i32,
    pub max_prayer: i32,
    pub energy: i32,
    pub special_attack: i32,
}

/// Payload for [`EventKind::QuestProgressed`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestPayload {
    pub quest_name: String,
    pub status: String,
    pub quest_points: u32,
    pub quests_completed: u32,
}

/// Payload for [`EventKind::InventorySnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPayload {
    pub container: String,
    pub items: Vec<ItemStack>,
    pub total_quantity: u64,
    pub distinct_items: u32,
}

/// Payload for [`EventKind::DiaryTaskCompleted`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryPayload {
    pub area: String,
    pub tier: String,
    pub completed_tasks: u32,
    pub total_tasks: u32,
    pub completed: bool,
}

/// Payload for [`EventKind::CollectionEntryAdded`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPayload {
    pub item_name: String,
    pub category: String,
    pub collected: u32,
    pub total: u32,
    pub category_progress: BTreeMap<String, u32>,
}

/// Payload for [`EventKind::CombatAchievementCompleted`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatAchievementPayload {
    pub task: String,
    pub tier: String,
    pub points: u32,
    pub total_points: u32,
    pub tier_progress: BTreeMap<String, u32>,
}

/// Position fragment inside a full-state sync payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLocation {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

/// Resource fragment inside a full-state sync payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResources {
    pub health: i32,
    pub max_health: i32,
    pub prayer: i32,
    pub max_prayer: i32,
    pub energy: i32,
    pub special_attack: i32,
}

/// Payload for [`EventKind::FullStateSync`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    pub total_level: u32,
    pub combat_level: u32,
    pub total_xp: u64,
    pub is_online: bool,
    pub current_world: u32,
    pub current_activity: String,
    pub location: SyncLocation,
    pub resources: SyncResources,
}

/// Payload for [`EventKind::Heartbeat`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatPayload {
    pub status: String,
}

/// Typed per-domain payload carried by a [`ChangeEvent`].
///
/// Serialized untagged: the wire `extra` object is the flat payload struct,
/// with the discriminator carried separately in the envelope's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    Skill(SkillPayload),
    Drop(DropPayload),
    Location(LocationPayload),
    Resources(ResourcesPayload),
    Quest(QuestPayload),
    Inventory(InventoryPayload),
    Diary(DiaryPayload),
    Collection(CollectionPayload),
    CombatAchievement(CombatAchievementPayload),
    Sync(SyncPayload),
    Heartbeat(HeartbeatPayload),
}

/// An immutable, reportable state change.
///
/// Crosses a queue boundary into a dispatch worker, so it must be safe to
/// read from another task without synchronization; all fields are owned and
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// What kind of change this is.
    pub kind: EventKind,
    /// Stable identifier of the tracked player.
    pub player: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Domain-specific payload.
    pub payload: EventPayload,
}

impl ChangeEvent {
    /// Builds an event stamped with the current wall-clock time.
    pub fn new(kind: EventKind, player: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            kind,
            player: player.into(),
            timestamp_ms: now_ms(),
            payload,
        }
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
