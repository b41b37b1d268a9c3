//! Per-domain change detectors.
//!
//! A detector turns raw, high-frequency host observations into
//! low-frequency, semantically meaningful [`ChangeEvent`]s by diffing
//! against its own snapshot of the last-seen state. Detectors are owned by
//! the tracker facade and mutated only on the host's observation thread
//! (single writer by construction), so their snapshots are plain maps with
//! no locking.
//!
//! Contract shared by every detector: one observation produces at most one
//! event, an absent or unknown subject produces no event, and nothing in
//! here ever panics past its boundary.
//!
//! [`ChangeEvent`]: crate::event::ChangeEvent

mod collection;
mod combat;
mod container;
mod diary;
mod location;
mod loot;
mod quest;
mod resources;
mod skill;

pub use collection::{CollectionDetector, CollectionObservation};
pub use combat::{CombatAchievementDetector, CombatAchievementObservation};
pub use container::{ContainerDetector, ContainerKind, ContainerObservation};
pub use diary::{DiaryDetector, DiaryTaskObservation};
pub use location::{LocationDetector, LocationObservation};
pub use loot::{LootDetector, LootObservation};
pub use quest::{QuestDetector, QuestObservation, QuestStatus};
pub use resources::{ResourceDetector, ResourceObservation};
pub use skill::{SkillDetector, SkillObservation};
