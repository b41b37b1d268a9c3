//! RuneTrack - differential game-state telemetry for group dashboards
//!
//! This library embeds inside a game client host and forwards meaningful
//! player-state changes (level-ups, loot, movement, quest and achievement
//! progress) to a remote aggregation endpoint, without ever blocking the
//! host's observation thread.
//!
//! # High-Level API
//!
//! The [`tracker`] module provides the pipeline facade:
//!
//! ```ignore
//! use runetrack::tracker::Tracker;
//! use runetrack::config::TrackerConfig;
//!
//! let config = TrackerConfig {
//!     base_url: "https://dashboard.example.com".into(),
//!     auth_token: "secret".into(),
//!     ..TrackerConfig::default()
//! };
//! let mut tracker = Tracker::new(config, host_state)?;
//! tracker.start();
//!
//! // Called by the host whenever its own game events fire:
//! tracker.observe_skill(SkillObservation { skill: "Woodcutting".into(), level: 51, xp: 1_050_000 });
//! ```

pub mod config;
pub mod delivery;
pub mod detector;
pub mod dispatch;
pub mod event;
pub mod filter;
pub mod logging;
pub mod schedule;
pub mod source;
pub mod tracker;

/// Version of the RuneTrack library.
///
/// Defined in `Cargo.toml` and injected at compile time; reported in the
/// User-Agent of every webhook request.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
