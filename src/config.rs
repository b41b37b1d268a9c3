//! Tracker configuration.
//!
//! [`TrackerConfig`] is a pure data type: it carries every knob the pipeline
//! recognizes and performs no I/O. Loading it (from the host's settings UI,
//! a config file, CLI flags) is the host's job.
//!
//! An empty `base_url` or `auth_token` disables the pipeline: `start()`
//! refuses to spawn workers until both are supplied.

/// Default interval between full-state reconciliation attempts (seconds).
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;

/// Minimum allowed reconciliation interval (seconds).
pub const MIN_SYNC_INTERVAL_SECS: u64 = 5;

/// Default heartbeat cadence (seconds).
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Minimum allowed heartbeat cadence (seconds).
pub const MIN_HEARTBEAT_INTERVAL_SECS: u64 = 15;

/// Default location sampling frequency, in host observation ticks.
pub const DEFAULT_LOCATION_SAMPLE_TICKS: u32 = 1;

/// Default resource sampling frequency, in host observation ticks.
pub const DEFAULT_RESOURCE_SAMPLE_TICKS: u32 = 10;

/// Default container sampling frequency, in host observation ticks.
pub const DEFAULT_CONTAINER_SAMPLE_TICKS: u32 = 100;

/// Default total-XP delta that makes a full-state snapshot worth resending.
pub const DEFAULT_XP_SYNC_THRESHOLD: u64 = 1000;

/// Default minimum tile displacement before a location change is reported.
pub const DEFAULT_MIN_LOCATION_DISTANCE: i32 = 1;

/// Default tolerance band for noisy resource fields (energy, special attack).
pub const DEFAULT_RESOURCE_TOLERANCE: i32 = 10;

/// Default number of reconciliation firings skipped after repeated
/// sync delivery failures.
pub const DEFAULT_SYNC_FAILURE_SKIP: u32 = 10;

/// Default grace period for in-flight sends during shutdown (seconds).
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

/// Default total timeout for a single webhook request (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Complete pipeline configuration.
///
/// Every per-domain tracking flag is independently togglable; disabling one
/// domain never affects another.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Base URL of the aggregation backend. Empty disables the pipeline.
    pub base_url: String,
    /// Credential token issued by the backend. Empty disables the pipeline.
    pub auth_token: String,

    /// Report level-ups and XP gains.
    pub track_skills: bool,
    /// Report received drops.
    pub track_drops: bool,
    /// Report quest state transitions.
    pub track_quests: bool,
    /// Share inventory contents.
    pub share_inventory: bool,
    /// Share current position and activity.
    pub share_location: bool,
    /// Share health, prayer, energy and special attack.
    pub share_resources: bool,
    /// Share STASH unit contents.
    pub track_stash: bool,
    /// Share group storage contents.
    pub track_group_storage: bool,
    /// Report achievement diary task completions.
    pub track_diaries: bool,
    /// Report collection log additions.
    pub track_collection_log: bool,
    /// Report combat achievement completions.
    pub track_combat_achievements: bool,

    /// Interval between full-state reconciliation attempts (seconds).
    pub sync_interval_secs: u64,
    /// Emit periodic heartbeats.
    pub heartbeat_enabled: bool,
    /// Heartbeat cadence (seconds).
    pub heartbeat_interval_secs: u64,

    /// Sample location observations every N host ticks.
    pub location_sample_ticks: u32,
    /// Sample resource observations every N host ticks.
    pub resource_sample_ticks: u32,
    /// Sample container observations every N host ticks (per container).
    pub container_sample_ticks: u32,

    /// Total-XP delta that makes a full-state snapshot significant.
    pub xp_sync_threshold: u64,
    /// Minimum tile displacement before a location change is reported.
    pub min_location_distance: i32,
    /// Tolerance band for noisy resource fields.
    pub resource_tolerance: i32,
    /// Reconciliation firings skipped after repeated sync failures.
    pub sync_failure_skip: u32,

    /// Grace period for in-flight sends during shutdown (seconds).
    pub shutdown_grace_secs: u64,
    /// Total timeout for a single webhook request (seconds).
    pub request_timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_token: String::new(),
            track_skills: true,
            track_drops: true,
            track_quests: true,
            share_inventory: false,
            share_location: true,
            share_resources: true,
            track_stash: false,
            track_group_storage: false,
            track_diaries: true,
            track_collection_log: true,
            track_combat_achievements: true,
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            heartbeat_enabled: true,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            location_sample_ticks: DEFAULT_LOCATION_SAMPLE_TICKS,
            resource_sample_ticks: DEFAULT_RESOURCE_SAMPLE_TICKS,
            container_sample_ticks: DEFAULT_CONTAINER_SAMPLE_TICKS,
            xp_sync_threshold: DEFAULT_XP_SYNC_THRESHOLD,
            min_location_distance: DEFAULT_MIN_LOCATION_DISTANCE,
            resource_tolerance: DEFAULT_RESOURCE_TOLERANCE,
            sync_failure_skip: DEFAULT_SYNC_FAILURE_SKIP,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl TrackerConfig {
    /// Returns a copy with every interval clamped to its supported minimum.
    ///
    /// The tracker normalizes its config on construction, so a host that
    /// passes a 1-second sync interval gets the 5-second floor instead of
    /// hammering the backend.
    pub fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        self.sync_interval_secs = self.sync_interval_secs.max(MIN_SYNC_INTERVAL_SECS);
        self.heartbeat_interval_secs = self
            .heartbeat_interval_secs
            .max(MIN_HEARTBEAT_INTERVAL_SECS);
        self.location_sample_ticks = self.location_sample_ticks.max(1);
        self.resource_sample_ticks = self.resource_sample_ticks.max(1);
        self.container_sample_ticks = self.container_sample_ticks.max(1);
        self.min_location_distance = self.min_location_distance.max(1);
        self.resource_tolerance = self.resource_tolerance.max(0);
        self.request_timeout_secs = self.request_timeout_secs.max(1);
        self
    }

    /// True when both endpoint and credential are present.
    pub fn is_endpoint_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.auth_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_endpoint() {
        let config = TrackerConfig::default();
        assert!(!config.is_endpoint_configured());
        assert!(config.track_skills);
        assert!(!config.share_inventory);
        assert_eq!(config.sync_interval_secs, DEFAULT_SYNC_INTERVAL_SECS);
    }

    #[test]
    fn normalized_clamps_intervals() {
        let config = TrackerConfig {
            sync_interval_secs: 1,
            heartbeat_interval_secs: 2,
            location_sample_ticks: 0,
            resource_sample_ticks: 0,
            container_sample_ticks: 0,
            min_location_distance: 0,
            request_timeout_secs: 0,
            ..TrackerConfig::default()
        }
        .normalized();

        assert_eq!(config.sync_interval_secs, MIN_SYNC_INTERVAL_SECS);
        assert_eq!(config.heartbeat_interval_secs, MIN_HEARTBEAT_INTERVAL_SECS);
        assert_eq!(config.location_sample_ticks, 1);
        assert_eq!(config.resource_sample_ticks, 1);
        assert_eq!(config.container_sample_ticks, 1);
        assert_eq!(config.min_location_distance, 1);
        assert_eq!(config.request_timeout_secs, 1);
    }

    #[test]
    fn normalized_strips_trailing_slash() {
        let config = TrackerConfig {
            base_url: "https://example.com/".into(),
            auth_token: "t".into(),
            ..TrackerConfig::default()
        }
        .normalized();

        assert_eq!(config.base_url, "https://example.com");
        assert!(config.is_endpoint_configured());
    }

    #[test]
    fn endpoint_requires_both_url_and_token() {
        let mut config = TrackerConfig {
            base_url: "https://example.com".into(),
            ..TrackerConfig::default()
        };
        assert!(!config.is_endpoint_configured());

        config.auth_token = "token".into();
        assert!(config.is_endpoint_configured());
    }
}
