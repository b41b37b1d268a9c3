//! Tracker facade.
//!
//! [`Tracker`] is the host's single entry point: it owns the detectors, the
//! dispatch lanes and the background schedulers, and exposes one `observe_*`
//! method per domain for the host's observation thread to feed. Starting
//! spawns the worker and scheduler tasks on the ambient tokio runtime;
//! stopping cancels them and waits out the configured grace period so
//! in-flight sends can finish.
//!
//! Observations made while the pipeline is stopped, or for a domain whose
//! tracking flag is off, are dropped silently. Disabling one domain never
//! affects another.

use crate::config::TrackerConfig;
use crate::delivery::{DeliveryClient, DeliveryError, WebhookClient};
use crate::detector::{
    CollectionDetector, CollectionObservation, CombatAchievementDetector,
    CombatAchievementObservation, ContainerDetector, ContainerKind, ContainerObservation,
    DiaryDetector, DiaryTaskObservation, LocationDetector, LocationObservation, LootDetector,
    LootObservation, QuestDetector, QuestObservation, ResourceDetector, ResourceObservation,
    SkillDetector, SkillObservation,
};
use crate::dispatch::{DispatchWorker, Dispatcher};
use crate::event::ChangeEvent;
use crate::filter::SignificanceFilter;
use crate::schedule::{HeartbeatDaemon, ReconcileDaemon, SyncHealth};
use crate::source::PlayerStateSource;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Per-domain detectors, rebuilt on every start so a new session never
/// inherits stale diff baselines.
struct Detectors {
    skill: SkillDetector,
    location: LocationDetector,
    resources: ResourceDetector,
    container: ContainerDetector,
    loot: LootDetector,
    quest: QuestDetector,
    diary: DiaryDetector,
    collection: CollectionDetector,
    combat: CombatAchievementDetector,
}

impl Detectors {
    fn new(config: &TrackerConfig) -> Self {
        Self {
            skill: SkillDetector::new(),
            location: LocationDetector::new(
                config.location_sample_ticks,
                config.min_location_distance,
            ),
            resources: ResourceDetector::new(
                config.resource_sample_ticks,
                config.resource_tolerance,
            ),
            container: ContainerDetector::new(config.container_sample_ticks),
            loot: LootDetector::new(),
            quest: QuestDetector::new(),
            diary: DiaryDetector::new(),
            collection: CollectionDetector::new(),
            combat: CombatAchievementDetector::new(),
        }
    }
}

/// The differential telemetry pipeline.
///
/// Generic over the host's [`PlayerStateSource`] and the delivery client;
/// production uses [`WebhookClient`], tests inject an in-memory recorder.
pub struct Tracker<S: PlayerStateSource, C: DeliveryClient = WebhookClient> {
    config: TrackerConfig,
    source: Arc<S>,
    client: Arc<C>,
    filter: Arc<SignificanceFilter>,
    sync_health: Arc<SyncHealth>,
    detectors: Detectors,
    dispatcher: Option<Dispatcher>,
    shutdown: Option<CancellationToken>,
    handles: Vec<JoinHandle<()>>,
}

impl<S: PlayerStateSource> Tracker<S, WebhookClient> {
    /// Creates a tracker delivering over HTTP to the configured endpoint.
    ///
    /// An empty `base_url` or `auth_token` is not an error here: the
    /// tracker simply refuses to start until configuration is supplied.
    pub fn new(config: TrackerConfig, source: Arc<S>) -> Result<Self, DeliveryError> {
        let config = config.normalized();
        let client = WebhookClient::new(
            &config.base_url,
            &config.auth_token,
            config.request_timeout_secs,
        )?;
        Ok(Self::with_client(config, source, client))
    }
}

impl<S: PlayerStateSource, C: DeliveryClient> Tracker<S, C> {
    /// Creates a tracker with an injected delivery client.
    pub fn with_client(config: TrackerConfig, source: Arc<S>, client: C) -> Self {
        let config = config.normalized();
        let detectors = Detectors::new(&config);
        Self {
            config,
            source,
            client: Arc::new(client),
            filter: Arc::new(SignificanceFilter::new()),
            sync_health: Arc::new(SyncHealth::new()),
            detectors,
            dispatcher: None,
            shutdown: None,
            handles: Vec::new(),
        }
    }

    /// True while the worker tasks are live.
    pub fn is_running(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Spawns the dispatch workers and schedulers.
    ///
    /// Must be called from within a tokio runtime. Idempotent: starting a
    /// running tracker is a no-op, and a start without endpoint
    /// configuration is a logged no-op until the host supplies one. A
    /// stopped tracker can be started again with fresh detector state.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("Tracker already running, ignoring start");
            return;
        }
        if !self.config.is_endpoint_configured() {
            warn!("Webhook endpoint not configured, telemetry stays disabled");
            return;
        }

        info!(base_url = %self.config.base_url, "Starting telemetry pipeline");

        // Fresh baselines and dedup state for the new session.
        self.detectors = Detectors::new(&self.config);
        self.filter.clear();
        self.sync_health.reset();

        let (dispatcher, receivers) = Dispatcher::new();
        let shutdown = CancellationToken::new();

        for (kind, rx) in receivers {
            let worker = DispatchWorker::new(
                kind,
                rx,
                Arc::clone(&self.client),
                Arc::clone(&self.sync_health),
            );
            self.handles.push(tokio::spawn(worker.run(shutdown.clone())));
        }

        let reconcile = ReconcileDaemon::new(
            Arc::clone(&self.source),
            dispatcher.clone(),
            Arc::clone(&self.filter),
            Arc::clone(&self.sync_health),
            Duration::from_secs(self.config.sync_interval_secs),
            self.config.xp_sync_threshold,
            self.config.sync_failure_skip,
        );
        self.handles
            .push(tokio::spawn(reconcile.run(shutdown.clone())));

        if self.config.heartbeat_enabled {
            let heartbeat = HeartbeatDaemon::new(
                Arc::clone(&self.source),
                dispatcher.clone(),
                Duration::from_secs(self.config.heartbeat_interval_secs),
            );
            self.handles
                .push(tokio::spawn(heartbeat.run(shutdown.clone())));
        }

        self.dispatcher = Some(dispatcher);
        self.shutdown = Some(shutdown);
    }

    /// Stops the pipeline, draining queued events within the grace period.
    ///
    /// Idempotent; stopping a stopped tracker is a no-op.
    pub async fn stop(&mut self) {
        let Some(shutdown) = self.shutdown.take() else {
            return;
        };
        info!("Stopping telemetry pipeline");

        // Drop the sender half so drained lanes close, then cancel.
        self.dispatcher = None;
        shutdown.cancel();

        let grace = Duration::from_secs(self.config.shutdown_grace_secs);
        let deadline = Instant::now() + grace;
        for mut handle in self.handles.drain(..) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if tokio::time::timeout(remaining, &mut handle).await.is_err() {
                // Past the deadline the remaining backlog is abandoned; a
                // detached task must not keep sending after stop() returns.
                warn!("Pipeline task did not stop within the grace period, aborting");
                handle.abort();
                let _ = handle.await;
            }
        }

        debug!("Telemetry pipeline stopped");
    }

    /// Feeds a skill observation (level and total XP for one skill).
    pub fn observe_skill(&mut self, obs: SkillObservation) {
        if !self.config.track_skills {
            return;
        }
        let Some(player) = self.subject() else { return };
        let event = self.detectors.skill.observe(&player, obs);
        self.enqueue(event);
    }

    /// Feeds a position observation; call once per host tick.
    pub fn observe_location(&mut self, obs: LocationObservation) {
        if !self.config.share_location {
            return;
        }
        let Some(player) = self.subject() else { return };
        let event = self.detectors.location.observe(&player, obs, &self.filter);
        self.enqueue(event);
    }

    /// Feeds a resource observation; call once per host tick.
    pub fn observe_resources(&mut self, obs: ResourceObservation) {
        if !self.config.share_resources {
            return;
        }
        let Some(player) = self.subject() else { return };
        let event = self
            .detectors
            .resources
            .observe(&player, obs, &self.filter);
        self.enqueue(event);
    }

    /// Feeds a container contents observation.
    pub fn observe_container(&mut self, obs: ContainerObservation) {
        let enabled = match obs.kind {
            ContainerKind::Inventory | ContainerKind::Equipment | ContainerKind::Bank => {
                self.config.share_inventory
            }
            ContainerKind::Stash => self.config.track_stash,
            ContainerKind::GroupStorage => self.config.track_group_storage,
        };
        if !enabled {
            return;
        }
        let Some(player) = self.subject() else { return };
        let event = self.detectors.container.observe(&player, obs);
        self.enqueue(event);
    }

    /// Feeds a drop notification.
    pub fn observe_loot(&mut self, obs: LootObservation) {
        if !self.config.track_drops {
            return;
        }
        let Some(player) = self.subject() else { return };
        let event = self.detectors.loot.observe(&player, obs);
        self.enqueue(event);
    }

    /// Feeds a quest state observation.
    pub fn observe_quest(&mut self, obs: QuestObservation) {
        if !self.config.track_quests {
            return;
        }
        let Some(player) = self.subject() else { return };
        let event = self.detectors.quest.observe(&player, obs);
        self.enqueue(event);
    }

    /// Feeds a diary tier observation.
    pub fn observe_diary_task(&mut self, obs: DiaryTaskObservation) {
        if !self.config.track_diaries {
            return;
        }
        let Some(player) = self.subject() else { return };
        let event = self.detectors.diary.observe(&player, obs);
        self.enqueue(event);
    }

    /// Feeds a collection log notification.
    pub fn observe_collection_entry(&mut self, obs: CollectionObservation) {
        if !self.config.track_collection_log {
            return;
        }
        let Some(player) = self.subject() else { return };
        let event = self.detectors.collection.observe(&player, obs);
        self.enqueue(event);
    }

    /// Feeds a combat achievement notification.
    pub fn observe_combat_achievement(&mut self, obs: CombatAchievementObservation) {
        if !self.config.track_combat_achievements {
            return;
        }
        let Some(player) = self.subject() else { return };
        let event = self.detectors.combat.observe(&player, obs);
        self.enqueue(event);
    }

    /// Subject for outgoing events; `None` while stopped or logged out.
    fn subject(&self) -> Option<String> {
        if !self.is_running() {
            return None;
        }
        self.source.player_name()
    }

    fn enqueue(&self, event: Option<ChangeEvent>) {
        if let (Some(event), Some(dispatcher)) = (event, &self.dispatcher) {
            dispatcher.enqueue(event);
        }
    }
}
