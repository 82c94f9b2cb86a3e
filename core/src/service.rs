//! Engine assembly and the inbound API.
//!
//! One [`BoostService`] is constructed at plugin startup with the host bridge
//! and document store, and handed by reference to the item layer, the command
//! layer, and the host glue. Everything the thin item/command layer may call
//! lives here: `apply`, `has`, `current_chance`, `current_affinity`, and
//! `use_definition`. The host glue feeds lifecycle signals through
//! [`SignalHandler`] and spawn candidates through [`BoostService::admit`].

use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use lure_types::formatting::format_remaining;
use lure_types::{ActorId, BoostKind};

use crate::boosts::{Boost, BoostError, EffectStore};
use crate::config::EngineConfig;
use crate::events::{HostSignal, SignalHandler};
use crate::gate;
use crate::host::{HostBridge, SpawnCandidate};
use crate::items::DefinitionSet;
use crate::persist::{DocumentStore, PersistWriter, PersistenceAdapter};
use crate::scheduler::{EffectScheduler, SpawnRateLimiter};
use crate::spawn::{CandidateAction, SpawnPipelineAdapter};

/// Failure to consume a defined boost item.
#[derive(Debug, thiserror::Error)]
pub enum ItemUseError {
    #[error("unknown or disabled item: {0}")]
    UnknownItem(String),
    #[error(transparent)]
    Invalid(#[from] BoostError),
}

pub struct BoostService {
    config: EngineConfig,
    store: Arc<EffectStore>,
    host: Arc<dyn HostBridge>,
    persistence: Arc<PersistenceAdapter>,
    scheduler: EffectScheduler,
    pipeline: SpawnPipelineAdapter,
    limiter: Arc<SpawnRateLimiter>,
    definitions: RwLock<DefinitionSet>,
    writer: Mutex<Option<PersistWriter>>,
}

impl BoostService {
    pub fn new(
        config: EngineConfig,
        host: Arc<dyn HostBridge>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        let store = Arc::new(EffectStore::new());
        let limiter = Arc::new(SpawnRateLimiter::new(Duration::from_secs(
            config.forced_spawn_cooldown_secs,
        )));
        let persistence = Arc::new(PersistenceAdapter::new(documents));
        let scheduler = EffectScheduler::new(
            Arc::clone(&store),
            Arc::clone(&host),
            Arc::clone(&limiter),
            config.clone(),
        );
        let pipeline = SpawnPipelineAdapter::new(
            Arc::clone(&store),
            Arc::clone(&host),
            Arc::clone(&limiter),
            config.clone(),
        );
        Self {
            config,
            store,
            host,
            persistence,
            scheduler,
            pipeline,
            limiter,
            definitions: RwLock::new(DefinitionSet::new()),
            writer: Mutex::new(None),
        }
    }

    /// Switch persistence to the deferred background writer. Requires an
    /// ambient tokio runtime; until called, saves run inline on the calling
    /// thread.
    pub fn start_writer(&self) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if writer.is_none() {
            *writer = Some(PersistWriter::spawn(
                Arc::clone(&self.store),
                Arc::clone(&self.persistence),
                Duration::from_secs(self.config.flush_interval_secs),
            ));
        }
    }

    /// Stop the background writer (draining its queue) and flush every
    /// boosted actor. Call once at plugin shutdown.
    pub async fn shutdown(&self) {
        let writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(writer) = writer {
            writer.shutdown().await;
        }
        self.flush_all();
    }

    /// Synchronously persist every actor currently holding a boost.
    pub fn flush_all(&self) {
        for actor in self.store.active_actors() {
            self.save_now(actor);
        }
    }

    /// Replace the loaded item definitions (startup or operator reload).
    pub fn set_definitions(&self, definitions: DefinitionSet) {
        let mut current = self
            .definitions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = definitions;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inbound API — the only calls the item/command layer makes
    // ─────────────────────────────────────────────────────────────────────

    /// Grant a boost directly (admin commands). Validates and persists.
    pub fn apply(
        &self,
        actor: ActorId,
        kind: BoostKind,
        duration_ticks: u32,
        strength: f32,
        payload: Option<String>,
    ) -> Result<(), BoostError> {
        self.store
            .apply(actor, kind, duration_ticks, strength, payload)?;
        self.queue_save(actor);
        Ok(())
    }

    /// Consume a defined boost item: applies its boost and tells the player.
    pub fn use_definition(&self, actor: ActorId, item_id: &str) -> Result<(), ItemUseError> {
        let (name, kind, duration_ticks, strength, payload) = {
            let definitions = self
                .definitions
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let item = definitions
                .get(item_id)
                .filter(|item| item.enabled)
                .ok_or_else(|| ItemUseError::UnknownItem(item_id.to_string()))?;
            (
                item.name.clone(),
                item.kind,
                item.duration_ticks,
                item.strength,
                item.type_name.clone(),
            )
        };
        self.apply(actor, kind, duration_ticks, strength, payload)?;
        self.host.notify(
            actor,
            &format!(
                "{} activated: {} for {}.",
                name,
                kind.label(),
                format_remaining(duration_ticks)
            ),
        );
        Ok(())
    }

    pub fn has(&self, actor: ActorId, kind: BoostKind) -> bool {
        self.store.has(actor, kind)
    }

    pub fn get(&self, actor: ActorId, kind: BoostKind) -> Option<Boost> {
        self.store.get(actor, kind)
    }

    /// The absolute chance (percent) the host should roll for a rate kind.
    pub fn current_chance(&self, actor: ActorId, kind: BoostKind) -> f32 {
        gate::current_chance(kind, self.store.get(actor, kind).as_ref(), &self.config)
    }

    /// The type name of the actor's active affinity boost, if any.
    pub fn current_affinity(&self, actor: ActorId) -> Option<String> {
        self.store.current_affinity(actor)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Host lifecycle
    // ─────────────────────────────────────────────────────────────────────

    fn on_join(&self, actor: ActorId) {
        let state = self.persistence.load(actor);
        let restored = !state.is_empty();
        self.store.restore(state);
        if restored {
            self.host
                .notify(actor, "Your active lures carried over from last session.");
        }
    }

    /// Final flush is synchronous: queued writes could outlive the actor's
    /// in-memory state and lose the last ticks of duration.
    fn on_disconnect(&self, actor: ActorId) {
        self.scheduler.forget(actor);
        self.limiter.forget(actor);
        let state = self.store.evict(actor);
        if let Err(e) = self.persistence.save(actor, &state) {
            tracing::warn!(%actor, error = %e,
                "disconnect flush failed; this session's remaining ticks may be lost");
        }
    }

    fn on_tick(&self, actor: ActorId, now: Instant) {
        if self.scheduler.on_tick(actor, now) {
            self.queue_save(actor);
        }
    }

    /// Admit or cancel one spawn candidate. Called synchronously from the
    /// host's spawn event.
    pub fn admit(&self, candidate: &SpawnCandidate) -> CandidateAction {
        self.pipeline.admit(candidate, Instant::now())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Persistence plumbing
    // ─────────────────────────────────────────────────────────────────────

    fn queue_save(&self, actor: ActorId) {
        let writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match writer.as_ref() {
            Some(writer) => writer.queue_save(actor),
            None => self.save_now(actor),
        }
    }

    fn save_now(&self, actor: ActorId) {
        let state = self.store.snapshot(actor);
        if let Err(e) = self.persistence.save(actor, &state) {
            tracing::warn!(%actor, error = %e, "save failed; retrying at next trigger");
        }
    }
}

impl SignalHandler for BoostService {
    fn handle_signal(&self, signal: &HostSignal) {
        match signal {
            HostSignal::ActorJoined { actor } => self.on_join(*actor),
            HostSignal::ActorDisconnected { actor } => self.on_disconnect(*actor),
            HostSignal::ActorTick { actor } => self.on_tick(*actor, Instant::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::DefinitionConfig;
    use crate::testutil::{MemoryDocuments, RecordingHost};

    struct Fixture {
        service: BoostService,
        host: Arc<RecordingHost>,
        docs: Arc<MemoryDocuments>,
    }

    fn fixture() -> Fixture {
        let host = Arc::new(RecordingHost::new());
        let docs = Arc::new(MemoryDocuments::new());
        let service = BoostService::new(
            EngineConfig::default(),
            Arc::clone(&host) as Arc<dyn HostBridge>,
            Arc::clone(&docs) as Arc<dyn DocumentStore>,
        );
        Fixture { service, host, docs }
    }

    fn tick(service: &BoostService, actor: ActorId, times: u32) {
        let now = Instant::now();
        for _ in 0..times {
            service.on_tick(actor, now);
        }
    }

    #[test]
    fn test_disconnect_and_reconnect_restores_remaining_ticks() {
        let f = fixture();
        let actor = ActorId::random();

        f.service
            .apply(actor, BoostKind::LegendaryRate, 40, 80.0, None)
            .expect("valid boost");
        tick(&f.service, actor, 3);

        f.service
            .handle_signal(&HostSignal::ActorDisconnected { actor });
        assert!(!f.service.has(actor, BoostKind::LegendaryRate));

        f.service.handle_signal(&HostSignal::ActorJoined { actor });
        let boost = f
            .service
            .get(actor, BoostKind::LegendaryRate)
            .expect("restored");
        assert_eq!(boost.remaining_ticks, 37, "not reset, not lost");
    }

    #[test]
    fn test_expiry_notifies_and_persists() {
        let f = fixture();
        let actor = ActorId::random();

        f.service
            .apply(actor, BoostKind::ShinyRate, 2, 10.0, None)
            .expect("valid boost");
        tick(&f.service, actor, 2);

        assert!(!f.service.has(actor, BoostKind::ShinyRate));
        let notifications = f.host.notifications();
        assert!(
            notifications
                .iter()
                .any(|(to, msg)| *to == actor && msg.contains("worn off")),
            "expiry message expected, got {notifications:?}"
        );
        // Expiry save ran inline (no writer): the stale keys are gone
        assert!(!f.docs.raw(actor).contains_key("lure:shiny:ticks"));
    }

    #[test]
    fn test_use_definition_applies_and_notifies() {
        let f = fixture();
        let actor = ActorId::random();

        let config: DefinitionConfig = toml::from_str(
            r#"
[[item]]
id = "blazing_lure"
name = "Blazing Lure"
kind = "type_affinity"
duration_ticks = 2400
strength = 5.0
type_name = "fire"
"#,
        )
        .unwrap();
        let mut set = DefinitionSet::new();
        set.add_config(config);
        f.service.set_definitions(set);

        f.service
            .use_definition(actor, "blazing_lure")
            .expect("item use");
        assert_eq!(f.service.current_affinity(actor).as_deref(), Some("fire"));
        assert!(
            f.host
                .notifications()
                .iter()
                .any(|(_, msg)| msg.contains("Blazing Lure activated"))
        );

        assert!(matches!(
            f.service.use_definition(actor, "missing_item"),
            Err(ItemUseError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_current_chance_reflects_boost_then_base() {
        let f = fixture();
        let actor = ActorId::random();
        let base = EngineConfig::default().base_legendary_percent;

        assert_eq!(f.service.current_chance(actor, BoostKind::LegendaryRate), base);
        f.service
            .apply(actor, BoostKind::LegendaryRate, 100, 85.0, None)
            .expect("valid boost");
        assert_eq!(f.service.current_chance(actor, BoostKind::LegendaryRate), 85.0);
    }

    #[test]
    fn test_rejected_apply_does_not_persist() {
        let f = fixture();
        let actor = ActorId::random();

        assert!(
            f.service
                .apply(actor, BoostKind::ShinyRate, 0, 10.0, None)
                .is_err()
        );
        assert!(f.docs.raw(actor).is_empty());
    }
}
