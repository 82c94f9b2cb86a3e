//! Spawn pipeline boundary.
//!
//! The only component that talks to the host's spawn pipeline. The host glue
//! feeds it every "entity about to join the world" notification (already
//! filtered to recognizable wild creatures), and applies the returned action
//! to the underlying event. Replacement requests ride the same per-actor
//! cooldown as the scheduler's nudges.

mod dedup;


use std::sync::{Arc, Mutex};
use std::time::Instant;

use lure_types::BoostKind;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::boosts::EffectStore;
use crate::config::EngineConfig;
use crate::gate::{self, AdmissionVerdict};
use crate::host::{HostBridge, NearbyActor, SpawnCandidate};
use crate::scheduler::SpawnRateLimiter;
use dedup::SeenCache;

/// What the host glue should do with the current join event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateAction {
    /// Let the join proceed untouched.
    Proceed,
    /// Cancel the join event.
    Cancel,
}

/// Receives spawn candidates, consults the gate, and acts on the verdict.
pub struct SpawnPipelineAdapter {
    store: Arc<EffectStore>,
    host: Arc<dyn HostBridge>,
    limiter: Arc<SpawnRateLimiter>,
    config: EngineConfig,
    seen: Mutex<SeenCache>,
    rng: Mutex<StdRng>,
}

impl SpawnPipelineAdapter {
    pub fn new(
        store: Arc<EffectStore>,
        host: Arc<dyn HostBridge>,
        limiter: Arc<SpawnRateLimiter>,
        config: EngineConfig,
    ) -> Self {
        Self::with_rng(store, host, limiter, config, StdRng::from_entropy())
    }

    /// Seeded constructor so admission statistics are reproducible in tests.
    pub fn with_rng(
        store: Arc<EffectStore>,
        host: Arc<dyn HostBridge>,
        limiter: Arc<SpawnRateLimiter>,
        config: EngineConfig,
        rng: StdRng,
    ) -> Self {
        let seen = Mutex::new(SeenCache::new(config.dedup_capacity));
        Self {
            store,
            host,
            limiter,
            config,
            seen,
            rng: Mutex::new(rng),
        }
    }

    /// Admit or reject one spawn candidate.
    ///
    /// Evaluates each candidate instance at most once; repeat notifications
    /// for a seen instance pass through untouched. Every failure path allows
    /// the spawn — the gate fails open.
    pub fn admit(&self, candidate: &SpawnCandidate, now: Instant) -> CandidateAction {
        {
            let mut seen = self
                .seen
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if !seen.insert(candidate.instance_id) {
                return CandidateAction::Proceed;
            }
        }

        let nearby = match self
            .host
            .actors_near(candidate.location, self.config.affinity_radius)
        {
            Ok(nearby) => nearby,
            Err(e) => {
                tracing::warn!(error = %e, identity = %candidate.identity,
                    "nearby-actor lookup failed; allowing spawn");
                return CandidateAction::Proceed;
            }
        };

        let boosted: Vec<NearbyActor> = nearby
            .into_iter()
            .filter(|near| self.store.has(near.id, BoostKind::TypeAffinity))
            .collect();
        let Some(actor) = gate::governing_actor(&boosted) else {
            return CandidateAction::Proceed;
        };
        let Some(boost) = self.store.get(actor, BoostKind::TypeAffinity) else {
            return CandidateAction::Proceed;
        };

        let verdict = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            gate::decide(&candidate.type_tags, &boost, &mut *rng)
        };

        match verdict {
            AdmissionVerdict::Allow => CandidateAction::Proceed,
            AdmissionVerdict::Block => {
                tracing::debug!(identity = %candidate.identity, %actor, "blocked off-type spawn");
                CandidateAction::Cancel
            }
            AdmissionVerdict::BlockAndReplace(spec) => {
                if self.limiter.try_acquire(actor, now) {
                    self.host.request_spawn(actor, &spec);
                }
                tracing::debug!(identity = %candidate.identity, %actor, replacement = %spec,
                    "blocked off-type spawn, replacement requested");
                CandidateAction::Cancel
            }
        }
    }
}
