//! Tick-driven boost decay and notifications.
//!
//! The host's per-actor tick callback is the only time source; the scheduler
//! never runs threads or timers of its own and never blocks the calling
//! thread. Persistence triggered here is reported back to the caller, which
//! hands it to the deferred writer.

mod limiter;


pub use limiter::SpawnRateLimiter;

use std::sync::{Arc, Mutex};
use std::time::Instant;

use hashbrown::HashMap;
use lure_types::formatting::format_remaining;
use lure_types::{ActorId, BoostKind};

use crate::boosts::EffectStore;
use crate::config::EngineConfig;
use crate::host::HostBridge;

/// Drives boost durations forward, one host tick at a time.
pub struct EffectScheduler {
    store: Arc<EffectStore>,
    host: Arc<dyn HostBridge>,
    limiter: Arc<SpawnRateLimiter>,
    config: EngineConfig,
    /// Ticks observed per actor since join, for the reminder cadence.
    ticks: Mutex<HashMap<ActorId, u64>>,
}

impl EffectScheduler {
    pub fn new(
        store: Arc<EffectStore>,
        host: Arc<dyn HostBridge>,
        limiter: Arc<SpawnRateLimiter>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            host,
            limiter,
            config,
            ticks: Mutex::new(HashMap::new()),
        }
    }

    /// Advance one actor by one tick.
    ///
    /// Returns true when at least one boost expired and the actor's state
    /// needs to be persisted.
    pub fn on_tick(&self, actor: ActorId, now: Instant) -> bool {
        if !self.store.has_any(actor) {
            return false;
        }

        let tick = {
            let mut ticks = self
                .ticks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let counter = ticks.entry(actor).or_insert(0);
            *counter += 1;
            *counter
        };
        let on_cadence = tick % u64::from(self.config.reminder_cadence_ticks.max(1)) == 0;

        let mut needs_save = false;
        for outcome in self.store.decrement_all(actor) {
            if outcome.just_expired {
                self.host
                    .notify(actor, &format!("{} has worn off.", outcome.kind.label()));
                needs_save = true;
                continue;
            }

            if outcome.remaining_ticks == self.config.near_expiry_ticks {
                self.host.notify(
                    actor,
                    &format!(
                        "{} is about to expire ({} left).",
                        outcome.kind.label(),
                        format_remaining(outcome.remaining_ticks)
                    ),
                );
            } else if on_cadence {
                self.host.notify(
                    actor,
                    &format!(
                        "{}: {} remaining.",
                        outcome.kind.label(),
                        format_remaining(outcome.remaining_ticks)
                    ),
                );
            }

            // Affinity boosts periodically nudge the host toward the favored
            // type; the shared limiter keeps the side channel from flooding.
            if outcome.kind == BoostKind::TypeAffinity
                && on_cadence
                && self.limiter.try_acquire(actor, now)
            {
                if let Some(wanted) = self.store.current_affinity(actor) {
                    self.host.request_spawn(actor, &wanted);
                }
            }
        }
        needs_save
    }

    /// Drop per-actor bookkeeping on disconnect.
    pub fn forget(&self, actor: ActorId) {
        self.ticks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&actor);
    }
}
