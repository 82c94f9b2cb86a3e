//! Authoritative in-memory table of active boosts.
//!
//! One store instance is constructed at service startup and handed by
//! reference to every consumer (tick scheduler, spawn adapter, persistence);
//! there is no global state.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::Local;
use hashbrown::HashMap;
use lure_types::{ActorId, BoostKind};

use super::active::{ActorEffectState, Boost};

/// Validation failure on [`EffectStore::apply`].
///
/// The store never clamps: a silently clamped strength or duration would
/// change observable spawn behavior without anyone noticing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoostError {
    #[error("invalid boost parameters: {0}")]
    InvalidParameters(String),
}

/// Result of ticking one boost inside [`EffectStore::decrement_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub kind: BoostKind,
    /// Ticks left after this decrement.
    pub remaining_ticks: u32,
    /// True exactly once per boost: on the call that took it to zero.
    pub just_expired: bool,
}

#[derive(Debug, Default)]
struct ActorBoosts {
    boosts: HashMap<BoostKind, Boost>,
}

/// Single source of truth for active boosts.
///
/// Each actor's table sits behind its own mutex so the tick callback and the
/// spawn pipeline never contend across unrelated actors, and `apply` /
/// `decrement_all` for the same actor are mutually exclusive. The outer map
/// is write-locked only to add or evict whole actors.
#[derive(Debug, Default)]
pub struct EffectStore {
    actors: RwLock<HashMap<ActorId, Arc<Mutex<ActorBoosts>>>>,
}

/// A poisoned table is still structurally valid (the panicking thread can
/// only have left a fully-written boost behind); recover the guard rather
/// than wedge the host's tick thread.
fn lock_table(table: &Mutex<ActorBoosts>) -> MutexGuard<'_, ActorBoosts> {
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared parameter validation for `apply` and for persisted data on load.
pub(crate) fn validate_params(
    kind: BoostKind,
    duration_ticks: u32,
    strength: f32,
    payload: Option<&str>,
) -> Result<(), BoostError> {
    if duration_ticks == 0 {
        return Err(BoostError::InvalidParameters(
            "duration must be at least one tick".to_string(),
        ));
    }
    match kind {
        BoostKind::LegendaryRate | BoostKind::ShinyRate => {
            if !(0.0..=100.0).contains(&strength) {
                return Err(BoostError::InvalidParameters(format!(
                    "{} strength {} outside percent range [0, 100]",
                    kind.key(),
                    strength
                )));
            }
        }
        BoostKind::TypeAffinity => {
            if !strength.is_finite() || strength < 1.0 {
                return Err(BoostError::InvalidParameters(format!(
                    "affinity multiplier {} must be at least 1.0",
                    strength
                )));
            }
            if payload.is_none_or(str::is_empty) {
                return Err(BoostError::InvalidParameters(
                    "affinity boost requires a type name".to_string(),
                ));
            }
        }
    }
    Ok(())
}

impl EffectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn existing(&self, actor: ActorId) -> Option<Arc<Mutex<ActorBoosts>>> {
        self.actors
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&actor)
            .cloned()
    }

    fn entry(&self, actor: ActorId) -> Arc<Mutex<ActorBoosts>> {
        if let Some(entry) = self.existing(actor) {
            return entry;
        }
        self.actors
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(actor)
            .or_default()
            .clone()
    }

    /// Insert or replace the boost of `kind` for `actor`.
    ///
    /// Replacement is total: no stacking, no averaging of the previous
    /// boost's duration or strength. Rejects without mutating on bad
    /// parameters.
    pub fn apply(
        &self,
        actor: ActorId,
        kind: BoostKind,
        duration_ticks: u32,
        strength: f32,
        payload: Option<String>,
    ) -> Result<(), BoostError> {
        validate_params(kind, duration_ticks, strength, payload.as_deref())?;
        // payload is only meaningful for affinity boosts
        let payload = if kind == BoostKind::TypeAffinity {
            payload
        } else {
            None
        };

        let entry = self.entry(actor);
        let mut table = lock_table(&entry);
        table.boosts.insert(
            kind,
            Boost {
                kind,
                remaining_ticks: duration_ticks,
                strength,
                payload,
                override_base: true,
                applied_at: Local::now().naive_local(),
            },
        );
        Ok(())
    }

    /// Current boost of `kind`, or `None` if absent or expired. O(1).
    pub fn get(&self, actor: ActorId, kind: BoostKind) -> Option<Boost> {
        let entry = self.existing(actor)?;
        let table = lock_table(&entry);
        table
            .boosts
            .get(&kind)
            .filter(|boost| !boost.is_expired())
            .cloned()
    }

    pub fn has(&self, actor: ActorId, kind: BoostKind) -> bool {
        self.get(actor, kind).is_some()
    }

    /// The affinity type name of the actor's live `TypeAffinity` boost.
    pub fn current_affinity(&self, actor: ActorId) -> Option<String> {
        self.get(actor, BoostKind::TypeAffinity)
            .and_then(|boost| boost.payload)
    }

    /// True if the actor holds at least one active boost. Cheap early-out
    /// for the per-tick path.
    pub fn has_any(&self, actor: ActorId) -> bool {
        match self.existing(actor) {
            Some(entry) => {
                let table = lock_table(&entry);
                table.boosts.values().any(|boost| !boost.is_expired())
            }
            None => false,
        }
    }

    /// Decrement every present boost by one tick, reclaim the ones that hit
    /// zero, and report each boost's post-decrement state.
    ///
    /// Holding the actor's lock for the whole pass makes this atomic against
    /// a concurrent `apply`: an apply landing mid-tick is ordered either
    /// before (and gets decremented) or after (and is untouched), never lost.
    pub fn decrement_all(&self, actor: ActorId) -> Vec<TickOutcome> {
        let Some(entry) = self.existing(actor) else {
            return Vec::new();
        };
        let mut table = lock_table(&entry);

        let mut outcomes = Vec::new();
        for kind in BoostKind::ALL {
            if let Some(boost) = table.boosts.get_mut(&kind) {
                boost.remaining_ticks = boost.remaining_ticks.saturating_sub(1);
                outcomes.push(TickOutcome {
                    kind,
                    remaining_ticks: boost.remaining_ticks,
                    just_expired: boost.remaining_ticks == 0,
                });
            }
        }
        table.boosts.retain(|_, boost| boost.remaining_ticks > 0);
        outcomes
    }

    /// Read-only copy of the actor's table for persistence and diagnostics.
    pub fn snapshot(&self, actor: ActorId) -> ActorEffectState {
        match self.existing(actor) {
            Some(entry) => {
                let table = lock_table(&entry);
                ActorEffectState {
                    actor,
                    boosts: table.boosts.clone(),
                }
            }
            None => ActorEffectState::empty(actor),
        }
    }

    /// Install a loaded boost table for a joining actor, replacing anything
    /// already in memory for them. Expired entries are dropped on the way in.
    pub fn restore(&self, state: ActorEffectState) {
        let entry = self.entry(state.actor);
        let mut table = lock_table(&entry);
        table.boosts = state
            .boosts
            .into_iter()
            .filter(|(_, boost)| !boost.is_expired())
            .collect();
    }

    /// Remove an actor's in-memory state entirely, returning the final
    /// snapshot for the caller's synchronous disconnect flush.
    pub fn evict(&self, actor: ActorId) -> ActorEffectState {
        let removed = self
            .actors
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&actor);
        match removed {
            Some(entry) => {
                let table = lock_table(&entry);
                ActorEffectState {
                    actor,
                    boosts: table.boosts.clone(),
                }
            }
            None => ActorEffectState::empty(actor),
        }
    }

    /// Actors currently holding at least one active boost (periodic flush
    /// sweep).
    pub fn active_actors(&self) -> Vec<ActorId> {
        let actors = self
            .actors
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        actors
            .iter()
            .filter(|(_, entry)| {
                let table = lock_table(entry);
                table.boosts.values().any(|boost| !boost.is_expired())
            })
            .map(|(id, _)| *id)
            .collect()
    }
}
