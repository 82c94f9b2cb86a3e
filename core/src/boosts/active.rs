use chrono::NaiveDateTime;
use hashbrown::HashMap;
use lure_types::{ActorId, BoostKind};

/// A single timed boost held by one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Boost {
    pub kind: BoostKind,
    /// Host ticks left. Zero means logically absent; the store reclaims such
    /// entries and readers must treat them as no boost.
    pub remaining_ticks: u32,
    /// Absolute percent chance in [0, 100] for rate kinds; multiplier >= 1.0
    /// for `TypeAffinity`.
    pub strength: f32,
    /// Affinity type name. Required non-empty for `TypeAffinity`, unused
    /// otherwise.
    pub payload: Option<String>,
    /// Rate kinds: `strength` replaces the host base chance outright.
    /// `false` only appears when legacy persisted data is restored and is
    /// honored as a deprecated multiplier on the base chance; the engine
    /// never writes it for new boosts.
    pub override_base: bool,
    /// Wall-clock time the boost was applied or restored. Diagnostics only;
    /// durations always count in ticks.
    pub applied_at: NaiveDateTime,
}

impl Boost {
    pub fn is_expired(&self) -> bool {
        self.remaining_ticks == 0
    }

    /// The affinity type this boost favors, if it is a live `TypeAffinity`.
    pub fn affinity_type(&self) -> Option<&str> {
        if self.kind == BoostKind::TypeAffinity && !self.is_expired() {
            self.payload.as_deref()
        } else {
            None
        }
    }
}

/// Read-only copy of one actor's boost table.
///
/// Produced by [`EffectStore::snapshot`](super::EffectStore::snapshot) for
/// persistence and diagnostics; mutating a copy has no effect on the store.
#[derive(Debug, Clone)]
pub struct ActorEffectState {
    pub actor: ActorId,
    pub boosts: HashMap<BoostKind, Boost>,
}

impl ActorEffectState {
    pub fn empty(actor: ActorId) -> Self {
        Self {
            actor,
            boosts: HashMap::new(),
        }
    }

    /// Active (non-expired) boosts only, in kind order for deterministic
    /// iteration.
    pub fn active(&self) -> impl Iterator<Item = &Boost> {
        BoostKind::ALL
            .iter()
            .filter_map(|kind| self.boosts.get(kind))
            .filter(|boost| !boost.is_expired())
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}
