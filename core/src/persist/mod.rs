//! Boost persistence across sessions.
//!
//! Each boost kind serializes to a small fixed key set inside the actor's
//! host-attached document (`lure:<kind>:ticks`, `:strength`, plus `:override`
//! for rate kinds and `:type` for affinity). Absence of the `ticks` key means
//! no boost of that kind. Loading is forgiving: malformed or expired entries
//! are dropped, never fatal, so a corrupt document can at worst cost an actor
//! their boost, not their join.

mod document;
mod writer;

#[cfg(test)]
mod persist_tests;

pub use document::{DocumentKeys, DocumentStore, PersistError};
pub use writer::PersistWriter;

use std::sync::Arc;

use chrono::Local;
use lure_types::{ActorId, BoostKind};
use serde_json::{Value, json};

use crate::boosts::{ActorEffectState, Boost, validate_params};

fn field(kind: BoostKind, name: &str) -> String {
    format!("lure:{}:{}", kind.key(), name)
}

/// Bridges actor boost state to the host's persistent document.
pub struct PersistenceAdapter {
    documents: Arc<dyn DocumentStore>,
}

impl PersistenceAdapter {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Load an actor's boosts on join. Read failures and malformed entries
    /// degrade to "no boosts"; a join is never blocked by persistence.
    pub fn load(&self, actor: ActorId) -> ActorEffectState {
        let keys = match self.documents.load(actor) {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(%actor, error = %e, "boost document unreadable; starting clean");
                return ActorEffectState::empty(actor);
            }
        };
        decode(actor, &keys)
    }

    /// Write the actor's current boosts, replacing the whole engine key set
    /// so kinds without an active boost lose their fields.
    pub fn save(&self, actor: ActorId, state: &ActorEffectState) -> Result<(), PersistError> {
        self.documents.store(actor, encode(state))
    }
}

fn encode(state: &ActorEffectState) -> DocumentKeys {
    let mut keys = DocumentKeys::new();
    for boost in state.active() {
        let kind = boost.kind;
        keys.insert(field(kind, "ticks"), json!(boost.remaining_ticks));
        keys.insert(field(kind, "strength"), json!(boost.strength));
        if kind.is_rate() {
            keys.insert(field(kind, "override"), json!(boost.override_base));
        }
        if let Some(payload) = &boost.payload {
            keys.insert(field(kind, "type"), json!(payload));
        }
    }
    keys
}

fn decode(actor: ActorId, keys: &DocumentKeys) -> ActorEffectState {
    let mut state = ActorEffectState::empty(actor);
    for kind in BoostKind::ALL {
        let Some(ticks_value) = keys.get(&field(kind, "ticks")) else {
            continue;
        };
        // An expired entry is normal leftover data, not corruption
        let Some(ticks) = ticks_value
            .as_u64()
            .and_then(|t| u32::try_from(t).ok())
        else {
            tracing::warn!(%actor, kind = kind.key(), "malformed tick count; dropping boost");
            continue;
        };
        if ticks == 0 {
            continue;
        }

        let Some(strength) = keys.get(&field(kind, "strength")).and_then(Value::as_f64) else {
            tracing::warn!(%actor, kind = kind.key(), "missing or malformed strength; dropping boost");
            continue;
        };
        let strength = strength as f32;
        let payload = keys
            .get(&field(kind, "type"))
            .and_then(Value::as_str)
            .map(str::to_string);
        // Absent flag means the documented override contract; `false` only
        // comes from legacy multiplier-mode data
        let override_base = keys
            .get(&field(kind, "override"))
            .and_then(Value::as_bool)
            .unwrap_or(true);

        if let Err(e) = validate_params(kind, ticks, strength, payload.as_deref()) {
            tracing::warn!(%actor, kind = kind.key(), error = %e, "invalid persisted boost; dropping");
            continue;
        }

        state.boosts.insert(
            kind,
            Boost {
                kind,
                remaining_ticks: ticks,
                strength,
                payload,
                override_base,
                applied_at: Local::now().naive_local(),
            },
        );
    }
    state
}
