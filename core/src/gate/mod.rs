//! Pure admission decisions.
//!
//! Nothing here touches the host or the store. Callers gather the inputs
//! (candidate type tags, the governing boost, nearby actors) and act on the
//! verdict; every upstream failure path resolves to `Allow`, so a broken
//! lookup can never starve the world of spawns.

use lure_types::{ActorId, BoostKind};
use rand::Rng;

use crate::boosts::Boost;
use crate::config::EngineConfig;
use crate::host::NearbyActor;


/// Outcome of admitting one spawn candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionVerdict {
    Allow,
    Block,
    /// Block, and ask the host for a compensating spawn of the given type.
    BlockAndReplace(String),
}

/// Affinity multipliers at or above this count as "strong".
const STRONG_AFFINITY: f32 = 5.0;
/// Block rate for strong affinities. Deliberately short of 1.0 so even a
/// strong lure leaves some off-type spawns in the world.
const STRONG_BLOCK_CHANCE: f64 = 0.85;
/// Ceiling on the weak-affinity block curve.
const WEAK_BLOCK_CEILING: f64 = 0.9;
/// Chance that a block is upgraded to a compensating replacement request.
const REPLACE_CHANCE: f64 = 0.30;

/// Probability that a non-matching candidate is blocked under an affinity of
/// the given strength.
///
/// Strong affinities block at a flat near-exclusive rate; weaker ones follow
/// `1 - 1/strength`, degrading to a no-op as strength approaches 1.
pub fn block_chance(strength: f32) -> f64 {
    if strength >= STRONG_AFFINITY {
        STRONG_BLOCK_CHANCE
    } else {
        (1.0 - 1.0 / strength as f64).clamp(0.0, WEAK_BLOCK_CEILING)
    }
}

/// Decide the fate of one candidate under the governing affinity boost.
///
/// Candidates carrying the boosted type are never blocked, whatever the
/// strength; the engine only ever thins the off-type population.
pub fn decide<R: Rng + ?Sized>(
    candidate_tags: &[String],
    boost: &Boost,
    rng: &mut R,
) -> AdmissionVerdict {
    let Some(wanted) = boost.affinity_type() else {
        return AdmissionVerdict::Allow;
    };
    if candidate_tags
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(wanted))
    {
        return AdmissionVerdict::Allow;
    }
    if rng.gen_range(0.0..1.0) < block_chance(boost.strength) {
        if rng.gen_range(0.0..1.0) < REPLACE_CHANCE {
            AdmissionVerdict::BlockAndReplace(wanted.to_string())
        } else {
            AdmissionVerdict::Block
        }
    } else {
        AdmissionVerdict::Allow
    }
}

/// The active absolute chance (percent) the host should roll against for a
/// rate kind. The engine exposes the number; the host performs its own roll.
pub fn current_chance(kind: BoostKind, boost: Option<&Boost>, config: &EngineConfig) -> f32 {
    let base = config.base_percent(kind);
    match boost {
        Some(b) if b.kind == kind && !b.is_expired() => {
            if b.override_base {
                b.strength
            } else {
                // Legacy multiplier-mode data: honored on read, never written
                tracing::warn!(
                    kind = kind.key(),
                    "deprecated multiplier-mode boost; scaling the base chance"
                );
                (base * b.strength).min(100.0)
            }
        }
        _ => base,
    }
}

/// Pick the actor whose boost governs a candidate: minimum distance, ties
/// broken by actor id so the choice is deterministic.
pub fn governing_actor(candidates: &[NearbyActor]) -> Option<ActorId> {
    candidates
        .iter()
        .min_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|a| a.id)
}
