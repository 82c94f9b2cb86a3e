//! Shared vocabulary for the LURE spawn-boost engine.
//!
//! This crate holds the small set of types shared between the engine core,
//! the validation CLI, and host-side glue: the actor identifier, the boost
//! kind enumeration, and the display formatting used in player-facing
//! messages.

pub mod formatting;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable opaque identifier for a boost-eligible actor (a player).
///
/// Wraps the account UUID the host hands us. All per-actor engine state is
/// keyed by this id and nothing else.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Generate a fresh random id (tests and tooling; the host supplies real ids).
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The three boost families an actor can hold.
///
/// An actor carries at most one active boost per kind. Kinds are independent
/// and never interact; applying a new boost of a kind replaces the old one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BoostKind {
    /// Absolute percent chance for legendary spawns while active.
    LegendaryRate,
    /// Absolute percent chance for shiny spawns while active.
    ShinyRate,
    /// Relative-likelihood multiplier for one creature type.
    TypeAffinity,
}

impl BoostKind {
    pub const ALL: [BoostKind; 3] = [
        BoostKind::LegendaryRate,
        BoostKind::ShinyRate,
        BoostKind::TypeAffinity,
    ];

    /// Stable key used in persisted documents and definition files.
    pub fn key(self) -> &'static str {
        match self {
            BoostKind::LegendaryRate => "legendary",
            BoostKind::ShinyRate => "shiny",
            BoostKind::TypeAffinity => "affinity",
        }
    }

    /// Parse a persisted/config key back into a kind.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "legendary" => Some(BoostKind::LegendaryRate),
            "shiny" => Some(BoostKind::ShinyRate),
            "affinity" => Some(BoostKind::TypeAffinity),
            _ => None,
        }
    }

    /// Player-facing label used in chat notifications.
    pub fn label(self) -> &'static str {
        match self {
            BoostKind::LegendaryRate => "Legendary Lure",
            BoostKind::ShinyRate => "Shiny Lure",
            BoostKind::TypeAffinity => "Type Lure",
        }
    }

    /// Whether strength is an absolute percent chance (rate kinds) rather
    /// than a multiplier.
    pub fn is_rate(self) -> bool {
        matches!(self, BoostKind::LegendaryRate | BoostKind::ShinyRate)
    }
}
