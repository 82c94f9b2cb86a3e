//! The narrow host-facing surface.
//!
//! Everything the engine asks of (or tells) the game host goes through
//! [`HostBridge`]. A host-specific adapter implements it; on a live server
//! that adapter is the one place that reaches into the spawning mod's
//! internals. The engine core never goes around it, so swapping hosts (or
//! testing without one) means swapping this trait's implementation.

use lure_types::ActorId;

/// World-space position of a spawn candidate.
///
/// Opaque to the engine except as an argument to the host's proximity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A creature instance the host is about to introduce into the world.
///
/// Assembled by the host adapter from its "entity about to join" event, after
/// the adapter has already filtered to recognizable wild-spawned creatures.
/// The engine never constructs one and never retains one past the admission
/// decision.
#[derive(Debug, Clone)]
pub struct SpawnCandidate {
    /// Opaque species key (e.g. `"pixelmon:charmander"`).
    pub identity: String,
    /// Element/type tags for the species, as the host reports them.
    pub type_tags: Vec<String>,
    /// Where the candidate would spawn.
    pub location: Position,
    /// Host-unique id for this candidate instance. Used for deduplication
    /// when the host fires the join notification more than once for the same
    /// instance.
    pub instance_id: u64,
}

/// An actor near a spawn candidate, as reported by the host.
#[derive(Debug, Clone, Copy)]
pub struct NearbyActor {
    pub id: ActorId,
    pub distance: f64,
}

/// A host-side lookup failed. The admission gate resolves these by failing
/// open, never by blocking the spawn.
#[derive(Debug, thiserror::Error)]
#[error("host lookup failed: {0}")]
pub struct LookupError(pub String);

/// The complete outbound surface toward the game host.
pub trait HostBridge: Send + Sync {
    /// Actors within `radius` blocks of `pos`, with their distances.
    /// Order is unspecified.
    fn actors_near(&self, pos: Position, radius: f64) -> Result<Vec<NearbyActor>, LookupError>;

    /// Send a chat message to one actor. Best effort.
    fn notify(&self, actor: ActorId, message: &str);

    /// Fire-and-forget "spawn something of `spec` near `actor`" request.
    /// The host may silently ignore it; the engine never assumes it worked,
    /// only that it may nudge outcomes.
    fn request_spawn(&self, actor: ActorId, spec: &str);
}
