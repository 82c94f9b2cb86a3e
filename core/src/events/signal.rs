use lure_types::ActorId;

/// Lifecycle signals delivered by the host glue.
///
/// These represent "interesting things that happened" at a higher level than
/// the host's raw event bus: the engine only cares about actors arriving,
/// leaving, and advancing in time. Spawn candidates are not a signal — they
/// need a synchronous answer and go through
/// [`BoostService::admit`](crate::service::BoostService::admit) instead.
#[derive(Debug, Clone)]
pub enum HostSignal {
    /// An actor entered the world; persisted boosts should be restored.
    ActorJoined { actor: ActorId },

    /// An actor left. State is flushed synchronously and evicted; the
    /// persisted record survives for the next join.
    ActorDisconnected { actor: ActorId },

    /// One simulation step for one actor. The host fires this every game
    /// tick for every online actor; it is the engine's only time source.
    ActorTick { actor: ActorId },
}
