use lure_types::ActorId;

/// The engine's slice of an actor's persistent document, as flat namespaced
/// keys with JSON-typed values. The host owns the document itself; the
/// engine only ever sees its own key set.
pub type DocumentKeys = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to read persistent document: {0}")]
    Read(String),
    #[error("failed to write persistent document: {0}")]
    Write(String),
}

/// Access to the host-attached per-actor persistent document.
///
/// Implemented host-side against whatever blob the host round-trips across
/// sessions (NBT on a real server, a plain map in tests).
pub trait DocumentStore: Send + Sync {
    /// The engine-owned keys currently stored for this actor. Absent keys
    /// are simply omitted; an actor never seen before yields an empty map.
    fn load(&self, actor: ActorId) -> Result<DocumentKeys, PersistError>;

    /// Replace the engine-owned key set for this actor with `keys`. Keys
    /// previously present but missing from `keys` must be removed, so stale
    /// fields can never resurrect an expired boost.
    fn store(&self, actor: ActorId, keys: DocumentKeys) -> Result<(), PersistError>;
}
