pub mod boosts;
pub mod config;
pub mod events;
pub mod gate;
pub mod host;
pub mod items;
pub mod persist;
pub mod scheduler;
pub mod service;
pub mod spawn;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports for convenience
pub use boosts::{ActorEffectState, Boost, BoostError, EffectStore};
pub use config::EngineConfig;
pub use events::{HostSignal, SignalHandler};
pub use gate::AdmissionVerdict;
pub use host::{HostBridge, SpawnCandidate};
pub use lure_types::{ActorId, BoostKind};
pub use service::BoostService;
pub use spawn::CandidateAction;
