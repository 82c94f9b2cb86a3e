//! Boost tracking system
//!
//! This module provides:
//! - **Active instances**: the runtime state of a boost one actor holds
//! - **Store**: the authoritative per-actor boost table with per-actor locking
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Item use / command layer                     │
//! │        "give Prescott a 5x fire Type Lure for 2 minutes"        │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                        EffectStore::apply
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Boost (runtime state)                        │
//! │   "Prescott: TypeAffinity('fire'), 5.0x, 2,310 ticks left"      │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                ticked by EffectScheduler, read by
//!                AdmissionGate / SpawnPipelineAdapter
//! ```

mod active;
mod store;


pub use active::{ActorEffectState, Boost};
pub(crate) use store::validate_params;
pub use store::{BoostError, EffectStore, TickOutcome};
