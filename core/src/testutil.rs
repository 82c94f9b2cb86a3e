//! Shared in-memory doubles for engine tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use hashbrown::HashMap;
use lure_types::ActorId;

use crate::host::{HostBridge, LookupError, NearbyActor, Position};
use crate::persist::{DocumentKeys, DocumentStore, PersistError};

/// Host double that records every outbound call and serves a fixed
/// nearby-actor roster.
#[derive(Default)]
pub struct RecordingHost {
    pub nearby: Mutex<Vec<NearbyActor>>,
    pub fail_lookups: AtomicBool,
    pub lookups: AtomicUsize,
    pub notifications: Mutex<Vec<(ActorId, String)>>,
    pub spawn_requests: Mutex<Vec<(ActorId, String)>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nearby(actors: Vec<NearbyActor>) -> Self {
        Self {
            nearby: Mutex::new(actors),
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<(ActorId, String)> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn spawn_requests(&self) -> Vec<(ActorId, String)> {
        self.spawn_requests.lock().unwrap().clone()
    }
}

impl HostBridge for RecordingHost {
    fn actors_near(&self, _pos: Position, _radius: f64) -> Result<Vec<NearbyActor>, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(LookupError("lookup disabled".to_string()));
        }
        Ok(self.nearby.lock().unwrap().clone())
    }

    fn notify(&self, actor: ActorId, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((actor, message.to_string()));
    }

    fn request_spawn(&self, actor: ActorId, spec: &str) {
        self.spawn_requests
            .lock()
            .unwrap()
            .push((actor, spec.to_string()));
    }
}

/// In-memory [`DocumentStore`] with switchable failure modes.
#[derive(Default)]
pub struct MemoryDocuments {
    docs: Mutex<HashMap<ActorId, DocumentKeys>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw keys for one actor, for assertions on the persisted shape.
    pub fn raw(&self, actor: ActorId) -> DocumentKeys {
        self.docs
            .lock()
            .unwrap()
            .get(&actor)
            .cloned()
            .unwrap_or_default()
    }

    /// Seed raw keys, bypassing the adapter (malformed-data tests).
    pub fn seed(&self, actor: ActorId, keys: DocumentKeys) {
        self.docs.lock().unwrap().insert(actor, keys);
    }
}

impl DocumentStore for MemoryDocuments {
    fn load(&self, actor: ActorId) -> Result<DocumentKeys, PersistError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistError::Read("reads disabled".to_string()));
        }
        Ok(self.raw(actor))
    }

    fn store(&self, actor: ActorId, keys: DocumentKeys) -> Result<(), PersistError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistError::Write("writes disabled".to_string()));
        }
        self.docs.lock().unwrap().insert(actor, keys);
        Ok(())
    }
}
