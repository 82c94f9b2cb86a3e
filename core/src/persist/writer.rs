//! Background persistence writer.
//!
//! A single tokio task owns every deferred write: the tick path only ever
//! enqueues an actor id and returns. Pending saves for one actor coalesce
//! (latest state wins, because the writer snapshots the store at write time,
//! not enqueue time). A periodic sweep re-saves every boosted actor, which
//! doubles as the retry path for failed writes.

use std::sync::Arc;
use std::time::Duration;

use lure_types::ActorId;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::PersistenceAdapter;
use crate::boosts::EffectStore;

/// Enqueued-but-unwritten saves are bounded; overflow falls back to the
/// periodic sweep instead of blocking the tick thread.
const QUEUE_CAPACITY: usize = 256;

pub struct PersistWriter {
    tx: mpsc::Sender<ActorId>,
    task: tokio::task::JoinHandle<()>,
}

impl PersistWriter {
    /// Start the writer task on the ambient tokio runtime.
    pub fn spawn(
        store: Arc<EffectStore>,
        adapter: Arc<PersistenceAdapter>,
        flush_interval: Duration,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<ActorId>(QUEUE_CAPACITY);
        let task = tokio::spawn(async move {
            let mut sweep = tokio::time::interval(flush_interval);
            sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick fires immediately; swallow it
            sweep.tick().await;

            loop {
                tokio::select! {
                    received = rx.recv() => {
                        let Some(first) = received else {
                            break; // service dropped; queue fully drained
                        };
                        let mut pending = vec![first];
                        while let Ok(actor) = rx.try_recv() {
                            pending.push(actor);
                        }
                        pending.sort();
                        pending.dedup();
                        for actor in pending {
                            save_one(&store, &adapter, actor);
                        }
                    }
                    _ = sweep.tick() => {
                        for actor in store.active_actors() {
                            save_one(&store, &adapter, actor);
                        }
                    }
                }
            }
        });
        Self { tx, task }
    }

    /// Queue a save for this actor. Never blocks: a full queue is dropped on
    /// the floor and picked up by the periodic sweep.
    pub fn queue_save(&self, actor: ActorId) {
        if self.tx.try_send(actor).is_err() {
            tracing::warn!(%actor, "persist queue full; deferring save to periodic sweep");
        }
    }

    /// Stop the writer after draining queued saves.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "persist writer task ended abnormally");
        }
    }
}

fn save_one(store: &EffectStore, adapter: &PersistenceAdapter, actor: ActorId) {
    let state = store.snapshot(actor);
    if let Err(e) = adapter.save(actor, &state) {
        tracing::warn!(%actor, error = %e, "deferred save failed; retrying at next sweep");
    }
}
