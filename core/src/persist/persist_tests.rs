//! Round-trip and resilience tests for boost persistence.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use lure_types::{ActorId, BoostKind};
use serde_json::json;

use super::{DocumentStore, PersistWriter, PersistenceAdapter};
use crate::boosts::EffectStore;
use crate::testutil::MemoryDocuments;

fn setup() -> (Arc<EffectStore>, Arc<MemoryDocuments>, PersistenceAdapter) {
    let docs = Arc::new(MemoryDocuments::new());
    let adapter = PersistenceAdapter::new(Arc::clone(&docs) as Arc<dyn DocumentStore>);
    (Arc::new(EffectStore::new()), docs, adapter)
}

fn apply_all_three(store: &EffectStore, actor: ActorId) {
    store
        .apply(actor, BoostKind::LegendaryRate, 2400, 85.0, None)
        .expect("valid boost");
    store
        .apply(actor, BoostKind::ShinyRate, 1200, 10.0, None)
        .expect("valid boost");
    store
        .apply(
            actor,
            BoostKind::TypeAffinity,
            600,
            5.0,
            Some("fire".to_string()),
        )
        .expect("valid boost");
}

// ─────────────────────────────────────────────────────────────────────────────
// Round trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_round_trip_preserves_all_kinds_exactly() {
    let (store, _docs, adapter) = setup();
    let actor = ActorId::random();
    apply_all_three(&store, actor);

    let saved = store.snapshot(actor);
    adapter.save(actor, &saved).expect("save");
    let loaded = adapter.load(actor);

    assert_eq!(loaded.boosts.len(), 3);
    for kind in BoostKind::ALL {
        let before = &saved.boosts[&kind];
        let after = &loaded.boosts[&kind];
        assert_eq!(after.remaining_ticks, before.remaining_ticks);
        assert_eq!(after.strength, before.strength);
        assert_eq!(after.payload, before.payload);
        assert_eq!(after.override_base, before.override_base);
    }
}

#[test]
fn test_empty_state_round_trips_empty() {
    let (store, _docs, adapter) = setup();
    let actor = ActorId::random();

    adapter.save(actor, &store.snapshot(actor)).expect("save");
    assert!(adapter.load(actor).is_empty());
}

#[test]
fn test_expired_boost_round_trips_as_absent() {
    let (store, _docs, adapter) = setup();
    let actor = ActorId::random();
    apply_all_three(&store, actor);

    let mut state = store.snapshot(actor);
    state
        .boosts
        .get_mut(&BoostKind::ShinyRate)
        .unwrap()
        .remaining_ticks = 0;
    adapter.save(actor, &state).expect("save");

    let loaded = adapter.load(actor);
    assert!(!loaded.boosts.contains_key(&BoostKind::ShinyRate));
    assert_eq!(loaded.boosts.len(), 2);
}

#[test]
fn test_save_removes_stale_keys() {
    let (store, docs, adapter) = setup();
    let actor = ActorId::random();
    apply_all_three(&store, actor);
    adapter.save(actor, &store.snapshot(actor)).expect("save");

    // Legendary expires; the next save must strip its fields so a future
    // load cannot resurrect it
    store.evict(actor);
    store
        .apply(actor, BoostKind::ShinyRate, 100, 10.0, None)
        .expect("valid boost");
    adapter.save(actor, &store.snapshot(actor)).expect("save");

    let raw = docs.raw(actor);
    assert!(raw.contains_key("lure:shiny:ticks"));
    assert!(!raw.contains_key("lure:legendary:ticks"));
    assert!(!raw.contains_key("lure:legendary:strength"));
    assert!(!raw.contains_key("lure:affinity:type"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Malformed and legacy data
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_malformed_fields_drop_only_that_kind() {
    let (_store, docs, adapter) = setup();
    let actor = ActorId::random();

    let mut keys = serde_json::Map::new();
    // Good shiny entry
    keys.insert("lure:shiny:ticks".to_string(), json!(500));
    keys.insert("lure:shiny:strength".to_string(), json!(10.0));
    // Tick count is a string: malformed
    keys.insert("lure:legendary:ticks".to_string(), json!("soon"));
    keys.insert("lure:legendary:strength".to_string(), json!(85.0));
    // Affinity without its type name: malformed
    keys.insert("lure:affinity:ticks".to_string(), json!(500));
    keys.insert("lure:affinity:strength".to_string(), json!(5.0));
    docs.seed(actor, keys);

    let loaded = adapter.load(actor);
    assert_eq!(loaded.boosts.len(), 1);
    assert!(loaded.boosts.contains_key(&BoostKind::ShinyRate));
}

#[test]
fn test_out_of_range_strength_is_dropped() {
    let (_store, docs, adapter) = setup();
    let actor = ActorId::random();

    let mut keys = serde_json::Map::new();
    keys.insert("lure:legendary:ticks".to_string(), json!(500));
    keys.insert("lure:legendary:strength".to_string(), json!(250.0));
    docs.seed(actor, keys);

    assert!(adapter.load(actor).is_empty());
}

#[test]
fn test_legacy_multiplier_flag_survives_load() {
    let (_store, docs, adapter) = setup();
    let actor = ActorId::random();

    let mut keys = serde_json::Map::new();
    keys.insert("lure:shiny:ticks".to_string(), json!(500));
    keys.insert("lure:shiny:strength".to_string(), json!(4.0));
    keys.insert("lure:shiny:override".to_string(), json!(false));
    docs.seed(actor, keys);

    let loaded = adapter.load(actor);
    assert!(!loaded.boosts[&BoostKind::ShinyRate].override_base);
}

#[test]
fn test_missing_override_flag_defaults_to_absolute() {
    let (_store, docs, adapter) = setup();
    let actor = ActorId::random();

    let mut keys = serde_json::Map::new();
    keys.insert("lure:shiny:ticks".to_string(), json!(500));
    keys.insert("lure:shiny:strength".to_string(), json!(25.0));
    docs.seed(actor, keys);

    let loaded = adapter.load(actor);
    assert!(loaded.boosts[&BoostKind::ShinyRate].override_base);
}

#[test]
fn test_read_failure_degrades_to_no_boosts() {
    let (_store, docs, adapter) = setup();
    let actor = ActorId::random();
    docs.fail_reads.store(true, Ordering::SeqCst);

    assert!(adapter.load(actor).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Deferred writer
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_queued_save_reaches_the_document() {
    let (store, docs, _) = setup();
    let adapter = Arc::new(PersistenceAdapter::new(
        Arc::clone(&docs) as Arc<dyn DocumentStore>
    ));
    let actor = ActorId::random();
    store
        .apply(actor, BoostKind::LegendaryRate, 2400, 85.0, None)
        .expect("valid boost");

    let writer = PersistWriter::spawn(
        Arc::clone(&store),
        Arc::clone(&adapter),
        Duration::from_secs(3600),
    );
    writer.queue_save(actor);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(docs.raw(actor).contains_key("lure:legendary:ticks"));
    writer.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_retries_on_periodic_sweep() {
    let (store, docs, _) = setup();
    let adapter = Arc::new(PersistenceAdapter::new(Arc::clone(&docs) as Arc<dyn DocumentStore>));
    let actor = ActorId::random();
    store
        .apply(actor, BoostKind::ShinyRate, 500, 10.0, None)
        .expect("valid boost");

    docs.fail_writes.store(true, Ordering::SeqCst);
    let writer = PersistWriter::spawn(
        Arc::clone(&store),
        Arc::clone(&adapter),
        Duration::from_secs(60),
    );
    writer.queue_save(actor);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(docs.raw(actor).is_empty(), "write should have failed");

    // Heal the store; the next sweep picks the actor back up
    docs.fail_writes.store(false, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert!(docs.raw(actor).contains_key("lure:shiny:ticks"));
    writer.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_drains_pending_saves() {
    let (store, docs, _) = setup();
    let adapter = Arc::new(PersistenceAdapter::new(Arc::clone(&docs) as Arc<dyn DocumentStore>));
    let actor = ActorId::random();
    store
        .apply(actor, BoostKind::ShinyRate, 500, 10.0, None)
        .expect("valid boost");

    let writer = PersistWriter::spawn(
        Arc::clone(&store),
        Arc::clone(&adapter),
        Duration::from_secs(3600),
    );
    writer.queue_save(actor);
    writer.shutdown().await;

    assert!(docs.raw(actor).contains_key("lure:shiny:ticks"));
}
