use super::*;
use crate::fixtures::{entity, enemy, snapshot, to_json};

#[test]
fn starts_absent() {
    let store = SnapshotStore::new();
    assert!(store.current().is_none());
    assert_eq!(store.accepted(), 0);
}

#[test]
fn ingest_render_replaces_current() {
    let mut store = SnapshotStore::new();
    let first = snapshot(vec![entity(1.0, 2.0)]);
    assert!(matches!(store.ingest(&to_json(&first)), Ingest::Replaced));
    assert_eq!(store.current(), Some(&first));

    let second = snapshot(vec![enemy(3.0, 4.0), entity(5.0, 6.0)]);
    assert!(matches!(store.ingest(&to_json(&second)), Ingest::Replaced));
    assert_eq!(store.current(), Some(&second));
    assert_eq!(store.accepted(), 2);
}

#[test]
fn replacement_does_not_merge_players() {
    let mut store = SnapshotStore::new();
    store.ingest(&to_json(&snapshot(vec![entity(1.0, 1.0), entity(2.0, 2.0)])));
    store.ingest(&to_json(&snapshot(vec![enemy(9.0, 9.0)])));
    let current = store.current().unwrap();
    assert_eq!(current.players.len(), 1);
    assert_eq!(current.entity_count, 1);
}

#[test]
fn non_render_command_clears_prior_state() {
    let mut store = SnapshotStore::new();
    store.ingest(&to_json(&snapshot(vec![entity(1.0, 2.0)])));
    assert!(store.current().is_some());

    let outcome = store.ingest(r#"{"command":"idle"}"#);
    assert!(matches!(outcome, Ingest::Cleared(ref c) if c == "idle"));
    assert!(store.current().is_none());
}

#[test]
fn malformed_input_clears_and_reports() {
    let mut store = SnapshotStore::new();
    store.ingest(&to_json(&snapshot(vec![])));
    let outcome = store.ingest("{ not json");
    assert!(matches!(outcome, Ingest::Rejected(WireError::Json(_))));
    assert!(store.current().is_none());
}

#[test]
fn count_mismatch_is_rejected() {
    let mut store = SnapshotStore::new();
    let mut bad = snapshot(vec![entity(0.0, 0.0)]);
    bad.entity_count = 4;
    let outcome = store.ingest(&to_json(&bad));
    assert!(matches!(outcome, Ingest::Rejected(WireError::CountMismatch { .. })));
    assert!(store.current().is_none());
}

#[test]
fn replace_with_non_render_snapshot_clears() {
    let mut store = SnapshotStore::new();
    store.replace(snapshot(vec![]));
    let mut other = snapshot(vec![]);
    other.command = "paused".into();
    store.replace(other);
    assert!(store.current().is_none());
    assert_eq!(store.accepted(), 1);
}

#[test]
fn clear_drops_current() {
    let mut store = SnapshotStore::new();
    store.replace(snapshot(vec![]));
    store.clear();
    assert!(store.current().is_none());
}
