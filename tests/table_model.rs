//! Table model reconciliation tests
//!
//! Every reconciliation compares a full snapshot against the previous
//! generation and must emit the smallest set of events describing the change.

use k9table::client::{Gvr, Scope};
use k9table::model::{EventKind, Snapshot, TableModel};
use k9table::render::{ALIAS_KIND, AliasRes, Flux, Generic, Registry, RegistryError};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;

fn alias_model() -> TableModel {
    TableModel::open(&Registry::builtin(), Gvr::new(ALIAS_KIND).unwrap()).unwrap()
}

fn alias(gvr: &str, aliases: &[&str]) -> (String, Value) {
    let res = AliasRes::new(
        Gvr::new(gvr).unwrap(),
        aliases.iter().map(|a| a.to_string()).collect(),
    );
    (gvr.to_string(), res.to_raw())
}

fn kustomization(name: &str, ready: &str, suspend: bool) -> (String, Value) {
    (
        format!("flux-system/{}", name),
        json!({
            "metadata": {"name": name, "namespace": "flux-system"},
            "spec": {"suspend": suspend},
            "status": {"conditions": [{"type": "Ready", "status": ready, "message": "ok"}]}
        }),
    )
}

#[test]
fn test_empty_to_one_is_a_single_add() {
    let model = alias_model();
    let events = model.reconcile(&Snapshot::from([alias("g/v/r", &["r"])]), &Scope::All);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::Added);
    assert_eq!(events[0].id(), "g/v/r");
    assert!(events[0].changed().is_empty());
}

#[test]
fn test_one_to_empty_deletes_with_last_known_row() {
    let model = alias_model();
    model.reconcile(&Snapshot::from([alias("g/v/r", &["r"])]), &Scope::All);
    let before = model.current_generation().get("g/v/r").cloned().unwrap();

    let events = model.reconcile(&Snapshot::new(), &Scope::All);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::Deleted);
    assert_eq!(events[0].row(), &before);
    assert!(model.current_generation().is_empty());
}

#[test]
fn test_no_change_emits_nothing() {
    let model = alias_model();
    let snapshot = Snapshot::from([alias("g/v/r", &["r"]), alias("v1/pods", &["po"])]);
    model.reconcile(&snapshot, &Scope::All);

    let events = model.reconcile(&snapshot, &Scope::All);
    assert!(events.is_empty());
    assert_eq!(model.current_generation().len(), 2);
}

#[test]
fn test_single_field_change_is_one_update() {
    let model = alias_model();
    model.reconcile(&Snapshot::from([alias("g/v/r", &["r"])]), &Scope::All);

    let events = model.reconcile(&Snapshot::from([alias("g/v/r", &["r", "rr"])]), &Scope::All);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::Updated);
    // COMMAND is the fourth column
    assert_eq!(events[0].changed(), &BTreeSet::from([3]));
    assert_eq!(events[0].row().cell(3), "r rr");
}

#[test]
fn test_mixed_changes() {
    let model = alias_model();
    model.reconcile(
        &Snapshot::from([alias("a/v1/x", &["x"]), alias("b/v1/y", &["y"])]),
        &Scope::All,
    );

    let events = model.reconcile(
        &Snapshot::from([alias("b/v1/y", &["yy"]), alias("c/v1/z", &["z"])]),
        &Scope::All,
    );

    let mut kinds: Vec<(String, EventKind)> = events
        .iter()
        .map(|e| (e.id().to_string(), e.kind()))
        .collect();
    kinds.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        kinds,
        vec![
            ("a/v1/x".to_string(), EventKind::Deleted),
            ("b/v1/y".to_string(), EventKind::Updated),
            ("c/v1/z".to_string(), EventKind::Added),
        ]
    );
}

#[test]
fn test_delete_and_readd_between_passes_is_an_update() {
    let model = alias_model();
    model.reconcile(&Snapshot::from([alias("g/v/r", &["r"])]), &Scope::All);

    // The object went away and came back with new content before the next pass
    let events = model.reconcile(&Snapshot::from([alias("g/v/r", &["q"])]), &Scope::All);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::Updated);
}

#[test]
fn test_render_failure_drops_row_and_is_reported() {
    let model = alias_model();
    model.reconcile(
        &Snapshot::from([alias("g/v/r", &["r"]), alias("v1/pods", &["po"])]),
        &Scope::All,
    );

    let mut snapshot = Snapshot::from([alias("v1/pods", &["po"])]);
    snapshot.insert("g/v/r".to_string(), json!({"gvr": 7}));
    let events = model.reconcile(&snapshot, &Scope::All);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::Deleted);
    assert_eq!(events[0].id(), "g/v/r");

    let failures = model.render_errors();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].id, "g/v/r");
    assert!(model.current_generation().contains("v1/pods"));
    assert!(!model.current_generation().contains("g/v/r"));
}

#[test]
fn test_revision_increases_every_pass() {
    let model = alias_model();
    let snapshot = Snapshot::from([alias("g/v/r", &["r"])]);
    let first = model.current_generation().revision();
    model.reconcile(&snapshot, &Scope::All);
    model.reconcile(&snapshot, &Scope::All);
    assert_eq!(model.current_generation().revision(), first + 2);
}

#[test]
fn test_scope_change_rebuilds_rows() {
    let model = TableModel::new(
        Gvr::new("kustomize.toolkit.fluxcd.io/v1/kustomizations").unwrap(),
        Arc::new(Flux),
    );
    let snapshot = Snapshot::from([kustomization("apps", "True", false)]);
    model.reconcile(&snapshot, &Scope::All);
    let all_len = model.current_generation().get("flux-system/apps").unwrap().fields.len();

    let events = model.reconcile(&snapshot, &Scope::namespace("flux-system"));

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::Added);
    assert_eq!(events[0].row().fields.len(), all_len - 1);
    assert_eq!(model.current_generation().scope(), &Scope::namespace("flux-system"));
}

#[test]
fn test_subscribers_receive_events_in_order() {
    let model = alias_model();
    let mut rx = model.subscribe();

    model.reconcile(&Snapshot::from([alias("g/v/r", &["r"])]), &Scope::All);
    model.reconcile(&Snapshot::new(), &Scope::All);

    assert_eq!(rx.try_recv().unwrap().kind(), EventKind::Added);
    assert_eq!(rx.try_recv().unwrap().kind(), EventKind::Deleted);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_dropped_subscriber_is_pruned() {
    let model = alias_model();
    let rx = model.subscribe();
    drop(rx);

    let events = model.reconcile(&Snapshot::from([alias("g/v/r", &["r"])]), &Scope::All);
    assert_eq!(events.len(), 1);

    let mut live = model.subscribe();
    model.reconcile(&Snapshot::new(), &Scope::All);
    assert_eq!(live.try_recv().unwrap().kind(), EventKind::Deleted);
}

#[test]
fn test_close_discards_later_passes() {
    let model = alias_model();
    let mut rx = model.subscribe();
    model.reconcile(&Snapshot::from([alias("g/v/r", &["r"])]), &Scope::All);
    let revision = model.current_generation().revision();
    assert!(rx.try_recv().is_ok());

    model.close();
    let events = model.reconcile(&Snapshot::new(), &Scope::All);

    assert!(model.is_closed());
    assert!(events.is_empty());
    assert_eq!(model.current_generation().revision(), revision);
    assert!(model.current_generation().contains("g/v/r"));
    // Closing drops the senders, so the stream ends
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_flux_colors_follow_status_columns() {
    use k9table::render::{ERR_COLOR, PENDING_COLOR, STD_COLOR};

    let model = TableModel::new(
        Gvr::new("kustomize.toolkit.fluxcd.io/v1/kustomizations").unwrap(),
        Arc::new(Flux),
    );
    for scope in [Scope::All, Scope::namespace("flux-system")] {
        let snapshot = Snapshot::from([
            kustomization("failing", "False", false),
            kustomization("paused", "True", true),
            kustomization("healthy", "True", false),
        ]);
        model.reconcile(&snapshot, &scope);
        let generation = model.current_generation();

        let color = |id: &str| {
            let row = generation.get(id).cloned().unwrap();
            model.color_for(&scope, &k9table::model::ChangeEvent::unchanged(row))
        };
        assert_eq!(color("flux-system/failing"), ERR_COLOR, "{}", scope);
        assert_eq!(color("flux-system/paused"), PENDING_COLOR, "{}", scope);
        assert_eq!(color("flux-system/healthy"), STD_COLOR, "{}", scope);
    }
}

#[test]
fn test_open_unknown_kind_fails_at_open_time() {
    let registry = Registry::builder()
        .register(Gvr::new("v1/pods").unwrap(), Arc::new(Generic))
        .try_build()
        .unwrap();

    let err = TableModel::open(&registry, Gvr::new("fred/v1/blee").unwrap()).unwrap_err();
    assert_eq!(err, RegistryError::NotFound("fred/v1/blee".to_string()));
    assert!(TableModel::open(&registry, Gvr::new("v1/pods").unwrap()).is_ok());
}

fn pod(name: &str) -> Value {
    json!({"metadata": {"name": name, "namespace": "default"}})
}

#[test]
fn test_generation_is_keyed_by_row_id() {
    let model = TableModel::new(Gvr::new("v1/pods").unwrap(), Arc::new(Generic));
    let events = model.reconcile(&Snapshot::from([("uid-1".to_string(), pod("web"))]), &Scope::All);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id(), "default/web");
    let generation = model.current_generation();
    assert!(generation.contains(events[0].id()));
    assert!(!generation.contains("uid-1"));

    // Same object under a new source key is not a change
    let events = model.reconcile(&Snapshot::from([("uid-9".to_string(), pod("web"))]), &Scope::All);
    assert!(events.is_empty());
}

#[test]
fn test_colliding_row_ids_keep_one_row() {
    let model = TableModel::new(Gvr::new("v1/pods").unwrap(), Arc::new(Generic));
    let snapshot = Snapshot::from([
        ("uid-2".to_string(), pod("web")),
        ("uid-1".to_string(), pod("web")),
    ]);

    let events = model.reconcile(&snapshot, &Scope::All);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::Added);
    let generation = model.current_generation();
    assert_eq!(generation.len(), 1);
    assert!(generation.rows().all(|r| generation.get(&r.id) == Some(r)));

    let failures = model.render_errors();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].id, "uid-2");
    assert!(failures[0].reason.contains("uid-1"));
}
