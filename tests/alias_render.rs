//! Alias renderer tests
//!
//! The alias view has no namespace dimension: header and colors must be the
//! same whatever scope it is rendered under.

use k9table::client::{Gvr, Scope};
use k9table::model::{ChangeEvent, Column, Fields, Header, Row};
use k9table::render::{ADD_COLOR, Alias, AliasRes, KILL_COLOR, Renderer, STD_COLOR, render_row};
use std::collections::BTreeSet;

fn blee() -> AliasRes {
    AliasRes::new(
        Gvr::new("fred/v1/blee").unwrap(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
    )
}

#[test]
fn test_alias_colorer() {
    let header = Header::new(vec![Column::new("A"), Column::new("B"), Column::new("C")]);
    let row = Row::new("g/v/r", Fields::from(vec!["r", "blee", "g"]));

    let cases = [
        ("addAll", ChangeEvent::added(row.clone()), ADD_COLOR),
        ("deleteAll", ChangeEvent::deleted(row.clone()), KILL_COLOR),
        (
            "updateAll",
            ChangeEvent::updated(row.clone(), BTreeSet::from([1])),
            STD_COLOR,
        ),
        ("unchangedAll", ChangeEvent::unchanged(row), STD_COLOR),
    ];

    let colorer = Alias.colorer();
    for (name, event, expected) in cases {
        assert_eq!(colorer(&Scope::All, &header, &event), expected, "{}", name);
        assert_eq!(
            colorer(&Scope::namespace("ns-1"), &header, &event),
            expected,
            "{} (namespaced)",
            name
        );
    }
}

#[test]
fn test_alias_header() {
    let expected = Header::new(vec![
        Column::new("RESOURCE"),
        Column::new("GROUP"),
        Column::new("VERSION"),
        Column::new("COMMAND"),
    ]);

    assert_eq!(Alias.header(&Scope::namespace("ns-1")), expected);
    assert_eq!(Alias.header(&Scope::All), expected);
}

#[test]
fn test_alias_render() {
    let mut row = Row::default();
    Alias
        .render(&blee().to_raw(), &Scope::from("fred/v1/blee"), &mut row)
        .unwrap();

    assert_eq!(
        row,
        Row::new("fred/v1/blee", Fields::from(vec!["blee", "fred", "v1", "a b c"]))
    );
}

#[test]
fn test_alias_render_core_kind() {
    let res = AliasRes::new(Gvr::new("v1/pods").unwrap(), vec!["po".to_string()]);
    let row = render_row(&Alias, &res.to_raw(), &Scope::All).unwrap();

    assert_eq!(row.id, "v1/pods");
    assert_eq!(row.fields, Fields::from(vec!["pods", "", "v1", "po"]));
}

#[test]
fn test_alias_render_rejects_wrong_shape() {
    let mut row = Row::default();
    let err = Alias
        .render(
            &serde_json::json!({"gvr": 42, "aliases": []}),
            &Scope::All,
            &mut row,
        )
        .unwrap_err();

    assert!(matches!(err, k9table::render::RenderError::Decode(_)));
    assert_eq!(row, Row::default());
}
