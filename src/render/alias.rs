//! Command alias pseudo-resource
//!
//! Lists every known resource kind with the commands that open it. The view
//! has no namespace dimension, so header and colors ignore the scope.

use super::{ADD_COLOR, Colorer, KILL_COLOR, RenderError, Renderer, STD_COLOR};
use crate::client::{Gvr, Scope};
use crate::model::{ChangeEvent, Column, EventKind, Fields, Header, Row};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Pseudo-kind under which the alias view is registered
pub const ALIAS_KIND: &str = "k9table/v1/aliases";

/// Raw object of the alias view: one kind and its commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRes {
    pub gvr: Gvr,
    pub aliases: Vec<String>,
}

impl AliasRes {
    pub fn new(gvr: Gvr, aliases: Vec<String>) -> Self {
        Self { gvr, aliases }
    }

    /// Raw value handed to the table model
    pub fn to_raw(&self) -> Value {
        json!({
            "gvr": self.gvr.to_string(),
            "aliases": self.aliases,
        })
    }
}

/// Renders command aliases
#[derive(Debug, Clone, Copy, Default)]
pub struct Alias;

impl Renderer for Alias {
    fn header(&self, _scope: &Scope) -> Header {
        Header::new(vec![
            Column::new("RESOURCE"),
            Column::new("GROUP"),
            Column::new("VERSION"),
            Column::new("COMMAND"),
        ])
    }

    fn render(&self, obj: &Value, _scope: &Scope, row: &mut Row) -> Result<(), RenderError> {
        let res = AliasRes::deserialize(obj)?;

        *row = Row::new(
            res.gvr.to_string(),
            Fields::new(vec![
                res.gvr.resource().to_string(),
                res.gvr.group().to_string(),
                res.gvr.version().to_string(),
                res.aliases.join(" "),
            ]),
        );
        Ok(())
    }

    fn colorer(&self) -> Colorer {
        alias_colorer
    }
}

fn alias_colorer(_scope: &Scope, _header: &Header, event: &ChangeEvent) -> Color {
    match event.kind() {
        EventKind::Added => ADD_COLOR,
        EventKind::Deleted => KILL_COLOR,
        _ => STD_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_row_on_decode_error() {
        let mut row = Row::new("before", Fields::from(vec!["x"]));
        let err = Alias
            .render(&json!({"gvr": 42}), &Scope::All, &mut row)
            .unwrap_err();
        assert!(matches!(err, RenderError::Decode(_)));
        assert_eq!(row, Row::new("before", Fields::from(vec!["x"])));
    }

    #[test]
    fn test_to_raw_decodes_back() {
        let res = AliasRes::new(Gvr::new("v1/pods").unwrap(), vec!["po".to_string()]);
        let back = AliasRes::deserialize(&res.to_raw()).unwrap();
        assert_eq!(back, res);
    }

    #[test]
    fn test_core_kind_has_empty_group() {
        let res = AliasRes::new(
            Gvr::new("v1/pods").unwrap(),
            vec!["po".to_string(), "pod".to_string()],
        );
        let mut row = Row::default();
        Alias.render(&res.to_raw(), &Scope::All, &mut row).unwrap();
        assert_eq!(row.id, "v1/pods");
        assert_eq!(row.fields, Fields::from(vec!["pods", "", "v1", "po pod"]));
    }
}
