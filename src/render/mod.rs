//! Renderer contract
//!
//! A renderer turns a raw cluster object into a table row for one resource
//! kind. Each renderer carries its own column schema and coloring policy so
//! that dozens of heterogeneous kinds can be shown by the same table model.
//!
//! Raw objects travel as `serde_json::Value`, the same representation the
//! watchers use, so renderers for pseudo-resources simply decode their own
//! shape out of the value.
//!
//! ## Adding a renderer
//!
//! 1. Implement [`Renderer`] for a unit struct in its own module
//! 2. Register it under its kind in [`Registry::builtin`]
//!
//! Renderers must stay pure: no network or blocking I/O, only the object
//! they are handed.

mod age;
mod alias;
mod flux;
mod generic;
mod registry;

pub use age::{object_age, to_age};
pub use alias::{ALIAS_KIND, Alias, AliasRes};
pub use flux::Flux;
pub use generic::Generic;
pub use registry::{Registry, RegistryBuilder, RegistryError};

use crate::client::Scope;
use crate::model::{ChangeEvent, EventKind, Header, Row};
use ratatui::style::Color;
use serde_json::Value;

/// Color for rows that just appeared
pub const ADD_COLOR: Color = Color::Blue;
/// Color for rows that are going away
pub const KILL_COLOR: Color = Color::Gray;
/// Color for everything else
pub const STD_COLOR: Color = Color::Reset;
/// Color for rows reporting a failure
pub const ERR_COLOR: Color = Color::Red;
/// Color for rows that are paused or not yet settled
pub const PENDING_COLOR: Color = Color::DarkGray;

/// Maps a change event to its display color
///
/// Colorers are plain function pointers: they cannot capture state and they
/// have no error path.
pub type Colorer = fn(&Scope, &Header, &ChangeEvent) -> Color;

/// Default coloring policy
pub fn default_colorer(_scope: &Scope, _header: &Header, event: &ChangeEvent) -> Color {
    match event.kind() {
        EventKind::Added => ADD_COLOR,
        EventKind::Deleted => KILL_COLOR,
        EventKind::Updated | EventKind::Unchanged => STD_COLOR,
    }
}

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Failed to decode object: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Rendered {got} fields for a {expected} column header")]
    FieldCount { expected: usize, got: usize },
}

/// Per-kind converter from raw objects to rows
pub trait Renderer: Send + Sync {
    /// Column schema for a scope; must be deterministic
    fn header(&self, scope: &Scope) -> Header;

    /// Populate `row` from `obj`
    ///
    /// On success `row.fields` holds exactly one cell per header column. On
    /// failure `row` is left untouched.
    fn render(&self, obj: &Value, scope: &Scope, row: &mut Row) -> Result<(), RenderError>;

    /// Coloring policy for this kind
    fn colorer(&self) -> Colorer {
        default_colorer
    }
}

/// Render an object and check the row against the header
pub fn render_row(
    renderer: &dyn Renderer,
    obj: &Value,
    scope: &Scope,
) -> Result<Row, RenderError> {
    let mut row = Row::default();
    renderer.render(obj, scope, &mut row)?;

    let expected = renderer.header(scope).len();
    if row.fields.len() != expected {
        return Err(RenderError::FieldCount {
            expected,
            got: row.fields.len(),
        });
    }
    Ok(row)
}
