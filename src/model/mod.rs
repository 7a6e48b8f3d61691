//! Table model layer
//!
//! - `header.rs` - column schema
//! - `row.rs` - rendered rows and cell diffs
//! - `event.rs` - change events between generations
//! - `generation.rs` - immutable table snapshots
//! - `table.rs` - the live model that diffs snapshots and swaps generations

mod event;
mod generation;
mod header;
mod row;
mod table;

pub use event::{ChangeEvent, EventKind};
pub use generation::Generation;
pub use header::{Column, ColumnAttrs, Header};
pub use row::{Fields, Row};
pub use table::{RenderFailure, Snapshot, TableModel};
