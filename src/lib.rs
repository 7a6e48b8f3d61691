//! k9table library
//!
//! Renderer contract and live table model behind the k9table dashboard:
//! per-kind renderers turn raw cluster objects into rows, and a table model
//! diffs full snapshots into change events while readers keep a consistent
//! view of the latest generation.

pub mod cancel;
pub mod cli;
pub mod client;
pub mod config;
pub mod model;
pub mod perf;
pub mod render;
pub mod tui;
pub mod watcher;

// Re-export commonly used types for convenience
pub use cancel::CancellationToken;
pub use client::{Gvr, Scope, fqn, namespaced};
pub use model::{ChangeEvent, EventKind, Generation, Header, Row, Snapshot, TableModel};
pub use render::{Registry, RenderError, Renderer};
