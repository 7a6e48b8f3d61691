//! Snapshot sources and the refresh loop feeding table models
//!
//! - `source.rs` - where snapshots come from (API server, files, alias table)
//! - `refresh.rs` - periodic reconcile loop with cancellation

mod refresh;
mod source;

pub use refresh::{MAX_CONSECUTIVE_ERRORS, Refresher};
pub use source::{AliasSource, FileSource, KubeSource, SnapshotSource, objects_to_snapshot};

#[cfg(test)]
pub use source::MockSnapshotSource;
