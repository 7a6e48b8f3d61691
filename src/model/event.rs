//! Row change events

use super::Row;
use std::collections::BTreeSet;
use std::fmt;

/// Classification of a row between two generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Added,
    Updated,
    Deleted,
    Unchanged,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Added => "ADDED",
            EventKind::Updated => "UPDATED",
            EventKind::Deleted => "DELETED",
            EventKind::Unchanged => "UNCHANGED",
        };
        write!(f, "{}", s)
    }
}

/// A row together with how it changed
///
/// The changed-field set is only populated for `Updated` events; the
/// constructors are the only way to build one, which keeps that invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    kind: EventKind,
    row: Row,
    changed: BTreeSet<usize>,
}

impl ChangeEvent {
    pub fn added(row: Row) -> Self {
        Self::plain(EventKind::Added, row)
    }

    pub fn deleted(row: Row) -> Self {
        Self::plain(EventKind::Deleted, row)
    }

    pub fn unchanged(row: Row) -> Self {
        Self::plain(EventKind::Unchanged, row)
    }

    pub fn updated(row: Row, changed: BTreeSet<usize>) -> Self {
        Self {
            kind: EventKind::Updated,
            row,
            changed,
        }
    }

    fn plain(kind: EventKind, row: Row) -> Self {
        Self {
            kind,
            row,
            changed: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn row(&self) -> &Row {
        &self.row
    }

    pub fn id(&self) -> &str {
        &self.row.id
    }

    /// Column indices that changed; empty unless the event is an update
    pub fn changed(&self) -> &BTreeSet<usize> {
        &self.changed
    }

    pub fn into_row(self) -> Row {
        self.row
    }
}
