//! Immutable table snapshots

use super::{Header, Row};
use crate::client::Scope;
use chrono::DateTime;
use std::cmp::Ordering;
use std::collections::HashMap;

/// One consistent snapshot of a table, keyed by row id
///
/// A generation is never mutated after it is published; the table model
/// replaces it wholesale on every reconciliation.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    revision: u64,
    scope: Scope,
    rows: HashMap<String, Row>,
}

impl Generation {
    /// Empty generation used when a view opens
    pub fn empty(scope: Scope) -> Self {
        Self {
            revision: 0,
            scope,
            rows: HashMap::new(),
        }
    }

    pub(crate) fn new(revision: u64, scope: Scope, rows: HashMap<String, Row>) -> Self {
        Self {
            revision,
            scope,
            rows,
        }
    }

    /// Position of this generation in its model's history
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Scope the rows were rendered under
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn get(&self, id: &str) -> Option<&Row> {
        self.rows.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    /// Rows with the id they are keyed by
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Row)> {
        self.rows.iter().map(|(id, row)| (id.as_str(), row))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Rows ordered by id
    pub fn sorted_rows(&self) -> Vec<&Row> {
        let mut rows: Vec<&Row> = self.rows.values().collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        rows
    }

    /// Rows ordered by a column, ties broken by id
    ///
    /// Time columns compare by age (youngest first when ascending) and
    /// numeric cells compare as numbers.
    /// An unknown column falls back to id order.
    pub fn sorted_by(&self, header: &Header, column: &str, ascending: bool) -> Vec<&Row> {
        let Some(index) = header.index_of(column) else {
            return self.sorted_rows();
        };
        let time = header.columns()[index].attrs.time;

        let mut rows: Vec<&Row> = self.rows.values().collect();
        rows.sort_by(|a, b| {
            let ord = compare_cells(a.cell(index), b.cell(index), time);
            let ord = if ascending { ord } else { ord.reverse() };
            ord.then_with(|| a.id.cmp(&b.id))
        });
        rows
    }
}

fn compare_cells(a: &str, b: &str, time: bool) -> Ordering {
    if time {
        // Time cells hold timestamps; a later timestamp is a younger row
        if let (Ok(x), Ok(y)) = (
            DateTime::parse_from_rfc3339(a),
            DateTime::parse_from_rfc3339(b),
        ) {
            return y.cmp(&x);
        }
    }
    if let (Ok(x), Ok(y)) = (a.parse::<f64>(), b.parse::<f64>()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    a.cmp(b)
}
