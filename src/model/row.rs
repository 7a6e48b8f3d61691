//! Rendered table rows

use std::collections::BTreeSet;
use std::ops::Index;

/// Ordered cell values of a row
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Fields(Vec<String>);

impl Fields {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Indices whose cell differs from `other`
    ///
    /// When lengths differ, every index present on only one side counts as changed.
    pub fn diff(&self, other: &Fields) -> BTreeSet<usize> {
        let longest = self.len().max(other.len());
        (0..longest)
            .filter(|&i| self.0.get(i) != other.0.get(i))
            .collect()
    }
}

impl From<Vec<String>> for Fields {
    fn from(cells: Vec<String>) -> Self {
        Self(cells)
    }
}

impl From<Vec<&str>> for Fields {
    fn from(cells: Vec<&str>) -> Self {
        Self(cells.into_iter().map(str::to_string).collect())
    }
}

impl Index<usize> for Fields {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.0[index]
    }
}

/// One rendered record keyed by a stable identity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub id: String,
    pub fields: Fields,
}

impl Row {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Cell value for a column index, empty when out of range
    pub fn cell(&self, index: usize) -> &str {
        self.fields.get(index).unwrap_or_default()
    }
}
