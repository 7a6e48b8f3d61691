//! Column definitions for a table view

use super::Row;

/// Display flags carried by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnAttrs {
    /// Only shown in wide mode
    pub wide: bool,
    /// Never shown, kept for sorting and coloring
    pub hide: bool,
    /// Holds a duration or age value
    pub time: bool,
}

/// A named column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub attrs: ColumnAttrs,
}

impl Column {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: ColumnAttrs::default(),
        }
    }

    pub fn wide(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: ColumnAttrs {
                wide: true,
                ..Default::default()
            },
        }
    }

    pub fn hidden(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: ColumnAttrs {
                hide: true,
                ..Default::default()
            },
        }
    }

    pub fn time(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: ColumnAttrs {
                time: true,
                ..Default::default()
            },
        }
    }
}

/// Ordered column schema
///
/// Column order defines cell alignment: field `i` of a row belongs to column `i`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header(Vec<Column>);

impl Header {
    /// Column names must be unique; a repeated name is a bug in the renderer
    pub fn new(columns: Vec<Column>) -> Self {
        let header = Self(columns);
        debug_assert!(
            header.duplicate().is_none(),
            "duplicate column {:?}",
            header.duplicate()
        );
        header
    }

    /// First column name that appears more than once
    pub fn duplicate(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.0
            .iter()
            .map(|c| c.name.as_str())
            .find(|name| !seen.insert(*name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.0
    }

    /// Position of a column by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c.name == name)
    }

    /// Column names in order, wide columns only when `wide` is set
    pub fn column_names(&self, wide: bool) -> Vec<&str> {
        self.visible_indices(wide)
            .into_iter()
            .map(|i| self.0[i].name.as_str())
            .collect()
    }

    /// Indices of the columns to draw
    pub fn visible_indices(&self, wide: bool) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.attrs.hide && (wide || !c.attrs.wide))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_age(&self) -> bool {
        self.index_of("AGE").is_some()
    }

    /// Check that a row has exactly one cell per column
    pub fn validate_row(&self, row: &Row) -> bool {
        row.fields.len() == self.len()
    }
}

impl From<Vec<Column>> for Header {
    fn from(columns: Vec<Column>) -> Self {
        Self::new(columns)
    }
}
