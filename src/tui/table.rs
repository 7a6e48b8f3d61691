//! Table view over a live model
//!
//! Consumes the model's change events to decide row colors and reads the
//! current generation for row contents. A row keeps the color of its latest
//! event until the next generation arrives; rows deleted in the latest batch
//! linger at the bottom in the deleted color for that long.

use super::Theme;
use crate::client::Scope;
use crate::model::{ChangeEvent, EventKind, Header, Row, TableModel};
use crate::render::to_age;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Constraint,
    style::Color,
    text::Span,
    widgets::{Block, Borders, Row as TableRow, Table},
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Gap between columns in text output
const COLUMN_GAP: usize = 2;

/// A row ready to draw: visible cells only, time columns formatted
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub id: String,
    pub cells: Vec<String>,
    pub color: Color,
    pub kind: EventKind,
}

/// Consumer side of a [`TableModel`]
pub struct TableView {
    model: Arc<TableModel>,
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    scope: Scope,
    wide: bool,
    sort: Option<(String, bool)>,
    recent: HashMap<String, ChangeEvent>,
    seen_revision: u64,
    selected: usize,
}

impl TableView {
    pub fn new(model: Arc<TableModel>, scope: Scope, wide: bool) -> Self {
        let events = model.subscribe();
        let seen_revision = model.current_generation().revision();
        Self {
            model,
            events,
            scope,
            wide,
            sort: None,
            recent: HashMap::new(),
            seen_revision,
            selected: 0,
        }
    }

    pub fn model(&self) -> &Arc<TableModel> {
        &self.model
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn header(&self) -> Header {
        self.model.header(&self.scope)
    }

    pub fn is_wide(&self) -> bool {
        self.wide
    }

    pub fn toggle_wide(&mut self) {
        self.wide = !self.wide;
    }

    /// Sort by a column; `None` restores id order
    pub fn set_sort(&mut self, column: Option<&str>, ascending: bool) {
        self.sort = column.map(|c| (c.to_string(), ascending));
    }

    /// Sort by `column`, flipping direction when it is already the sort column
    pub fn toggle_sort(&mut self, column: &str) {
        let ascending = match &self.sort {
            Some((current, ascending)) if current == column => !ascending,
            _ => true,
        };
        self.set_sort(Some(column), ascending);
    }

    /// Pull pending change events; returns how many arrived
    pub fn drain(&mut self) -> usize {
        let mut batch = Vec::new();
        while let Ok(evt) = self.events.try_recv() {
            batch.push(evt);
        }

        let revision = self.model.current_generation().revision();
        if !batch.is_empty() || revision != self.seen_revision {
            self.recent = batch
                .iter()
                .map(|evt| (evt.id().to_string(), evt.clone()))
                .collect();
            self.seen_revision = revision;
        }

        if !batch.is_empty() {
            tracing::trace!("{} view received {} events", self.model.gvr(), batch.len());
        }
        batch.len()
    }

    /// Rows in display order
    pub fn rows(&self, now: DateTime<Utc>) -> Vec<ViewRow> {
        let generation = self.model.current_generation();
        let header = self.header();
        let visible = header.visible_indices(self.wide);

        let rows = match &self.sort {
            Some((column, ascending)) => generation.sorted_by(&header, column, *ascending),
            None => generation.sorted_rows(),
        };

        let mut out: Vec<ViewRow> = rows
            .into_iter()
            .map(|row| {
                let event = match self.recent.get(&row.id) {
                    Some(evt) if evt.kind() != EventKind::Deleted => evt.clone(),
                    _ => ChangeEvent::unchanged(row.clone()),
                };
                self.view_row(&header, &visible, row, &event, now)
            })
            .collect();

        let mut deleted: Vec<&ChangeEvent> = self
            .recent
            .values()
            .filter(|evt| evt.kind() == EventKind::Deleted && !generation.contains(evt.id()))
            .collect();
        deleted.sort_by(|a, b| a.id().cmp(b.id()));
        out.extend(
            deleted
                .into_iter()
                .map(|evt| self.view_row(&header, &visible, evt.row(), evt, now)),
        );

        out
    }

    fn view_row(
        &self,
        header: &Header,
        visible: &[usize],
        row: &Row,
        event: &ChangeEvent,
        now: DateTime<Utc>,
    ) -> ViewRow {
        let cells = visible
            .iter()
            .map(|&i| {
                let cell = row.cell(i);
                if header.columns()[i].attrs.time {
                    to_age(cell, now)
                } else {
                    cell.to_string()
                }
            })
            .collect();

        ViewRow {
            id: row.id.clone(),
            cells,
            color: self.model.color_for(&self.scope, event),
            kind: event.kind(),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        let len = self.model.current_generation().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Id of the selected row
    pub fn selected_id(&self, now: DateTime<Utc>) -> Option<String> {
        self.rows(now).into_iter().nth(self.selected).map(|r| r.id)
    }

    /// Title shown on the table border
    pub fn title(&self) -> String {
        format!(
            " {}({})[{}] ",
            self.model.gvr().resource(),
            self.scope,
            self.model.current_generation().len()
        )
    }

    /// ratatui widget for the current state
    pub fn widget(&self, theme: &Theme, now: DateTime<Utc>) -> Table<'static> {
        let header = self.header();
        let names: Vec<String> = header
            .column_names(self.wide)
            .into_iter()
            .map(String::from)
            .collect();
        let rows = self.rows(now);
        let widths: Vec<Constraint> = column_widths(&names, &rows)
            .into_iter()
            .map(length_constraint)
            .collect();

        let selected = self.selected.min(rows.len().saturating_sub(1));
        let table_rows: Vec<TableRow<'static>> = rows
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let style = if i == selected {
                    theme.table_selected_style()
                } else {
                    theme.row_style(r.color)
                };
                TableRow::new(r.cells).style(style)
            })
            .collect();

        Table::new(table_rows, widths)
            .header(TableRow::new(names).style(theme.header_style()))
            .column_spacing(COLUMN_GAP as u16)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(ratatui::style::Style::default().fg(theme.border))
                    .title(Span::styled(
                        self.title(),
                        theme.title_style(self.scope.is_all()),
                    )),
            )
    }

    /// Plain-text rendering of the table
    ///
    /// Columns are left aligned and padded to their widest cell. Lines carry
    /// no trailing whitespace and there is no trailing newline.
    pub fn dump(&self, now: DateTime<Utc>) -> String {
        let names: Vec<String> = self
            .header()
            .column_names(self.wide)
            .into_iter()
            .map(String::from)
            .collect();
        let rows = self.rows(now);
        let widths = column_widths(&names, &rows);

        std::iter::once(&names)
            .chain(rows.iter().map(|r| &r.cells))
            .map(|cells| format_line(cells, &widths))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fixed column width, saturating at what a terminal can address
fn length_constraint(width: usize) -> Constraint {
    Constraint::Length(u16::try_from(width).unwrap_or(u16::MAX))
}

fn column_widths(names: &[String], rows: &[ViewRow]) -> Vec<usize> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .filter_map(|r| r.cells.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect()
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let gap = " ".repeat(COLUMN_GAP);
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(&gap)
        .trim_end()
        .to_string()
}
