//! The spreadsheet-shaped projection of a set of locales.
//!
//! Row 0 is the header (a free-text label, then one locale code per column),
//! column 0 of every later row is a string name, and the remaining cells hold
//! the text of that name in each locale. The grid is always dense: a name a
//! locale lacks gets an empty cell.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::Error,
    escape::escape_text,
    types::{Locale, StringItem},
};

/// Default text of the header's first cell.
pub const DEFAULT_HEADER_LABEL: &str = "strings-name";

/// One spreadsheet cell as handed over by a sheet reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    /// A formula cell; its source text is used as the value.
    Formula(String),
    /// Any other value type (numbers, booleans, dates, error cells).
    Unsupported(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

/// One row of strings: a name and one text per table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub name: String,
    pub cells: Vec<String>,
}

/// A dense locale-by-name table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Text of the header's first cell.
    pub label: String,
    /// Locale codes, in column order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Flattens locales into a table.
    ///
    /// Rows are the union of every name in every locale, in first-seen order
    /// (locales scanned in input order). Columns follow the input order.
    pub fn from_locales(locales: &[Locale], label: impl Into<String>) -> Self {
        let mut names: Vec<&str> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for locale in locales {
            for item in &locale.items {
                if seen.insert(item.name.as_str()) {
                    names.push(item.name.as_str());
                }
            }
        }

        let lookups: Vec<HashMap<&str, &str>> = locales
            .iter()
            .map(|locale| {
                let mut lookup = HashMap::new();
                for item in &locale.items {
                    lookup
                        .entry(item.name.as_str())
                        .or_insert(item.text.as_str());
                }
                lookup
            })
            .collect();

        let rows = names
            .into_iter()
            .map(|name| Row {
                name: name.to_string(),
                cells: lookups
                    .iter()
                    .map(|lookup| lookup.get(name).copied().unwrap_or_default().to_string())
                    .collect(),
            })
            .collect();

        Table {
            label: label.into(),
            columns: locales.iter().map(|locale| locale.code.clone()).collect(),
            rows,
        }
    }

    /// Reads a table out of a raw cell grid (row-major, row 0 is the header).
    ///
    /// The header ends at its last non-blank cell; cells to the right of it
    /// in any row are ignored. Locale codes and string names are taken
    /// verbatim, but a code or name made only of whitespace counts as blank.
    ///
    /// Rows shorter than the header read as empty text. Unsupported cell
    /// types read as empty text and are logged. A missing header, a blank
    /// code between filled ones, a repeated code, or a row with text but no
    /// name is a [`Error::MalformedTable`]. Fully blank rows are skipped.
    pub fn from_grid(grid: &[Vec<Cell>]) -> Result<Self, Error> {
        let header = grid
            .first()
            .ok_or_else(|| Error::malformed_table(0, 0, "missing header row"))?;
        if header.is_empty() {
            return Err(Error::malformed_table(0, 0, "header row has no cells"));
        }

        let label = cell_text(&header[0], 0, 0);
        let mut codes: Vec<String> = header
            .iter()
            .enumerate()
            .skip(1)
            .map(|(column, cell)| cell_text(cell, 0, column))
            .collect();
        while codes.last().is_some_and(|code| is_blank(code)) {
            codes.pop();
        }
        if codes.len() + 1 < header.len() {
            debug!(
                ignored = header.len() - 1 - codes.len(),
                "ignoring blank header cells after the last locale code"
            );
        }

        let mut columns: Vec<String> = Vec::with_capacity(codes.len());
        for (index, code) in codes.into_iter().enumerate() {
            let column = index + 1;
            if is_blank(&code) {
                return Err(Error::malformed_table(0, column, "empty locale code"));
            }
            if columns.contains(&code) {
                return Err(Error::malformed_table(
                    0,
                    column,
                    format!("duplicate locale code `{code}`"),
                ));
            }
            columns.push(code);
        }

        let mut rows = Vec::with_capacity(grid.len().saturating_sub(1));
        for (row_index, raw) in grid.iter().enumerate().skip(1) {
            let name = raw
                .first()
                .map(|cell| cell_text(cell, row_index, 0))
                .unwrap_or_default();
            let cells: Vec<String> = (1..=columns.len())
                .map(|column| {
                    raw.get(column)
                        .map(|cell| cell_text(cell, row_index, column))
                        .unwrap_or_default()
                })
                .collect();

            if is_blank(&name) {
                if cells.iter().all(|cell| is_blank(cell)) {
                    debug!(row = row_index, "skipping blank row");
                    continue;
                }
                return Err(Error::malformed_table(
                    row_index,
                    0,
                    "row has translations but no string name",
                ));
            }
            rows.push(Row { name, cells });
        }

        Ok(Table {
            label,
            columns,
            rows,
        })
    }

    /// Splits the table back into one locale per column.
    ///
    /// Every cell goes through [`escape_text`]. When a name repeats across
    /// rows the last row's text wins, kept at the position of the first row.
    pub fn to_locales(&self) -> Vec<Locale> {
        self.columns
            .iter()
            .enumerate()
            .map(|(column, code)| {
                let mut items: Vec<StringItem> = Vec::with_capacity(self.rows.len());
                let mut positions: HashMap<&str, usize> = HashMap::new();
                for row in &self.rows {
                    let text = escape_text(row.cells.get(column).map_or("", String::as_str));
                    match positions.get(row.name.as_str()) {
                        Some(&index) => {
                            warn!(locale = %code, name = %row.name, "duplicate string name in table, last row wins");
                            items[index].text = text;
                        }
                        None => {
                            positions.insert(row.name.as_str(), items.len());
                            items.push(StringItem::new(row.name.clone(), text));
                        }
                    }
                }
                Locale::new(code.clone(), items)
            })
            .collect()
    }

    /// Renders the table as rows of plain strings, header first.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(self.label.clone());
        header.extend(self.columns.iter().cloned());
        grid.push(header);
        for row in &self.rows {
            let mut line = Vec::with_capacity(row.cells.len() + 1);
            line.push(row.name.clone());
            line.extend(row.cells.iter().cloned());
            grid.push(line);
        }
        grid
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn cell_text(cell: &Cell, row: usize, column: usize) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(text) | Cell::Formula(text) => text.clone(),
        Cell::Unsupported(kind) => {
            let err = Error::UnsupportedCellType {
                row,
                column,
                kind: kind.clone(),
            };
            warn!("{err}, reading it as empty text");
            String::new()
        }
    }
}
