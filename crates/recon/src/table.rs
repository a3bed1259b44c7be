//! Raw cell grids and header-row location.
//!
//! Stock list exports often carry a few metadata rows (title, export date,
//! filters) above the real column headers. The header row is the first row,
//! within a small scan window, whose first cell reads `Item #`.

use serde::Serialize;

use crate::config::CompareConfig;
use crate::error::ReconError;
use crate::model::Snapshot;

/// A single cell as delivered by a file reader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// Cell rendered as text. Integral numbers print without decimals, so a
    /// numeric `Item #` of `1042.0` becomes `"1042"`.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        }
    }

    /// Numeric value, if the cell holds one. Unparseable text is `None`.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Empty | Self::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }
}

/// Grid of cells, row-major, rows may differ in width.
pub type Grid = Vec<Vec<Cell>>;

/// Rows below the located header, with the header's names.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Where the table came from (a file path, usually). Informational.
    pub source: Option<String>,
    /// Index of the header row in the source grid.
    pub header_row: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Locate the header row and split the grid into headers + data rows.
    ///
    /// Fully empty rows are dropped. Fails with `EmptyInput` if the grid has no
    /// non-empty row.
    pub fn from_grid(
        snapshot: Snapshot,
        grid: Grid,
        config: &CompareConfig,
    ) -> Result<Self, ReconError> {
        let header_row = match locate_header(&grid, &config.header_marker, config.header_scan_rows) {
            Some(i) => i,
            None => {
                let first = grid
                    .iter()
                    .position(|row| !is_blank_row(row))
                    .ok_or(ReconError::EmptyInput { snapshot })?;
                log::debug!(
                    "{snapshot}: no '{}' header in first {} rows, using row {first}",
                    config.header_marker,
                    config.header_scan_rows
                );
                first
            }
        };

        let mut rows = grid.into_iter().skip(header_row);
        let headers: Vec<String> = rows
            .next()
            .unwrap_or_default()
            .iter()
            .map(|c| c.to_text().trim().to_string())
            .collect();
        let rows: Vec<Vec<Cell>> = rows.filter(|row| !is_blank_row(row)).collect();

        log::debug!(
            "{snapshot}: header at row {header_row}, {} columns, {} data rows",
            headers.len(),
            rows.len()
        );

        Ok(Self {
            source: None,
            header_row,
            headers,
            rows,
        })
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Position of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `col` of `row`, or `Cell::Empty` past the end of a short row.
    pub fn cell<'a>(row: &'a [Cell], col: usize) -> &'a Cell {
        row.get(col).unwrap_or(&EMPTY)
    }
}

/// Index of the first row within `scan_rows` whose first cell, trimmed,
/// equals `marker`.
pub fn locate_header(grid: &[Vec<Cell>], marker: &str, scan_rows: usize) -> Option<usize> {
    grid.iter()
        .take(scan_rows)
        .position(|row| row.first().is_some_and(|c| c.to_text().trim() == marker))
}

fn is_blank_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_empty)
}
