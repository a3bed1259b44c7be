// Excel stock list reader (xlsx, xlsm, xlsb, xls, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use stockdiff_recon::{Cell, Grid};

/// Maximum number of rows read from a worksheet
const MAX_ROWS: usize = 1_048_576;

/// Read the first worksheet of a workbook into a cell grid.
///
/// Rows above the used range are materialized as empty rows so row indexes
/// match the sheet; columns left of it are padded the same way.
pub fn read(path: &Path) -> Result<Grid, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return Ok(Vec::new());
    }

    // Range start offset (data may not begin at A1)
    let (data_start_row, data_start_col) = range.start().unwrap_or((0, 0));
    let start_row = data_start_row as usize;
    let start_col = data_start_col as usize;

    let mut grid: Grid = vec![Vec::new(); start_row.min(MAX_ROWS)];
    for row in range.rows().take(MAX_ROWS.saturating_sub(start_row)) {
        let mut cells = vec![Cell::Empty; start_col];
        cells.extend(row.iter().map(convert));
        grid.push(cells);
    }

    if height > MAX_ROWS {
        log::warn!(
            "sheet '{}' truncated from {} to {} rows",
            sheet_name,
            height,
            MAX_ROWS
        );
    }

    Ok(grid)
}

fn convert(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // Store error as text representation
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        // Date serial; stock lists carry no meaningful dates in the compared fields
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
