//! `stockdiff-io` — stock list file readers.
//!
//! Turns CSV/TSV exports and Excel-family workbooks into the cell grids the
//! reconciliation engine consumes.

use std::path::Path;

use stockdiff_recon::{CompareConfig, Grid, RawTable, ReconError, Snapshot};

pub mod csv;
pub mod xlsx;

/// Supported input formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Tsv,
    Workbook,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Read a file into a raw cell grid.
pub fn read_grid(path: &Path) -> Result<Grid, String> {
    match Format::from_path(path) {
        Some(Format::Csv) => csv::read(path),
        Some(Format::Tsv) => csv::read_tsv(path),
        Some(Format::Workbook) => xlsx::read(path),
        None => Err(format!("unsupported file type: {}", path.display())),
    }
}

/// Load one snapshot: read the file and locate its header row.
pub fn load_table(path: &Path, snapshot: Snapshot, config: &CompareConfig) -> Result<RawTable, ReconError> {
    if !path.is_file() {
        return Err(ReconError::Io(format!(
            "{snapshot} file not found: {}",
            path.display()
        )));
    }

    let grid = read_grid(path).map_err(|message| ReconError::Load { snapshot, message })?;
    let table = RawTable::from_grid(snapshot, grid, config)?.with_source(path.display().to_string());

    log::info!(
        "loaded {snapshot} file {}: {} rows",
        path.display(),
        table.rows.len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(&PathBuf::from("a.CSV")), Some(Format::Csv));
        assert_eq!(Format::from_path(&PathBuf::from("a.tsv")), Some(Format::Tsv));
        assert_eq!(Format::from_path(&PathBuf::from("stock.xlsx")), Some(Format::Workbook));
        assert_eq!(Format::from_path(&PathBuf::from("stock.xls")), Some(Format::Workbook));
        assert_eq!(Format::from_path(&PathBuf::from("stock.pdf")), None);
        assert_eq!(Format::from_path(&PathBuf::from("stock")), None);
    }

    #[test]
    fn unsupported_extension_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let err = load_table(&path, Snapshot::Old, &CompareConfig::default()).unwrap_err();
        assert!(matches!(err, ReconError::Load { snapshot: Snapshot::Old, .. }));
        assert!(err.to_string().contains("unsupported file type"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_table(
            Path::new("/nonexistent/old.xlsx"),
            Snapshot::Old,
            &CompareConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::Io(_)));
    }
}
