use log::{debug, error};
use std::path::{Path, PathBuf};

use tradebook_core::errors::Result;
use tradebook_core::tabular::{normalize_header, CellValue, RawRow, TabularSourceTrait};

use crate::csv_reader::read_csv;
use crate::errors::SpreadsheetError;
use crate::workbook_reader::read_workbook;

/// How a file is read, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Workbook,
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> std::result::Result<Self, SpreadsheetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SheetFormat::Workbook),
            "csv" => Ok(SheetFormat::Csv),
            _ => Err(SpreadsheetError::UnsupportedFormat(extension)),
        }
    }
}

/// A spreadsheet file on disk, re-read on every call.
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    path: PathBuf,
}

impl SpreadsheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::result::Result<Vec<RawRow>, SpreadsheetError> {
        if !self.path.is_file() {
            return Err(SpreadsheetError::Missing);
        }
        match SheetFormat::from_path(&self.path)? {
            SheetFormat::Workbook => read_workbook(&self.path),
            SheetFormat::Csv => read_csv(&self.path),
        }
    }
}

impl TabularSourceTrait for SpreadsheetSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_rows(&self) -> Result<Vec<RawRow>> {
        debug!("Reading rows from {}", self.path.display());
        self.read().map_err(|e| {
            error!("Could not read {}: {}", self.path.display(), e);
            e.into_core(&self.path)
        })
    }
}

/// Pairs a header row with data rows. Columns with a blank header and rows
/// with no value at all are dropped; `line` counts data rows from 1.
pub(crate) fn rows_from_grid<I>(headers: Vec<String>, data: I) -> Vec<RawRow>
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    data.into_iter()
        .enumerate()
        .filter_map(|(index, cells)| {
            if cells.iter().all(CellValue::is_empty) {
                return None;
            }
            let mut row = RawRow::new(index + 1);
            for (header, cell) in headers.iter().zip(cells) {
                if !header.is_empty() {
                    row.cells.insert(header.clone(), cell);
                }
            }
            Some(row)
        })
        .collect()
}
