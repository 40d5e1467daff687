use std::path::Path;
use thiserror::Error;

use tradebook_core::errors::{DataSourceError, Error as CoreError};

/// Failures while opening or reading a sheet.
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("File not found")]
    Missing,

    #[error("Unsupported file extension '{0}'")]
    UnsupportedFormat(String),

    #[error("Workbook has no worksheet")]
    NoWorksheet,

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SpreadsheetError {
    /// Attaches the source path and converts to the core error.
    pub fn into_core(self, path: &Path) -> CoreError {
        let source_name = path.display().to_string();
        match self {
            SpreadsheetError::Missing => DataSourceError::NotFound(source_name).into(),
            other => DataSourceError::Unreadable {
                source_name,
                message: other.to_string(),
            }
            .into(),
        }
    }
}
