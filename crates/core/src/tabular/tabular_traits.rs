//! Traits at the boundary between the datasets and the sheet readers.

use super::tabular_model::{FieldSpec, RawRow, Record};
use crate::errors::{Result, RowError};

/// A readable table of rows, e.g. the first worksheet of a workbook.
///
/// Implementations return header-normalized rows; normalization to typed
/// records happens in the dataset cache.
pub trait TabularSourceTrait: Send + Sync {
    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;

    /// Reads every data row. Fails when the source is missing or unreadable.
    fn read_rows(&self) -> Result<Vec<RawRow>>;
}

/// A typed record built from a normalized sheet row.
pub trait FromRecord: Sized {
    /// Column name → target type, with defaults for missing or unparseable cells.
    const FIELDS: &'static [FieldSpec];

    fn from_record(record: &Record) -> std::result::Result<Self, RowError>;
}
