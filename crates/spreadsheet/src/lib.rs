//! Tabular source readers.
//!
//! Implements [`TabularSourceTrait`](tradebook_core::tabular::TabularSourceTrait)
//! for workbook files (`.xlsx`, `.xlsm`, `.xls`, `.ods`; first worksheet) and
//! for `.csv` files. Headers are normalized; cell typing is left to the
//! dataset's normalization table.

mod csv_reader;
mod errors;
mod source;
mod workbook_reader;

pub use errors::SpreadsheetError;
pub use source::{SheetFormat, SpreadsheetSource};
