use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use tradebook_core::tabular::{serial_to_date, CellValue, RawRow};

use crate::errors::SpreadsheetError;
use crate::source::rows_from_grid;

/// Reads the first worksheet of a workbook. The first row holds the headers.
pub(crate) fn read_workbook(path: &Path) -> Result<Vec<RawRow>, SpreadsheetError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();
    let data = rows.map(|row| row.iter().map(to_cell).collect::<Vec<_>>());
    Ok(rows_from_grid(headers, data))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => serial_to_date(dt.as_f64())
            .map(CellValue::Date)
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
