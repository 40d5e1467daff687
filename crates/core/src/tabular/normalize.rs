//! Applies a dataset's normalization table to raw sheet rows.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::tabular_model::{CellValue, FieldKind, FieldSpec, FieldValue, RawRow, Record};

/// Currency marks removed before numeric coercion.
const CURRENCY_MARKS: [char; 6] = ['₹', '$', '€', '£', '¥', '%'];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Highest serial number a spreadsheet date can carry (9999-12-31).
const MAX_SERIAL_DATE: f64 = 2_958_465.0;

/// Builds a [`Record`] holding every column of `table`, coerced to its kind.
///
/// Missing columns and unparseable values fall back to the kind's default.
pub fn normalize_row(row: &RawRow, table: &[FieldSpec]) -> Record {
    let mut record = Record::new(row.line);
    for spec in table {
        let cell = row.get(spec.column).unwrap_or(&CellValue::Empty);
        record.insert(spec.column, coerce(cell, spec.kind));
    }
    record
}

fn coerce(cell: &CellValue, kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Symbol => FieldValue::Text(cell_text(cell).to_uppercase()),
        FieldKind::Text => FieldValue::Text(cell_text(cell)),
        FieldKind::Number => FieldValue::Number(cell_number(cell)),
        FieldKind::Integer => FieldValue::Number(cell_number(cell).trunc()),
        FieldKind::Date => FieldValue::Date(cell_date(cell)),
    }
}

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 => format!("{}", *n as i64),
        CellValue::Number(n) => n.to_string(),
        CellValue::Bool(b) => b.to_string().to_uppercase(),
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
    }
}

fn cell_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) if n.is_nan() => 0.0,
        CellValue::Number(n) => *n,
        CellValue::Text(s) => parse_number(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn cell_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Number(n) => serial_to_date(*n),
        CellValue::Text(s) => parse_date(s),
        _ => None,
    }
}

/// Parses a display-formatted number such as `₹1,23,456.50`, `$ 1,000` or `(250)`.
///
/// Returns `None` for text that is not a number after stripping.
pub fn parse_number(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let negative_parens = s.starts_with('(') && s.ends_with(')');
    if negative_parens {
        s = &s[1..s.len() - 1];
    }
    let s = s.trim_start_matches("Rs.").trim_start_matches("INR");
    let cleaned: String = s
        .chars()
        .filter(|c| !CURRENCY_MARKS.contains(c) && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() || cleaned.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    let value = cleaned.parse::<f64>().ok()?;
    Some(if negative_parens { -value } else { value })
}

/// Parses the date spellings commonly produced by brokers' exports.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    // Sheets exported with a time part we don't know: try the leading date.
    s.get(..10).and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// Converts a spreadsheet serial day number (1900 date system) to a date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL_DATE {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}
