//! Tabular data models shared by the spreadsheet loader and the datasets.

use chrono::NaiveDate;
use std::collections::HashMap;

/// A single cell as read from a sheet, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// One sheet row keyed by normalized header name.
///
/// `line` is the 1-based data row number, used when logging skipped rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub cells: HashMap<String, CellValue>,
}

impl RawRow {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            cells: HashMap::new(),
        }
    }

    pub fn with_cell(mut self, column: &str, value: CellValue) -> Self {
        self.cells.insert(normalize_header(column), value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }
}

/// Target type of a column in a dataset's normalization table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed, upper-cased text; empty when missing.
    Symbol,
    /// Trimmed text; empty when missing.
    Text,
    /// Float; currency marks and separators stripped, 0.0 when missing or unparseable.
    Number,
    /// Number truncated toward zero.
    Integer,
    /// Calendar date; none when missing or unparseable.
    Date,
}

/// One entry of a normalization table: column name, target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(column: &'static str, kind: FieldKind) -> Self {
        Self { column, kind }
    }
}

/// A normalized value. Every column in the table is present after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(Option<NaiveDate>),
}

/// A row after applying a normalization table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub line: usize,
    values: HashMap<&'static str, FieldValue>,
}

impl Record {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            values: HashMap::new(),
        }
    }

    pub fn insert(&mut self, column: &'static str, value: FieldValue) {
        self.values.insert(column, value);
    }

    /// Text value of a column; empty for unknown columns or non-text values.
    pub fn text(&self, column: &str) -> &str {
        match self.values.get(column) {
            Some(FieldValue::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    /// Numeric value of a column; 0.0 for unknown columns or non-numeric values.
    pub fn number(&self, column: &str) -> f64 {
        match self.values.get(column) {
            Some(FieldValue::Number(n)) => *n,
            _ => 0.0,
        }
    }

    pub fn date(&self, column: &str) -> Option<NaiveDate> {
        match self.values.get(column) {
            Some(FieldValue::Date(d)) => *d,
            _ => None,
        }
    }
}

/// Normalizes a header cell: trimmed, lower-cased, inner whitespace as `_`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}
