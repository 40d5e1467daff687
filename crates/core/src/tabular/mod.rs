//! Tabular data boundary: raw sheet rows, normalization tables and the dataset cache.

mod dataset_cache;
mod normalize;
mod tabular_model;
mod tabular_traits;

pub use dataset_cache::{Dataset, DatasetCache, ReloadSummary};
pub use normalize::{normalize_row, parse_date, parse_number, serial_to_date};
pub use tabular_model::{
    normalize_header, CellValue, FieldKind, FieldSpec, FieldValue, RawRow, Record,
};
pub use tabular_traits::{FromRecord, TabularSourceTrait};
