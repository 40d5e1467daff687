//! Read-through cache over a tabular source.
//!
//! The cached dataset is an immutable `Arc` snapshot. A reload builds a complete
//! new dataset and swaps it in one step, so readers see either the old set or
//! the new one, never a mix.

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::{Arc, RwLock};

use super::normalize::normalize_row;
use super::tabular_traits::{FromRecord, TabularSourceTrait};
use crate::errors::{DataSourceError, Error, Result};

/// One loaded generation of a source's records.
#[derive(Debug)]
pub struct Dataset<T> {
    pub version: u64,
    pub source: String,
    pub loaded_at: Option<DateTime<Utc>>,
    pub records: Vec<T>,
    pub skipped_rows: usize,
}

impl<T> Dataset<T> {
    fn empty(source: String) -> Self {
        Self {
            version: 0,
            source,
            loaded_at: None,
            records: Vec::new(),
            skipped_rows: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Outcome of a reload, returned by the reload endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReloadSummary {
    pub source: String,
    pub version: u64,
    pub records: usize,
    pub skipped_rows: usize,
}

pub struct DatasetCache<T> {
    source: Arc<dyn TabularSourceTrait>,
    current: RwLock<Arc<Dataset<T>>>,
}

impl<T: FromRecord + Send + Sync> DatasetCache<T> {
    pub fn new(source: Arc<dyn TabularSourceTrait>) -> Self {
        let empty = Dataset::empty(source.describe());
        Self {
            source,
            current: RwLock::new(Arc::new(empty)),
        }
    }

    /// The cached dataset as is, without triggering a load.
    pub fn current(&self) -> Arc<Dataset<T>> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// The cached dataset, loading it first when nothing is cached yet.
    pub fn get(&self) -> Result<Arc<Dataset<T>>> {
        let dataset = self.current();
        if !dataset.is_empty() {
            return Ok(dataset);
        }
        debug!(
            "No cached records for {}, loading on first read",
            self.source.describe()
        );
        self.reload()?;
        Ok(self.current())
    }

    /// Reads the whole source and replaces the cached dataset.
    ///
    /// On failure, or when no row converts, the previous dataset stays in place.
    pub fn reload(&self) -> Result<ReloadSummary> {
        let source_name = self.source.describe();
        let rows = self.source.read_rows().map_err(|e| {
            error!("Failed to read {}: {}", source_name, e);
            e
        })?;

        let total = rows.len();
        let mut records = Vec::with_capacity(total);
        let mut skipped_rows = 0;
        for row in &rows {
            let record = normalize_row(row, T::FIELDS);
            match T::from_record(&record) {
                Ok(item) => records.push(item),
                Err(e) => {
                    warn!("Skipping row {} of {}: {}", record.line, source_name, e);
                    skipped_rows += 1;
                }
            }
        }

        if records.is_empty() {
            error!(
                "{} yielded no usable records ({} rows read, {} skipped)",
                source_name, total, skipped_rows
            );
            return Err(Error::DataSource(DataSourceError::Empty(source_name)));
        }

        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let version = guard.version + 1;
        let summary = ReloadSummary {
            source: source_name.clone(),
            version,
            records: records.len(),
            skipped_rows,
        };
        *guard = Arc::new(Dataset {
            version,
            source: source_name,
            loaded_at: Some(Utc::now()),
            records,
            skipped_rows,
        });
        info!(
            "Loaded {} records from {} (version {}, {} rows skipped)",
            summary.records, summary.source, summary.version, summary.skipped_rows
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RowError;
    use crate::tabular::{CellValue, FieldKind, FieldSpec, RawRow, Record};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, PartialEq)]
    struct Item {
        name: String,
        value: f64,
    }

    impl FromRecord for Item {
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::new("name", FieldKind::Text),
            FieldSpec::new("value", FieldKind::Number),
        ];

        fn from_record(record: &Record) -> std::result::Result<Self, RowError> {
            let name = record.text("name");
            if name.is_empty() {
                return Err(RowError::MissingText { column: "name" });
            }
            Ok(Item {
                name: name.to_string(),
                value: record.number("value"),
            })
        }
    }

    struct MockSource {
        rows: Mutex<Option<Vec<RawRow>>>,
        reads: AtomicUsize,
    }

    impl MockSource {
        fn new(rows: Option<Vec<RawRow>>) -> Self {
            Self {
                rows: Mutex::new(rows),
                reads: AtomicUsize::new(0),
            }
        }

        fn set_rows(&self, rows: Option<Vec<RawRow>>) {
            *self.rows.lock().unwrap() = rows;
        }
    }

    impl TabularSourceTrait for MockSource {
        fn describe(&self) -> String {
            "mock.xlsx".to_string()
        }

        fn read_rows(&self) -> Result<Vec<RawRow>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.rows
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| Error::DataSource(DataSourceError::NotFound("mock.xlsx".into())))
        }
    }

    fn row(line: usize, name: &str, value: &str) -> RawRow {
        RawRow::new(line)
            .with_cell("name", CellValue::Text(name.to_string()))
            .with_cell("value", CellValue::Text(value.to_string()))
    }

    #[test]
    fn test_get_loads_on_first_read_only() {
        let source = Arc::new(MockSource::new(Some(vec![row(1, "a", "1.5")])));
        let cache: DatasetCache<Item> = DatasetCache::new(source.clone());

        let first = cache.get().unwrap();
        let second = cache.get().unwrap();

        assert_eq!(first.records.len(), 1);
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 1);
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let source = Arc::new(MockSource::new(Some(vec![
            row(1, "a", "1"),
            row(2, "", "2"),
            row(3, "c", "oops"),
        ])));
        let cache: DatasetCache<Item> = DatasetCache::new(source);

        let summary = cache.reload().unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.skipped_rows, 1);

        let dataset = cache.current();
        assert_eq!(dataset.records[1].value, 0.0);
    }

    #[test]
    fn test_failed_reload_keeps_previous_dataset() {
        let source = Arc::new(MockSource::new(Some(vec![row(1, "a", "1")])));
        let cache: DatasetCache<Item> = DatasetCache::new(source.clone());
        cache.reload().unwrap();

        source.set_rows(None);
        let err = cache.reload().unwrap_err();
        assert!(matches!(err, Error::DataSource(DataSourceError::NotFound(_))));

        let dataset = cache.current();
        assert_eq!(dataset.version, 1);
        assert_eq!(dataset.records.len(), 1);
    }

    #[test]
    fn test_reload_replaces_whole_dataset() {
        let source = Arc::new(MockSource::new(Some(vec![row(1, "a", "1"), row(2, "b", "2")])));
        let cache: DatasetCache<Item> = DatasetCache::new(source.clone());
        cache.reload().unwrap();

        source.set_rows(Some(vec![row(1, "z", "9")]));
        let summary = cache.reload().unwrap();

        assert_eq!(summary.version, 2);
        let dataset = cache.current();
        assert_eq!(
            dataset.records,
            vec![Item {
                name: "z".to_string(),
                value: 9.0
            }]
        );
    }

    #[test]
    fn test_empty_source_is_unavailable() {
        let source = Arc::new(MockSource::new(Some(vec![])));
        let cache: DatasetCache<Item> = DatasetCache::new(source);

        let err = cache.get().unwrap_err();
        assert!(matches!(err, Error::DataSource(DataSourceError::Empty(_))));
        assert!(cache.current().is_empty());
    }
}
