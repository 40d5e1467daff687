use csv::{ByteRecord, ReaderBuilder, Trim};
use log::warn;
use std::path::Path;

use tradebook_core::tabular::{CellValue, RawRow};

use crate::errors::SpreadsheetError;
use crate::source::rows_from_grid;

/// Reads a comma-separated file; every cell is kept as text.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD instead of failing
/// the read.
pub(crate) fn read_csv(path: &Path) -> Result<Vec<RawRow>, SpreadsheetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| lossy_text(h).trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut data = Vec::new();
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        if std::str::from_utf8(record.as_slice()).is_err() {
            warn!(
                "{}: line {} is not valid UTF-8, replacing the bad bytes",
                path.display(),
                record.position().map_or(0, |p| p.line())
            );
        }
        data.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(lossy_text(field))
                    }
                })
                .collect::<Vec<_>>(),
        );
    }
    Ok(rows_from_grid(headers, data))
}

fn lossy_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_reads_headers_and_text_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("positions.csv");
        fs::write(
            &path,
            "\u{feff}Symbol, Avg Price ,Qty\ninfy,\"₹1,450.50\",10\n,,\nTCS,3000\n",
        )
        .unwrap();

        let rows = read_csv(&path).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("symbol"),
            Some(&CellValue::Text("infy".to_string()))
        );
        assert_eq!(
            rows[0].get("avg_price"),
            Some(&CellValue::Text("₹1,450.50".to_string()))
        );
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].get("qty"), None);
    }

    #[test]
    fn test_badly_encoded_row_does_not_fail_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dividends.csv");
        fs::write(&path, b"Symbol,Note\nINFY,ok\nTCS,bad\xff\nHDFC,fine\n").unwrap();

        let rows = read_csv(&path).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1].get("note"),
            Some(&CellValue::Text("bad\u{fffd}".to_string()))
        );
        assert_eq!(
            rows[2].get("symbol"),
            Some(&CellValue::Text("HDFC".to_string()))
        );
    }
}
