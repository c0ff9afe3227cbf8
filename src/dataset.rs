//! Dataset loading: CSV rows → validated [`Record`]s.
//!
//! ## Why tolerate bad rows?
//!
//! The spreadsheet is hand-maintained over years; a single mangled row must
//! not cost the other few hundred their notes. Rows that fail to deserialise
//! are logged and dropped, and the load carries on. Only failures that make
//! the whole file unusable (missing file, unreadable header) are fatal.

use crate::error::ImportError;
use crate::record::Record;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load every parseable record from a CSV dataset.
///
/// Cells are trimmed, empty cells become `None`, and each record remembers
/// its 1-indexed data row for diagnostics. Rows that fail to deserialise are
/// skipped with a warning.
pub fn load_records(path: &Path) -> Result<Vec<Record>, ImportError> {
    if !path.exists() {
        return Err(ImportError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ImportError::DatasetRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<Record>().enumerate() {
        let row_num = i + 1;
        match row {
            Ok(mut record) => {
                record.row = row_num;
                records.push(record);
            }
            Err(e) => warn!("Skipping unreadable row {row_num}: {e}"),
        }
    }

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Apply the upstream filter: drop title-less rows, and when `source_codes`
/// is non-empty keep only records whose source code is listed.
///
/// A record without `Article` is invalid by contract and must never reach
/// the pipeline; it is dropped here with a warning.
pub fn filter_records(records: Vec<Record>, source_codes: &[String]) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| {
            if r.article.is_none() {
                warn!("Dropping row {}: no Article value", r.row);
                return false;
            }
            if source_codes.is_empty() {
                return true;
            }
            let keep = r
                .source_code
                .as_deref()
                .is_some_and(|src| source_codes.iter().any(|c| c == src));
            if !keep {
                debug!(
                    "Dropping row {}: source {:?} not selected",
                    r.row, r.source_code
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DATA: &str = "\
Article,Date,Src,T,Name_1,Place_1,Full_Filename
Fire at Mill,1901-05-10,NC,Fires,John Jones,Llanychan,scan12.pdf
,1902-01-01,NC,,,
Census Return,1881-04-03,CEN,,,Llanychan,
Ship Launch,1899-07-21,WN,Shipping,,,launch.jpg
";

    fn write_dataset(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_rows_with_positions() {
        let f = write_dataset(DATA);
        let records = load_records(f.path()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].row, 1);
        assert_eq!(records[3].row, 4);
        assert_eq!(records[3].article.as_deref(), Some("Ship Launch"));
    }

    #[test]
    fn missing_dataset_is_fatal() {
        let err = load_records(Path::new("/no/such/dataset.csv")).unwrap_err();
        assert!(matches!(err, ImportError::DatasetNotFound { .. }));
    }

    #[test]
    fn filter_drops_titleless_rows() {
        let f = write_dataset(DATA);
        let records = filter_records(load_records(f.path()).unwrap(), &[]);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.article.is_some()));
    }

    #[test]
    fn filter_by_source_codes() {
        let f = write_dataset(DATA);
        let codes = vec!["NC".to_string(), "WN".to_string()];
        let records = filter_records(load_records(f.path()).unwrap(), &codes);
        let titles: Vec<_> = records.iter().map(|r| r.article.as_deref().unwrap()).collect();
        assert_eq!(titles, vec!["Fire at Mill", "Ship Launch"]);
    }

    #[test]
    fn short_rows_do_not_abort_the_load() {
        // Row 2 has fewer columns than the header; flexible mode keeps it.
        let f = write_dataset("Article,Date,Src\nFire at Mill,1901-05-10,NC\nStub\n");
        let records = load_records(f.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].article.as_deref(), Some("Stub"));
        assert_eq!(records[1].date, None);
    }
}
