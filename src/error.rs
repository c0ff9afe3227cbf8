//! Error types for the clip2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ImportError`] — **Fatal**: the batch cannot proceed at all (dataset
//!   missing or unreadable, invalid configuration, output directory cannot be
//!   created). Returned as `Err(ImportError)` from the top-level `import*`
//!   functions.
//!
//! * [`RecordError`] — **Non-fatal**: a single record failed (required field
//!   missing, note file could not be written) but every other record is fine.
//!   Stored inside [`crate::output::NoteResult`] so callers can inspect
//!   partial success rather than losing the whole batch to one bad row.
//!
//! Date-parse failures, missing source files, and thumbnail failures are
//! softer still: the note is written anyway with the affected sections
//! omitted, and the problem only surfaces as a `tracing` warning.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the clip2md library.
///
/// Record-level failures use [`RecordError`] and are stored in
/// [`crate::output::NoteResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Dataset file was not found at the given path.
    #[error("Dataset not found: '{path}'\nCheck the path exists and is readable.")]
    DatasetNotFound { path: PathBuf },

    /// Dataset exists but could not be opened or read as CSV.
    #[error("Failed to read dataset '{path}': {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A vault directory could not be created.
    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every record failed; no note was written at all.
    #[error("All {total} records failed.\nFirst error: {first_error}")]
    AllRecordsFailed { total: usize, first_error: String },
}

/// A non-fatal error for a single record.
///
/// Stored alongside [`crate::output::NoteResult`] when a record fails.
/// The overall import continues unless ALL records fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum RecordError {
    /// Required `article` field is missing; the record never reaches the
    /// pipeline.
    #[error("Record {row}: required field 'Article' is missing")]
    MissingTitle { row: usize },

    /// A note already exists at the computed path and the collision policy
    /// is [`Skip`](crate::config::CollisionPolicy::Skip).
    #[error("Record {row}: note already exists at '{path}'")]
    NoteExists { row: usize, path: String },

    /// The note file could not be written (permissions, disk full).
    #[error("Record {row}: failed to write '{path}': {detail}")]
    WriteFailed {
        row: usize,
        path: String,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_records_failed_display() {
        let e = ImportError::AllRecordsFailed {
            total: 4,
            first_error: "disk full".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("All 4 records"), "got: {msg}");
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn missing_title_display() {
        let e = RecordError::MissingTitle { row: 7 };
        assert!(e.to_string().contains("Record 7"));
        assert!(e.to_string().contains("Article"));
    }

    #[test]
    fn write_failed_roundtrips_through_json() {
        let e = RecordError::WriteFailed {
            row: 2,
            path: "/vault/Articles/x.md".into(),
            detail: "permission denied".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: RecordError = serde_json::from_str(&json).unwrap();
        assert!(back.to_string().contains("permission denied"));
    }
}
