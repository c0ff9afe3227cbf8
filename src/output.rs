//! Output types: per-record results and aggregate statistics.

use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The outcome of processing one record.
///
/// A record either ends **Written** (`path` is `Some`, `error` is `None`) or
/// **Skipped** (`error` explains why). A written note may still lack a
/// thumbnail — missing source files and decode failures are tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteResult {
    /// Row number in the source dataset (1-indexed).
    pub row: usize,

    /// Article title, or a placeholder for title-less records.
    pub title: String,

    /// Where the note was written, when it was.
    pub path: Option<PathBuf>,

    /// Whether a thumbnail was generated for this record.
    pub thumbnail_created: bool,

    /// Why the record was skipped, when it was.
    pub error: Option<RecordError>,
}

impl NoteResult {
    /// True when the note file was written.
    pub fn is_written(&self) -> bool {
        self.error.is_none() && self.path.is_some()
    }
}

/// Aggregate counters for one import run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    /// Records fed into the Note Writer.
    pub records_processed: usize,
    /// Notes successfully written.
    pub notes_created: usize,
    /// Thumbnails successfully generated.
    pub thumbnails_created: usize,
    /// Records that ended Skipped.
    pub failed_records: usize,
    /// Wall-clock duration of the whole run.
    pub total_duration_ms: u64,
}

/// Everything produced by a completed import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutput {
    /// Per-record outcomes, in input order.
    pub notes: Vec<NoteResult>,
    /// Aggregate counters.
    pub stats: ImportStats,
}
