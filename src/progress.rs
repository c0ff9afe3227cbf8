//! Progress-callback trait for per-record import events.
//!
//! Inject an [`Arc<dyn ImportProgressCallback>`] via
//! [`crate::config::ImportConfigBuilder::progress_callback`] to receive
//! events as the batch processes each record.
//!
//! # Why callbacks instead of a global logger?
//!
//! The callback is the least-invasive integration point: callers can forward
//! events to a terminal progress bar, a GUI, or a counter — without the
//! library owning any process-wide mutable reporting state. Diagnostic detail
//! still goes through `tracing`; the callback carries only the user-facing
//! record lifecycle.

use std::sync::Arc;

/// Called by the import loop as it processes each record.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Processing is sequential, but the trait stays
/// `Send + Sync` so one callback can be shared with other threads (e.g. a
/// progress bar's drawing thread).
pub trait ImportProgressCallback: Send + Sync {
    /// Called once before any record is processed.
    fn on_import_start(&self, total_records: usize) {
        let _ = total_records;
    }

    /// Called just before a record enters the pipeline.
    ///
    /// `index` is 1-based position within this run, not the dataset row.
    fn on_record_start(&self, index: usize, total: usize, title: &str) {
        let _ = (index, total, title);
    }

    /// Called when a record's note has been written.
    fn on_record_written(&self, index: usize, total: usize, title: &str, thumbnail_created: bool) {
        let _ = (index, total, title, thumbnail_created);
    }

    /// Called when a record is skipped.
    fn on_record_error(&self, index: usize, total: usize, title: &str, error: &str) {
        let _ = (index, total, title, error);
    }

    /// Called once after every record has been attempted.
    fn on_import_complete(&self, total_records: usize, notes_created: usize) {
        let _ = (total_records, notes_created);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ImportProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ImportConfig`].
pub type ProgressCallback = Arc<dyn ImportProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        written: AtomicUsize,
        errors: AtomicUsize,
        final_created: AtomicUsize,
    }

    impl ImportProgressCallback for TrackingCallback {
        fn on_record_start(&self, _index: usize, _total: usize, _title: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_record_written(&self, _i: usize, _t: usize, _title: &str, _thumb: bool) {
            self.written.fetch_add(1, Ordering::SeqCst);
        }

        fn on_record_error(&self, _i: usize, _t: usize, _title: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_import_complete(&self, _total: usize, notes_created: usize) {
            self.final_created.store(notes_created, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_import_start(3);
        cb.on_record_start(1, 3, "Fire at Mill");
        cb.on_record_written(1, 3, "Fire at Mill", true);
        cb.on_record_error(2, 3, "(untitled)", "missing title");
        cb.on_import_complete(3, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let cb = TrackingCallback {
            starts: AtomicUsize::new(0),
            written: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            final_created: AtomicUsize::new(0),
        };
        cb.on_import_start(2);
        cb.on_record_start(1, 2, "a");
        cb.on_record_written(1, 2, "a", false);
        cb.on_record_start(2, 2, "b");
        cb.on_record_error(2, 2, "b", "write failed");
        cb.on_import_complete(2, 1);

        assert_eq!(cb.starts.load(Ordering::SeqCst), 2);
        assert_eq!(cb.written.load(Ordering::SeqCst), 1);
        assert_eq!(cb.errors.load(Ordering::SeqCst), 1);
        assert_eq!(cb.final_created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_import_start(10);
        cb.on_record_written(1, 10, "x", true);
    }
}
