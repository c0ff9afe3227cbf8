//! The Note Writer: per-record orchestration and the batch entry points.
//!
//! ## Failure containment
//!
//! Each record runs the whole pipeline to completion — success or recorded
//! failure — before the next begins, and nothing a single record does can
//! abort the batch. The containment is layered:
//!
//! * a missing title or failed file write marks the record Skipped and is
//!   stored in its [`NoteResult`];
//! * a missing source file or thumbnail failure only costs that note its
//!   thumbnail/link sections (logged, note still written);
//! * only batch-level problems (dataset unreadable, output directory
//!   uncreatable) surface as [`ImportError`].

use crate::config::{CollisionPolicy, ImportConfig};
use crate::dataset;
use crate::error::{ImportError, RecordError};
use crate::output::{ImportOutput, ImportStats, NoteResult};
use crate::pipeline::{compose, filename, template, thumbnail};
use crate::record::Record;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Maximum filename length in bytes, shared with the sanitiser's contract.
const MAX_FILENAME_BYTES: usize = 255;

/// Process one record through the full pipeline and write its note.
///
/// Never returns an error: every outcome, including failure, is a
/// [`NoteResult`]. See the module docs for the containment rules.
pub fn write_note(record: &Record, config: &ImportConfig) -> NoteResult {
    let skipped = |title: &str, error: RecordError| NoteResult {
        row: record.row,
        title: title.to_string(),
        path: None,
        thumbnail_created: false,
        error: Some(error),
    };

    // Step 1: required field.
    let Some(article) = record.article.as_deref() else {
        warn!("Record {}: no Article value, skipping", record.row);
        return skipped("(untitled)", RecordError::MissingTitle { row: record.row });
    };
    debug!("Record {}: creating note for '{}'", record.row, article);

    // Step 2: output path + collision policy.
    let note_path = config.articles_dir().join(filename::note_filename(article));
    let note_path = match resolve_collision(note_path, config.collision) {
        Ok(p) => p,
        Err(existing) => {
            info!(
                "Record {}: note exists at '{}', skipping per policy",
                record.row,
                existing.display()
            );
            return skipped(
                article,
                RecordError::NoteExists {
                    row: record.row,
                    path: existing.display().to_string(),
                },
            );
        }
    };

    // Step 3: optional source file → local link + thumbnail.
    let mut thumbnail_embed = String::new();
    let mut local_file_link = String::new();
    let mut thumbnail_created = false;

    if let Some(source) = resolve_source_file(record, config) {
        let base = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        local_file_link = format!("- [[{}|Local File]]", config.image_vault_path(&base));

        match thumbnail::make_thumbnail(&source, &config.thumbnails_dir(), config.thumbnail_max) {
            Ok(thumb_name) => {
                thumbnail_embed = format!("![[{}]]", config.thumbnail_vault_path(&thumb_name));
                thumbnail_created = true;
            }
            Err(e) => warn!("Record {}: thumbnail failed: {e}", record.row),
        }
    } else {
        warn!(
            "Record {}: no local source file for '{}'",
            record.row, article
        );
    }

    if record.date.is_some() && record.year().is_none() {
        warn!(
            "Record {}: unparseable date {:?}, year tag omitted",
            record.row, record.date
        );
    }

    // Step 4: compose derived blocks and render. Computed bindings are
    // inserted last so they win over any same-named raw field.
    let mut bindings = record.bindings();
    bindings.insert("people".into(), compose::people_block(record));
    bindings.insert("locations".into(), compose::locations_block(record));
    bindings.insert("tags".into(), compose::tag_line(record));
    bindings.insert("thumbnail".into(), thumbnail_embed);
    bindings.insert("local_file".into(), local_file_link);
    bindings.insert(
        "last_imported".into(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    );

    let content = template::render(template::NOTE_TEMPLATE, &bindings);

    // Step 5: write the note, creating parent directories as needed.
    if let Err(e) = write_file(&note_path, &content) {
        warn!(
            "Record {}: failed to write '{}': {e}",
            record.row,
            note_path.display()
        );
        return skipped(
            article,
            RecordError::WriteFailed {
                row: record.row,
                path: note_path.display().to_string(),
                detail: e.to_string(),
            },
        );
    }

    info!("Record {}: wrote '{}'", record.row, note_path.display());
    NoteResult {
        row: record.row,
        title: article.to_string(),
        path: Some(note_path),
        thumbnail_created,
        error: None,
    }
}

/// Import a sequence of records, sequentially, collecting per-record results
/// and aggregate statistics.
///
/// Returns `Ok` even when some records failed (check
/// `output.stats.failed_records`); returns
/// [`ImportError::AllRecordsFailed`] only when a non-empty batch produced no
/// notes at all.
pub fn import_records(
    records: &[Record],
    config: &ImportConfig,
) -> Result<ImportOutput, ImportError> {
    let start = Instant::now();
    let total = records.len();
    info!("Importing {total} records into {}", config.vault_dir.display());

    if let Some(ref cb) = config.progress_callback {
        cb.on_import_start(total);
    }

    let mut notes = Vec::with_capacity(total);
    for (i, record) in records.iter().enumerate() {
        let index = i + 1;
        let title = record.article.as_deref().unwrap_or("(untitled)");
        if let Some(ref cb) = config.progress_callback {
            cb.on_record_start(index, total, title);
        }

        let result = write_note(record, config);

        if let Some(ref cb) = config.progress_callback {
            match &result.error {
                None => cb.on_record_written(index, total, title, result.thumbnail_created),
                Some(e) => cb.on_record_error(index, total, title, &e.to_string()),
            }
        }
        notes.push(result);
    }

    let notes_created = notes.iter().filter(|n| n.is_written()).count();
    let failed_records = total - notes_created;
    let thumbnails_created = notes.iter().filter(|n| n.thumbnail_created).count();

    if total > 0 && notes_created == 0 {
        let first_error = notes
            .iter()
            .find_map(|n| n.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(ImportError::AllRecordsFailed { total, first_error });
    }

    let stats = ImportStats {
        records_processed: total,
        notes_created,
        thumbnails_created,
        failed_records,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Import complete: {}/{} notes, {} thumbnails, {}ms",
        stats.notes_created, total, stats.thumbnails_created, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_import_complete(total, notes_created);
    }

    Ok(ImportOutput { notes, stats })
}

/// Load a CSV dataset, apply the source-code filter, and import everything.
///
/// This is the one-call entry point the CLI uses.
pub fn import_dataset(
    dataset_path: impl AsRef<Path>,
    source_codes: &[String],
    config: &ImportConfig,
) -> Result<ImportOutput, ImportError> {
    let records = dataset::load_records(dataset_path.as_ref())?;
    let records = dataset::filter_records(records, source_codes);

    let articles_dir = config.articles_dir();
    std::fs::create_dir_all(&articles_dir).map_err(|e| ImportError::DirectoryCreateFailed {
        path: articles_dir,
        source: e,
    })?;

    import_records(&records, config)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Apply the collision policy to a candidate note path.
///
/// `Err` carries the existing path when the policy says skip.
fn resolve_collision(path: PathBuf, policy: CollisionPolicy) -> Result<PathBuf, PathBuf> {
    if !path.exists() {
        return Ok(path);
    }
    match policy {
        CollisionPolicy::Overwrite => Ok(path),
        CollisionPolicy::Skip => Err(path),
        CollisionPolicy::Suffix => Ok(disambiguate(&path)),
    }
}

/// Find the first free ` (n)`-suffixed variant of `path`, keeping the whole
/// filename within the 255-byte bound.
fn disambiguate(path: &Path) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    for n in 2u32.. {
        let suffix = format!(" ({n})");
        let max_stem = MAX_FILENAME_BYTES - ".md".len() - suffix.len();
        let mut base = stem.clone();
        while base.len() > max_stem {
            base.pop();
        }
        let candidate = dir.join(format!("{}{suffix}.md", base.trim_end()));
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("u32 suffix space exhausted");
}

/// Resolve the record's source file against the images directory.
///
/// Only the base name of `Full_Filename` is used; spreadsheets carry stale
/// absolute paths from the machine they were edited on. Returns `None` when
/// the field is absent or the file does not exist — in both cases the note
/// is written without thumbnail or local-file sections.
fn resolve_source_file(record: &Record, config: &ImportConfig) -> Option<PathBuf> {
    let raw = record.full_filename.as_deref()?;
    let base = Path::new(raw).file_name()?;
    let candidate = config.images_dir().join(base);
    if candidate.exists() {
        Some(candidate)
    } else {
        debug!(
            "Record {}: source file '{}' not found",
            record.row,
            candidate.display()
        );
        None
    }
}

/// Write `content` to `path` as UTF-8, creating parent directories.
///
/// The file handle closes on every exit path; a failed write leaves at worst
/// a partial file that the next run overwrites.
fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(vault: &Path) -> ImportConfig {
        ImportConfig::builder(vault).build().unwrap()
    }

    fn record(title: &str) -> Record {
        Record {
            row: 1,
            article: Some(title.into()),
            ..Record::default()
        }
    }

    #[test]
    fn titleless_record_is_skipped_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let result = write_note(&Record { row: 3, ..Record::default() }, &test_config(tmp.path()));
        assert!(!result.is_written());
        assert!(matches!(result.error, Some(RecordError::MissingTitle { row: 3 })));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0, "nothing written");
    }

    #[test]
    fn overwrite_policy_replaces_existing_note() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());

        let first = write_note(&record("Fire at Mill"), &config);
        let second = write_note(&record("Fire at Mill"), &config);
        assert_eq!(first.path, second.path);
        assert!(second.is_written());
    }

    #[test]
    fn suffix_policy_keeps_both_notes() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ImportConfig::builder(tmp.path())
            .collision(CollisionPolicy::Suffix)
            .build()
            .unwrap();

        let first = write_note(&record("Fire at Mill"), &config);
        let second = write_note(&record("Fire at Mill"), &config);
        let third = write_note(&record("Fire at Mill"), &config);

        assert!(first.path.as_ref().unwrap().ends_with("Fire at Mill.md"));
        assert!(second.path.as_ref().unwrap().ends_with("Fire at Mill (2).md"));
        assert!(third.path.as_ref().unwrap().ends_with("Fire at Mill (3).md"));
    }

    #[test]
    fn skip_policy_reports_existing_note() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ImportConfig::builder(tmp.path())
            .collision(CollisionPolicy::Skip)
            .build()
            .unwrap();

        assert!(write_note(&record("Fire at Mill"), &config).is_written());
        let second = write_note(&record("Fire at Mill"), &config);
        assert!(matches!(second.error, Some(RecordError::NoteExists { .. })));
    }

    #[test]
    fn missing_source_file_never_reaches_the_thumbnailer() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let mut r = record("Fire at Mill");
        r.full_filename = Some("G:/old/machine/scan12.png".into());

        let result = write_note(&r, &config);
        assert!(result.is_written());
        assert!(!result.thumbnail_created);
        assert!(
            !config.thumbnails_dir().exists(),
            "no thumbnail directory should be created"
        );

        let content = std::fs::read_to_string(result.path.unwrap()).unwrap();
        assert!(!content.contains("![["), "no thumbnail embed expected");
        assert!(!content.contains("|Local File]]"));
    }

    #[test]
    fn empty_batch_yields_empty_output() {
        let tmp = tempfile::tempdir().unwrap();
        let out = import_records(&[], &test_config(tmp.path())).unwrap();
        assert_eq!(out.stats.records_processed, 0);
        assert_eq!(out.stats.notes_created, 0);
    }

    #[test]
    fn all_failed_batch_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let titleless = Record { row: 1, ..Record::default() };
        let err = import_records(&[titleless], &test_config(tmp.path())).unwrap_err();
        assert!(matches!(err, ImportError::AllRecordsFailed { total: 1, .. }));
    }

    #[test]
    fn mixed_batch_continues_past_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![
            record("Fire at Mill"),
            Record { row: 2, ..Record::default() },
            record("Ship Launch"),
        ];
        let out = import_records(&records, &test_config(tmp.path())).unwrap();
        assert_eq!(out.stats.records_processed, 3);
        assert_eq!(out.stats.notes_created, 2);
        assert_eq!(out.stats.failed_records, 1);
        assert!(out.notes[1].error.is_some());
        assert!(out.notes[2].is_written());
    }
}
