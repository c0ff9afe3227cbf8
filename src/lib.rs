//! # clip2md
//!
//! Convert rows of a clippings spreadsheet (newspaper/census articles with
//! scanned source images) into linked Markdown notes plus derived JPEG
//! thumbnails, ready for import into a personal knowledge-base vault.
//!
//! ## Why this crate?
//!
//! Hand-maintained research spreadsheets hold rich, semi-structured data —
//! titles, dates, people, places, themes, pointers to scans — that a vault
//! cannot search or link. This crate turns each row into one note with YAML
//! front-matter, derived People/Locations sections, a fixed-order tag line,
//! a thumbnail of the scanned source (raster image or PDF first page), and
//! wiki-links back to the original file. It is a batch, single-pass,
//! best-effort transform: missing fields, malformed dates, absent scans, and
//! broken images cost a record at most a section, never the batch.
//!
//! ## Pipeline Overview
//!
//! ```text
//! CSV row
//!  │
//!  ├─ 1. Load      deserialise + filter rows (dataset)
//!  ├─ 2. Filename  sanitise title → collision-checked note path
//!  ├─ 3. Thumbnail rasterise/decode source → JPEG ≤ 300×300
//!  ├─ 4. Compose   people/location blocks + tag line
//!  ├─ 5. Render    single-pass {{placeholder}} substitution
//!  └─ 6. Write     UTF-8 note file + per-record result
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clip2md::{import_dataset, ImportConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ImportConfig::builder("/vault/Newspapers").build()?;
//!     let sources = vec!["NC".to_string(), "BN".to_string(), "WN".to_string()];
//!     let output = import_dataset("clippings.csv", &sources, &config)?;
//!     println!(
//!         "{} notes, {} thumbnails, {} failed",
//!         output.stats.notes_created,
//!         output.stats.thumbnails_created,
//!         output.stats.failed_records
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `clip2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! clip2md = { version = "0.3", default-features = false }
//! ```
//!
//! ## PDF thumbnails
//!
//! PDF sources need a pdfium shared library at runtime, found via
//! `PDFIUM_LIB_PATH`, the working directory, or the system library path.
//! When none is available PDF thumbnails are skipped with a warning; raster
//! sources and all note generation work regardless.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod dataset;
pub mod error;
pub mod import;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod record;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CollisionPolicy, ImportConfig, ImportConfigBuilder};
pub use error::{ImportError, RecordError};
pub use import::{import_dataset, import_records, write_note};
pub use output::{ImportOutput, ImportStats, NoteResult};
pub use progress::{ImportProgressCallback, NoopProgressCallback, ProgressCallback};
pub use record::Record;
