//! CLI binary for clip2md.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ImportConfig`, drives the import, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use clip2md::{
    import_dataset, CollisionPolicy, ImportConfig, ImportProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Truncate to at most `max_chars` characters, cutting on a character
/// boundary and appending an ellipsis when anything was dropped.
///
/// Error messages embed article titles and paths, which are frequently
/// non-ASCII; byte-indexed slicing would panic mid-character.
fn truncate_message(msg: &str, max_chars: usize) -> String {
    match msg.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}\u{2026}", &msg[..cut]),
        None => msg.to_string(),
    }
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per record.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_import_start
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} records  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Importing");
        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl ImportProgressCallback for CliProgressCallback {
    fn on_import_start(&self, total_records: usize) {
        self.bar.set_length(total_records as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Importing {total_records} records…"))
        ));
    }

    fn on_record_start(&self, _index: usize, _total: usize, title: &str) {
        self.bar.set_message(title.to_string());
    }

    fn on_record_written(&self, index: usize, total: usize, title: &str, thumbnail_created: bool) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            title,
            if thumbnail_created {
                dim("(thumbnail)")
            } else {
                String::new()
            },
        ));
        self.bar.inc(1);
    }

    fn on_record_error(&self, index: usize, total: usize, title: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = truncate_message(error, 79);

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            title,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_import_complete(&self, total_records: usize, notes_created: usize) {
        let failed = total_records.saturating_sub(notes_created);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} notes written",
                green("✔"),
                bold(&notes_created.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} notes written  ({} failed)",
                if notes_created == 0 { red("✘") } else { cyan("⚠") },
                bold(&notes_created.to_string()),
                total_records,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Import every row into a vault
  clip2md clippings.csv --vault ~/Vault/Newspapers

  # Only the newspaper sources, disambiguating filename collisions
  clip2md clippings.csv --vault ~/Vault/Newspapers --sources NC,BN,WN --collision suffix

  # Structured results for scripting
  clip2md clippings.csv --vault /tmp/vault --json > results.json

VAULT LAYOUT:
  <vault>/Articles/      generated notes (one per accepted row)
  <vault>/Images/        your scanned sources (read, never written)
  <vault>/thumbnails/    generated JPEG thumbnails (thumb_<name>.jpg)

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Directory containing a pdfium shared library, used to
                    rasterise PDF sources. Without it PDF thumbnails are
                    skipped (with a warning); everything else still works.

EXIT STATUS:
  0  every accepted record produced a note
  1  at least one record failed (details in the log / --json output)
"#;

/// Convert spreadsheet clipping records into linked Markdown vault notes.
#[derive(Parser, Debug)]
#[command(
    name = "clip2md",
    version,
    about = "Convert spreadsheet clipping records into linked Markdown vault notes",
    long_about = "Convert rows of a clippings spreadsheet (CSV) into Markdown notes with \
YAML front-matter, derived People/Locations sections, tag lines, and thumbnails of the \
scanned source images or PDFs.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// CSV dataset of clipping records.
    input: PathBuf,

    /// Vault root directory receiving notes and thumbnails.
    #[arg(short = 'o', long, env = "CLIP2MD_VAULT")]
    vault: PathBuf,

    /// Comma-separated source codes to import (e.g. NC,BN,WN). Default: all rows.
    #[arg(long, env = "CLIP2MD_SOURCES", value_delimiter = ',')]
    sources: Vec<String>,

    /// Subdirectory for generated notes.
    #[arg(long, default_value = "Articles")]
    articles_subdir: String,

    /// Subdirectory holding the scanned source files.
    #[arg(long, default_value = "Images")]
    images_subdir: String,

    /// Subdirectory for generated thumbnails.
    #[arg(long, default_value = "thumbnails")]
    thumbnails_subdir: String,

    /// Maximum thumbnail edge length in pixels.
    #[arg(long, env = "CLIP2MD_THUMB_SIZE", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(16..=2000))]
    thumb_size: u32,

    /// Filename collision policy.
    #[arg(long, env = "CLIP2MD_COLLISION", value_enum, default_value = "overwrite")]
    collision: CollisionArg,

    /// Output structured JSON results instead of the summary.
    #[arg(long, env = "CLIP2MD_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "CLIP2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CLIP2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CLIP2MD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum CollisionArg {
    Overwrite,
    Suffix,
    Skip,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(v: CollisionArg) -> Self {
        match v {
            CollisionArg::Overwrite => CollisionPolicy::Overwrite,
            CollisionArg::Suffix => CollisionPolicy::Suffix,
            CollisionArg::Skip => CollisionPolicy::Skip,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar provides the per-record feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ImportProgressCallback>)
    } else {
        None
    };

    let mut builder = ImportConfig::builder(&cli.vault)
        .articles_subdir(&cli.articles_subdir)
        .images_subdir(&cli.images_subdir)
        .thumbnails_subdir(&cli.thumbnails_subdir)
        .thumbnail_max(cli.thumb_size, cli.thumb_size)
        .collision(cli.collision.clone().into());
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run import ───────────────────────────────────────────────────────
    let output = import_dataset(&cli.input, &cli.sources, &config).context("Import failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet && !show_progress {
        // The progress callback already printed the summary when active.
        eprintln!(
            "Processed {} records: {} notes, {} thumbnails, {} failed ({}ms)",
            output.stats.records_processed,
            output.stats.notes_created,
            output.stats.thumbnails_created,
            output.stats.failed_records,
            output.stats.total_duration_ms,
        );
    }

    if output.stats.failed_records > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::truncate_message;

    #[test]
    fn short_messages_pass_through_untouched() {
        assert_eq!(truncate_message("fine", 79), "fine");
        assert_eq!(truncate_message("", 79), "");
    }

    #[test]
    fn long_messages_are_cut_with_ellipsis() {
        let long = "x".repeat(200);
        let cut = truncate_message(&long, 79);
        assert_eq!(cut.chars().count(), 80);
        assert!(cut.ends_with('\u{2026}'));
    }

    #[test]
    fn truncation_never_splits_a_multibyte_character() {
        // Titles and paths in the data are frequently non-ASCII (Welsh
        // diacritics, stray currency signs); a byte-indexed cut would panic.
        let long = "€".repeat(100);
        let cut = truncate_message(&long, 79);
        assert_eq!(cut.chars().count(), 80);
        assert!(cut.starts_with('€') && cut.ends_with('\u{2026}'));

        let exact = "ŵ".repeat(79);
        assert_eq!(truncate_message(&exact, 79), exact, "boundary case: no cut");
    }
}
