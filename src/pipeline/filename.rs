//! Filename sanitisation: arbitrary titles → filesystem-safe note names.
//!
//! Titles come straight out of a spreadsheet and contain whatever the
//! transcriber typed: quotes, slashes, runs of spaces, the odd tab. The stem
//! must survive Windows, macOS, and Linux filesystems, so the illegal set is
//! the union of all three, and the final name is capped at 255 bytes (the
//! common per-component limit).

/// Characters rejected by at least one mainstream filesystem.
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Stem substituted when sanitisation leaves nothing usable.
const FALLBACK_STEM: &str = "untitled";

/// Maximum filename length in bytes, including the `.md` extension.
const MAX_FILENAME_BYTES: usize = 255;

/// Map a human-readable title to a filesystem-safe filename stem.
///
/// Strips the illegal character set, collapses whitespace runs to a single
/// space, and trims. Empty or dot-leading results become
/// [`untitled`](FALLBACK_STEM) so no note can hide as a dotfile.
///
/// Pure and idempotent: `sanitize_stem(sanitize_stem(x)) == sanitize_stem(x)`.
pub fn sanitize_stem(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect();

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() || collapsed.starts_with('.') {
        FALLBACK_STEM.to_string()
    } else {
        collapsed
    }
}

/// Compute the full note filename (`<stem>.md`) for a title, capped at
/// 255 bytes by truncating the stem at a char boundary — never the extension.
pub fn note_filename(title: &str) -> String {
    let mut stem = sanitize_stem(title);
    let max_stem = MAX_FILENAME_BYTES - ".md".len();

    while stem.len() > max_stem {
        stem.pop();
    }
    // Truncation can expose trailing whitespace or strip the stem entirely.
    let stem = stem.trim_end();
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };

    format!("{stem}.md")
}
