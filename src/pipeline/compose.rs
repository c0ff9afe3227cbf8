//! Derived note sections: people/location bullet blocks and the tag line.
//!
//! Every function here is a pure `&Record → String` transform with no clock,
//! randomness, or I/O: the same record always composes byte-identical
//! output. That determinism is what makes reruns idempotent — an unchanged
//! row rewrites an unchanged note.

use crate::record::Record;

/// One bullet line per non-null person name, in index order.
///
/// Empty string (not placeholder text) when both names are absent.
pub fn people_block(record: &Record) -> String {
    bullet_list(record.names())
}

/// One bullet line per non-null place, in index order.
pub fn locations_block(record: &Record) -> String {
    bullet_list(record.places())
}

fn bullet_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(|v| format!("- {v}")).collect::<Vec<_>>().join("\n")
}

/// The space-joined hashtag line, built in fixed order: source code, themes
/// (primary first), persons, places, then the year tag when the date parses.
///
/// Each tag value has internal whitespace replaced with hyphens so the token
/// survives as a single tag. Records with no taggable fields yield "".
pub fn tag_line(record: &Record) -> String {
    let mut tags = Vec::new();

    if let Some(src) = record.source_code.as_deref() {
        tags.push(tag("Source", src));
    }
    for theme in record.themes() {
        tags.push(tag("Theme", theme));
    }
    for name in record.names() {
        tags.push(tag("Person", name));
    }
    for place in record.places() {
        tags.push(tag("Place", place));
    }
    if let Some(year) = record.year() {
        tags.push(format!("#Year-{year}"));
    }

    tags.join(" ")
}

/// `#<Category>-<value>` with whitespace runs in the value hyphenated.
fn tag(category: &str, value: &str) -> String {
    let hyphenated = value.split_whitespace().collect::<Vec<_>>().join("-");
    format!("#{category}-{hyphenated}")
}
