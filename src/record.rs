//! The explicit record schema for one spreadsheet row.
//!
//! Upstream spreadsheets address fields by column header (`Article`, `Src`,
//! `Theme_2`, …). Deserialising them into a typed [`Record`] once, at load
//! time, means the pipeline never does stringly-keyed lookups: optional
//! columns are `Option<String>`, and an absent column is indistinguishable
//! from an empty cell — both become `None`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One spreadsheet row: a newspaper/census clipping with optional metadata
/// and an optional pointer to a scanned source file.
///
/// Every field except `article` may be absent. A record without `article`
/// is invalid and is rejected before reaching the pipeline (see
/// [`crate::dataset::filter_records`]); the Note Writer re-checks as a
/// defence against callers constructing records by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// Row number in the source dataset (1-indexed, for diagnostics).
    /// Not a spreadsheet column; assigned by the loader.
    #[serde(skip)]
    pub row: usize,

    /// Article title. Required; used for the note body and the filename.
    #[serde(rename = "Article", default, deserialize_with = "empty_as_none")]
    pub article: Option<String>,

    /// Expected `YYYY-MM-DD`. Malformed values never abort processing; the
    /// year tag is simply omitted.
    #[serde(rename = "Date", default, deserialize_with = "empty_as_none")]
    pub date: Option<String>,

    /// Short categorical source identifier (e.g. `NC`, `BN`, `WN`).
    #[serde(rename = "Src", default, deserialize_with = "empty_as_none")]
    pub source_code: Option<String>,

    /// Opaque passthrough format tag.
    #[serde(rename = "Fmt", default, deserialize_with = "empty_as_none")]
    pub format: Option<String>,

    /// Opaque passthrough transcription flag.
    #[serde(rename = "Transcribed", default, deserialize_with = "empty_as_none")]
    pub transcribed: Option<String>,

    /// Opaque passthrough publication date string.
    #[serde(rename = "Published", default, deserialize_with = "empty_as_none")]
    pub published: Option<String>,

    /// Human-readable source name for the Source Information section.
    #[serde(
        rename = "Newspaper_or_Source",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub newspaper: Option<String>,

    /// Primary theme. The original spreadsheet calls this column `T`.
    #[serde(rename = "T", default, deserialize_with = "empty_as_none")]
    pub theme1: Option<String>,

    #[serde(rename = "Theme_2", default, deserialize_with = "empty_as_none")]
    pub theme2: Option<String>,

    #[serde(rename = "Theme_3", default, deserialize_with = "empty_as_none")]
    pub theme3: Option<String>,

    #[serde(rename = "Theme_4", default, deserialize_with = "empty_as_none")]
    pub theme4: Option<String>,

    #[serde(rename = "Theme_5", default, deserialize_with = "empty_as_none")]
    pub theme5: Option<String>,

    #[serde(rename = "Name_1", default, deserialize_with = "empty_as_none")]
    pub name1: Option<String>,

    #[serde(rename = "Name_2", default, deserialize_with = "empty_as_none")]
    pub name2: Option<String>,

    #[serde(rename = "Place_1", default, deserialize_with = "empty_as_none")]
    pub place1: Option<String>,

    #[serde(rename = "Place_2", default, deserialize_with = "empty_as_none")]
    pub place2: Option<String>,

    /// Relative path to the scanned source image/PDF. Only the base name is
    /// meaningful; the loader and writer both normalise it.
    #[serde(rename = "Full_Filename", default, deserialize_with = "empty_as_none")]
    pub full_filename: Option<String>,

    /// Optional URL to an online copy.
    #[serde(rename = "Web", default, deserialize_with = "empty_as_none")]
    pub web: Option<String>,
}

impl Record {
    /// All non-null themes in index order, primary first.
    pub fn themes(&self) -> impl Iterator<Item = &str> {
        [&self.theme1, &self.theme2, &self.theme3, &self.theme4, &self.theme5]
            .into_iter()
            .filter_map(|t| t.as_deref())
    }

    /// All non-null person names in index order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [&self.name1, &self.name2].into_iter().filter_map(|n| n.as_deref())
    }

    /// All non-null places in index order.
    pub fn places(&self) -> impl Iterator<Item = &str> {
        [&self.place1, &self.place2].into_iter().filter_map(|p| p.as_deref())
    }

    /// The year of `date`, if the field parses as a real calendar date in
    /// year-month-day order. Unpadded components are accepted (`"1887-3-2"`
    /// yields `Some(1887)`); other orderings, impossible dates, and free
    /// text all yield `None` — the note is still written, only the year tag
    /// is dropped.
    pub fn year(&self) -> Option<i32> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    /// Raw field bindings for the template, keyed by placeholder name.
    ///
    /// Absent fields bind the empty string so every placeholder resolves.
    /// Computed bindings (derived blocks, timestamp) are layered on top by
    /// the Note Writer and win over anything inserted here.
    pub fn bindings(&self) -> BTreeMap<String, String> {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        let mut b = BTreeMap::new();
        b.insert("article".into(), field(&self.article));
        b.insert("date".into(), field(&self.date));
        b.insert("source".into(), field(&self.source_code));
        b.insert("format".into(), field(&self.format));
        b.insert("transcribed".into(), field(&self.transcribed));
        b.insert("published".into(), field(&self.published));
        b.insert("newspaper".into(), field(&self.newspaper));
        b.insert("web".into(), field(&self.web));
        b.insert("theme1".into(), field(&self.theme1));
        b.insert("theme2".into(), field(&self.theme2));
        b.insert("theme3".into(), field(&self.theme3));
        b.insert("theme4".into(), field(&self.theme4));
        b.insert("theme5".into(), field(&self.theme5));
        b.insert("name1".into(), field(&self.name1));
        b.insert("name2".into(), field(&self.name2));
        b.insert("place1".into(), field(&self.place1));
        b.insert("place2".into(), field(&self.place2));
        b
    }
}

/// Treat empty and whitespace-only cells as absent.
///
/// CSV cannot distinguish `,,` from `, ,`; spreadsheets routinely contain
/// both for "no value".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_date(date: &str) -> Record {
        Record {
            article: Some("Fire at Mill".into()),
            date: Some(date.into()),
            ..Record::default()
        }
    }

    #[test]
    fn year_from_well_formed_date() {
        assert_eq!(record_with_date("1887-03-02").year(), Some(1887));
    }

    #[test]
    fn year_accepts_unpadded_date_components() {
        // Hand-typed spreadsheet cells often drop leading zeros; the date is
        // still unambiguous, so the year tag is kept.
        assert_eq!(record_with_date("1887-3-2").year(), Some(1887));
    }

    #[test]
    fn year_absent_for_malformed_date() {
        assert_eq!(record_with_date("March 1887").year(), None);
        assert_eq!(record_with_date("03/02/1887").year(), None);
        assert_eq!(record_with_date("1887-13-40").year(), None);
        assert_eq!(Record::default().year(), None);
    }

    #[test]
    fn iterators_skip_nulls_preserving_index_order() {
        let r = Record {
            theme1: Some("Fires".into()),
            theme3: Some("Mills".into()),
            name2: Some("John Jones".into()),
            place1: Some("Llanychan".into()),
            ..Record::default()
        };
        assert_eq!(r.themes().collect::<Vec<_>>(), vec!["Fires", "Mills"]);
        assert_eq!(r.names().collect::<Vec<_>>(), vec!["John Jones"]);
        assert_eq!(r.places().collect::<Vec<_>>(), vec!["Llanychan"]);
    }

    #[test]
    fn bindings_blank_absent_fields() {
        let r = record_with_date("1901-05-10");
        let b = r.bindings();
        assert_eq!(b["article"], "Fire at Mill");
        assert_eq!(b["date"], "1901-05-10");
        assert_eq!(b["name1"], "");
        assert_eq!(b["web"], "");
    }

    #[test]
    fn csv_row_deserialises_with_empty_cells_as_none() {
        let data = "\
Article,Date,Src,T,Theme_2,Name_1,Name_2,Place_1,Full_Filename
Fire at Mill,1901-05-10,NC, ,Mills,John Jones,,Llanychan,scan 12.pdf
";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let record: Record = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(record.article.as_deref(), Some("Fire at Mill"));
        assert_eq!(record.source_code.as_deref(), Some("NC"));
        assert_eq!(record.theme1, None, "whitespace-only cell is absent");
        assert_eq!(record.theme2.as_deref(), Some("Mills"));
        assert_eq!(record.name2, None);
        assert_eq!(record.full_filename.as_deref(), Some("scan 12.pdf"));
        assert_eq!(record.web, None, "missing column is absent");
    }
}
