//! Collaborators the exporter depends on but does not own.
//!
//! The mapping engine reaches three outside services through narrow traits:
//!
//! - [`NoteTextExtractor`] turns a note's payload into plain text;
//! - [`EnumerationLabels`] resolves enumeration values to display labels;
//! - [`ControlfieldAssembler`] builds the 008 fixed-length data elements.
//!
//! Each trait has a default implementation that is good enough for most
//! archival exports. Applications with their own localization or note
//! rendering plug in their own.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::archival::{ArchivalObject, Note};
use crate::error::Result;

/// Extracts the text of a note.
pub trait NoteTextExtractor: Send + Sync {
    /// Text of `note`; empty when there is nothing to show.
    ///
    /// Unpublished content is only included when `include_unpublished` is set.
    /// With `rich_text` unset, inline markup is removed.
    fn extract_note_text(&self, note: &Note, include_unpublished: bool, rich_text: bool)
        -> String;
}

/// Resolves enumeration values to display labels.
pub trait EnumerationLabels: Send + Sync {
    /// Label for `value` in `enumeration`; `value` itself when no label is known.
    fn label(&self, enumeration: &str, value: &str) -> String;
}

/// Assembles the 008 control field for an archival object.
pub trait ControlfieldAssembler: Send + Sync {
    /// The 008 field value.
    fn assemble(&self, object: &ArchivalObject) -> String;
}

lazy_static! {
    static ref MARKUP: Regex = Regex::new(r"<[^>]*>").expect("valid markup pattern");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");
}

/// Default note text extraction.
///
/// Joins the note's `content` entries and the content of its text sub-notes
/// with a single space. An unpublished note yields no text unless unpublished
/// content is requested; the same applies to each sub-note.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchivalNoteText;

impl NoteTextExtractor for ArchivalNoteText {
    fn extract_note_text(
        &self,
        note: &Note,
        include_unpublished: bool,
        rich_text: bool,
    ) -> String {
        if !note.publish && !include_unpublished {
            return String::new();
        }

        let subnotes = note.subnotes.iter().filter_map(|subnote| {
            let visible = include_unpublished || subnote.publish.unwrap_or(note.publish);
            if subnote.jsonmodel_type == "note_text" && visible {
                subnote.content.as_deref()
            } else {
                None
            }
        });

        let text = note
            .content
            .iter()
            .map(String::as_str)
            .chain(subnotes)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if rich_text {
            text
        } else {
            strip_markup(&text)
        }
    }
}

/// Remove inline markup tags and collapse the whitespace they leave behind.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let stripped = MARKUP.replace_all(text, "");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

/// Enumeration labels from a table keyed by `"enumeration.value"`.
///
/// # Examples
///
/// ```
/// use archmarc::collaborators::{EnumerationLabels, LabelTable};
///
/// let labels = LabelTable::from_json(
///     r#"{"extent_extent_type.linear_feet": "Linear Feet"}"#,
/// ).unwrap();
/// assert_eq!(labels.label("extent_extent_type", "linear_feet"), "Linear Feet");
/// assert_eq!(labels.label("extent_extent_type", "reels"), "reels");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: HashMap<String, String>,
}

impl LabelTable {
    /// An empty table; every lookup falls back to the value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load labels from a flat JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an object of strings.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(LabelTable {
            labels: serde_json::from_str(json)?,
        })
    }

    /// Add or replace one label.
    #[must_use]
    pub fn with_label(mut self, enumeration: &str, value: &str, label: &str) -> Self {
        self.labels
            .insert(format!("{enumeration}.{value}"), label.to_string());
        self
    }
}

impl EnumerationLabels for LabelTable {
    fn label(&self, enumeration: &str, value: &str) -> String {
        self.labels
            .get(&format!("{enumeration}.{value}"))
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }
}

/// Default 008 assembly for archival material.
///
/// | Positions | Content |
/// |---|---|
/// | 00-05 | date entered (`yymmdd` from the modification time) |
/// | 06 | `s` for an item with a single date, `i` otherwise |
/// | 07-10 | begin year of the first date |
/// | 11-14 | end year of the first date |
/// | 15-17 | `xx ` place of publication unknown |
/// | 18-34 | blank |
/// | 35-37 | language of the first language entry, `und` if none |
/// | 38-39 | ` d` |
#[derive(Debug, Clone, Copy, Default)]
pub struct Field008Assembler;

impl ControlfieldAssembler for Field008Assembler {
    fn assemble(&self, object: &ArchivalObject) -> String {
        let mut field = String::with_capacity(40);

        field.push_str(&date_entered(object.system_mtime.as_deref()));

        let date = object.dates.first();
        let single_item = object.level.as_deref() == Some("item")
            && date.is_some_and(|d| d.date_type == "single");
        field.push(if single_item { 's' } else { 'i' });

        field.push_str(&year(date.and_then(|d| d.begin.as_deref())));
        field.push_str(&year(date.and_then(|d| d.end.as_deref())));

        field.push_str("xx ");
        field.push_str(&" ".repeat(17));

        let language = object
            .lang_materials
            .iter()
            .filter_map(|lm| lm.language_and_script.as_ref())
            .find_map(|ls| ls.language.as_deref())
            .filter(|code| code.len() == 3)
            .unwrap_or("und");
        field.push_str(language);

        field.push_str(" d");
        field
    }
}

/// `yymmdd` from an RFC 3339 timestamp, six blanks when unavailable.
fn date_entered(mtime: Option<&str>) -> String {
    let digits: String = mtime
        .and_then(|m| m.get(0..10))
        .map(|date| date.chars().filter(char::is_ascii_digit).collect())
        .unwrap_or_default();
    if digits.len() == 8 {
        digits[2..8].to_string()
    } else {
        " ".repeat(6)
    }
}

/// First four characters of a date, blank-padded.
fn year(date: Option<&str>) -> String {
    let year: String = date.unwrap_or("").chars().take(4).collect();
    format!("{year:<4}")
}
