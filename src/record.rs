//! MARC bibliographic record structures produced by the exporter.
//!
//! This module provides the output types of the export engine:
//! - [`Record`]: leader, control fields and data fields
//! - [`Field`]: a tagged, indicator-qualified data field (010+)
//! - [`Subfield`]: a single (code, value) pair inside a data field
//!
//! Data fields are kept in one flat list in emission order. Consumers of
//! exported archival records depend on that order, so a record never groups or
//! sorts its fields by tag.
//!
//! # Examples
//!
//! ```
//! use archmarc::{Field, Leader, Record};
//!
//! let mut record = Record::new(Leader::archival());
//! record.add_control_field_str("008", "240101i19001950xx                  eng d");
//!
//! let field = Field::builder("650".to_string(), ' ', '0')
//!     .subfield_str('a', "Horses")
//!     .subfield_str('x', "History")
//!     .build();
//! record.add_field(field);
//!
//! assert_eq!(record.fields_by_tag("650").count(), 1);
//! ```

use crate::leader::Leader;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A MARC bibliographic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record leader (24 bytes)
    pub leader: Leader,
    /// Control fields (000-009) - tag -> value, preserves insertion order
    pub control_fields: IndexMap<String, String>,
    /// Data fields (010+) in emission order
    pub fields: Vec<Field>,
}

/// A data field in a MARC record (fields 010 and higher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field tag (3 digits)
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Record {
    /// Create a new MARC record with the given leader
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        Record {
            leader,
            control_fields: IndexMap::new(),
            fields: Vec::new(),
        }
    }

    /// Add a control field (000-009)
    pub fn add_control_field(&mut self, tag: String, value: String) {
        self.control_fields.insert(tag, value);
    }

    /// Add a control field using string slices
    pub fn add_control_field_str(&mut self, tag: &str, value: &str) {
        self.add_control_field(tag.to_string(), value.to_string());
    }

    /// Get a control field value
    #[must_use]
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields
            .get(tag)
            .map(std::string::String::as_str)
    }

    /// Append a data field after every field already present
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Get first field with a given tag
    #[must_use]
    pub fn get_field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Get all fields with a given tag, in emission order
    #[must_use]
    pub fn get_fields(&self, tag: &str) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.tag == tag).collect()
    }

    /// Iterate over all data fields in emission order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Iterate over fields matching a specific tag
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag == tag)
    }

    /// Iterate over all control fields as (tag, value) pairs
    pub fn control_fields_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.control_fields
            .iter()
            .map(|(tag, value)| (tag.as_str(), value.as_str()))
    }

    /// The data field tags in emission order.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.tag.as_str()).collect()
    }

    /// Get the title from field 245, subfield 'a'
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get_field("245").and_then(|f| f.get_subfield('a'))
    }

    /// Get the local call number from field 099, subfield 'a'
    #[must_use]
    pub fn call_number(&self) -> Option<&str> {
        self.get_field("099").and_then(|f| f.get_subfield('a'))
    }

    /// Subject headings (6XX) rendered with ` -- ` between subdivisions
    #[must_use]
    pub fn subject_headings(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.tag.starts_with('6'))
            .map(Field::format_field)
            .collect()
    }
}

impl Field {
    /// Create a new data field
    #[must_use]
    pub fn new(tag: String, indicator1: char, indicator2: char) -> Self {
        Field {
            tag,
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for constructing fields fluently
    ///
    /// # Examples
    ///
    /// ```
    /// use archmarc::Field;
    ///
    /// let field = Field::builder("524".to_string(), ' ', ' ')
    ///     .subfield('a', "Cite as: Smith Papers".to_string())
    ///     .build();
    /// assert_eq!(field.get_subfield('a'), Some("Cite as: Smith Papers"));
    /// ```
    #[must_use]
    pub fn builder(tag: String, indicator1: char, indicator2: char) -> DataFieldBuilder {
        DataFieldBuilder {
            field: Field::new(tag, indicator1, indicator2),
        }
    }

    /// Add a subfield
    pub fn add_subfield(&mut self, code: char, value: String) {
        self.subfields.push(Subfield { code, value });
    }

    /// Add a subfield using a string slice
    pub fn add_subfield_str(&mut self, code: char, value: &str) {
        self.add_subfield(code, value.to_string());
    }

    /// Get first value for a subfield code
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Get all values for a subfield code
    #[must_use]
    pub fn get_subfield_values(&self, code: char) -> Vec<&str> {
        self.subfields
            .iter()
            .filter(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
            .collect()
    }

    /// Iterate over all subfields
    pub fn subfields(&self) -> impl Iterator<Item = &Subfield> {
        self.subfields.iter()
    }

    /// Subfield codes in order, e.g. `"axz2"`
    #[must_use]
    pub fn subfield_codes(&self) -> String {
        self.subfields.iter().map(|sf| sf.code).collect()
    }

    /// Whether the field carries at least one subfield
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.subfields.is_empty()
    }

    /// Concatenate all subfield values with spaces
    #[must_use]
    pub fn value(&self) -> String {
        self.subfields
            .iter()
            .map(|sf| sf.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Get the field's content as a pretty-formatted string
    ///
    /// For subject fields (6xx), uses " -- " before subdivision subfields
    /// (t, v, x, y, z) and leaves out the `$2` source.
    #[must_use]
    pub fn format_field(&self) -> String {
        let is_subject = self.tag.starts_with('6');
        let mut result = String::new();

        for subfield in &self.subfields {
            if is_subject && subfield.code == '2' {
                continue;
            }
            if is_subject && matches!(subfield.code, 't' | 'v' | 'x' | 'y' | 'z') {
                result.push_str(" -- ");
            } else if !result.is_empty() {
                result.push(' ');
            }
            result.push_str(&subfield.value);
        }

        result.trim().to_string()
    }
}

/// Builder for fluently constructing a single data field
///
/// # Examples
///
/// ```
/// use archmarc::Field;
///
/// let field = Field::builder("300".to_string(), ' ', ' ')
///     .subfield_str('a', "5 linear feet")
///     .build();
/// assert_eq!(field.value(), "5 linear feet");
/// ```
#[derive(Debug)]
pub struct DataFieldBuilder {
    field: Field,
}

impl DataFieldBuilder {
    /// Add a subfield to the field being built
    #[must_use]
    pub fn subfield(mut self, code: char, value: String) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Add a subfield using a string slice
    #[must_use]
    pub fn subfield_str(mut self, code: char, value: &str) -> Self {
        self.field.add_subfield_str(code, value);
        self
    }

    /// Build the field
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}
