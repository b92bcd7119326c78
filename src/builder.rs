//! Accumulation of emitted fields into a [`Record`].
//!
//! Handlers never touch a [`Record`] directly; they hand their fields to a
//! [`FieldBuilder`], which supports two insertion policies:
//!
//! - [`FieldBuilder::append`] always adds a new field at the end. Repeatable
//!   fields (subjects, notes, extents) use it.
//! - [`FieldBuilder::append_or_reuse`] hands back the field already opened
//!   under the same tag and indicators, so subfields from several calls end up
//!   in one field. A new field is opened at the end when none exists.
//!
//! Field order is insertion order; [`FieldBuilder::finish`] neither reorders
//! nor deduplicates.

use std::collections::HashMap;

use crate::leader::Leader;
use crate::record::{Field, Record};

/// Accumulates control and data fields for one exported record.
#[derive(Debug)]
pub struct FieldBuilder {
    record: Record,
    /// (tag, ind1, ind2) -> index of the field opened by `append_or_reuse`
    open: HashMap<(String, char, char), usize>,
}

impl Default for FieldBuilder {
    fn default() -> Self {
        Self::new(Leader::archival())
    }
}

impl FieldBuilder {
    /// Start a record with the given leader.
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        FieldBuilder {
            record: Record::new(leader),
            open: HashMap::new(),
        }
    }

    /// Replace the leader.
    pub fn set_leader(&mut self, leader: Leader) {
        self.record.leader = leader;
    }

    /// Add or replace a control field (000-009).
    pub fn control_field(&mut self, tag: &str, value: String) {
        self.record.add_control_field(tag.to_string(), value);
    }

    /// Always add `field` as a new field after everything emitted so far.
    ///
    /// Fields without subfields carry no data and are not recorded.
    pub fn append(&mut self, field: Field) {
        if !field.has_content() {
            tracing::debug!(tag = %field.tag, "skipping field without subfields");
            return;
        }
        self.record.add_field(field);
    }

    /// Return the field opened under `tag`/`ind1`/`ind2`, opening it at the end
    /// of the record if it does not exist yet.
    pub fn append_or_reuse(&mut self, tag: &str, ind1: char, ind2: char) -> &mut Field {
        let key = (tag.to_string(), ind1, ind2);
        let fields = &mut self.record.fields;
        let index = *self.open.entry(key).or_insert_with(|| {
            fields.push(Field::new(tag.to_string(), ind1, ind2));
            fields.len() - 1
        });
        &mut self.record.fields[index]
    }

    /// Number of data fields emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.record.fields.len()
    }

    /// Whether no data field has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record.fields.is_empty()
    }

    /// Hand over the finished record.
    ///
    /// Fields opened through [`FieldBuilder::append_or_reuse`] that never
    /// received a subfield are dropped.
    #[must_use]
    pub fn finish(mut self) -> Record {
        self.record.fields.retain(Field::has_content);
        self.record
    }
}
