#![warn(missing_docs)]

//! # archmarc
//!
//! Exports archival description records (resources and archival objects) as
//! MARC21 bibliographic records.
//!
//! The crate is a rules engine: each group of archival attributes is bound to
//! a handler, handlers consult classification tables to pick MARC tags,
//! indicators and subfield codes, and the resulting fields are collected in
//! emission order into a [`Record`].
//!
//! ## Quick Start
//!
//! ```
//! use archmarc::archival::ArchivalObject;
//! use archmarc::{marcxml, ExportOptions, HandlerSet, MarcExporter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resource = ArchivalObject::from_json(r#"{
//!     "jsonmodel_type": "resource",
//!     "title": "Smith Family Papers",
//!     "level": "collection",
//!     "id_0": "MS", "id_1": "12",
//!     "subjects": [{"ref": "/subjects/1", "_resolved": {
//!         "source": "lcsh",
//!         "terms": [{"term": "Horses", "term_type": "topical"}]
//!     }}]
//! }"#)?;
//!
//! let exporter = MarcExporter::new(HandlerSet::new(ExportOptions::default()))?;
//! let record = exporter.export_resource(&resource)?;
//!
//! assert_eq!(record.title(), Some("Smith Family Papers"));
//! assert_eq!(record.call_number(), Some("MS.12"));
//! assert_eq!(record.subject_headings(), vec!["Horses"]);
//!
//! let xml = marcxml::record_to_marcxml(&record)?;
//! assert!(xml.contains(r#"<datafield tag="650" ind1=" " ind2="0">"#));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`archival`]: Archival input records
//! - [`record`]: MARC record structures (`Record`, `Field`, `Subfield`)
//! - [`leader`]: MARC record leader (24-byte header)
//! - [`builder`]: Field accumulation with append / append-or-reuse policies
//! - [`rules`]: Classification tables and local overrides
//! - [`handlers`]: One handler per attribute group
//! - [`driver`]: Binding tables and the exporter
//! - [`collaborators`]: Note text, label and 008 collaborators
//! - [`config`]: Export options and cataloging conventions
//! - [`marcxml`]: MARCXML output
//! - [`marcjson`]: MARC-in-JSON output
//! - [`error`]: Error types and result type

pub mod archival;
pub mod builder;
pub mod collaborators;
pub mod config;
pub mod driver;
pub mod error;
pub mod handlers;
pub mod leader;
pub mod marcjson;
pub mod marcxml;
pub mod record;
pub mod rules;

pub use archival::ArchivalObject;
pub use builder::FieldBuilder;
pub use collaborators::{
    ArchivalNoteText, ControlfieldAssembler, EnumerationLabels, Field008Assembler, LabelTable,
    NoteTextExtractor,
};
pub use config::{CatalogingConventions, ExportOptions};
pub use driver::{Attribute, Binding, BindingTable, Handler, MarcExporter};
pub use error::{ExportError, Result};
pub use handlers::HandlerSet;
pub use leader::Leader;
pub use record::{DataFieldBuilder, Field, Record, Subfield};
pub use rules::RuleSet;
