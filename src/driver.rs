//! Binding tables and the export driver.
//!
//! A [`Binding`] names the attributes read from an [`ArchivalObject`] and the
//! [`Handler`] that receives them. Bindings are grouped into ordered
//! [`BindingTable`]s, validated when the table is built: every binding must
//! list exactly the attributes its handler declares, and a handler may appear
//! only once per table.
//!
//! [`MarcExporter`] runs the archival-object table for every record and the
//! resource table after it for resources, so the field order of an exported
//! record is the binding order followed by each handler's emission order.
//!
//! # Examples
//!
//! ```
//! use archmarc::archival::ArchivalObject;
//! use archmarc::{ExportOptions, HandlerSet, MarcExporter};
//!
//! let json = r#"{
//!     "jsonmodel_type": "resource",
//!     "title": "Smith Family Papers",
//!     "level": "collection",
//!     "id_0": "MS", "id_1": "12",
//!     "notes": [{"type": "prefercite", "publish": true, "content": "Smith Papers"}]
//! }"#;
//! let resource = ArchivalObject::from_json(json).unwrap();
//!
//! let exporter = MarcExporter::new(HandlerSet::new(ExportOptions::default())).unwrap();
//! let record = exporter.export_resource(&resource).unwrap();
//!
//! assert_eq!(record.tags(), vec!["245", "099", "524"]);
//! assert_eq!(record.leader.bibliographic_level, 'c');
//! assert!(record.get_control_field("008").is_some());
//! ```

use std::collections::HashSet;
use std::fmt;

use rayon::prelude::*;

use crate::archival::{
    ArchivalObject, ArkName, Date, Extent, LangMaterial, LinkedAgent, Note, Ref, Repository,
    Subject,
};
use crate::builder::FieldBuilder;
use crate::collaborators::{ControlfieldAssembler, Field008Assembler};
use crate::error::{ExportError, Result};
use crate::handlers::HandlerSet;
use crate::leader::Leader;
use crate::record::Record;

/// An attribute of an archival object that a handler can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// `repository`
    Repository,
    /// `finding_aid_language`
    FindingAidLanguage,
    /// `finding_aid_description_rules`
    FindingAidDescriptionRules,
    /// `title`
    Title,
    /// `linked_agents`
    LinkedAgents,
    /// `dates`
    Dates,
    /// `subjects`
    Subjects,
    /// `extents`
    Extents,
    /// `lang_materials`
    LangMaterials,
    /// `id_0`
    Id0,
    /// `id_1`
    Id1,
    /// `id_2`
    Id2,
    /// `id_3`
    Id3,
    /// `ark_name`
    ArkName,
    /// `notes`
    Notes,
}

impl Attribute {
    /// Name of the attribute in the archival JSON.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Repository => "repository",
            Attribute::FindingAidLanguage => "finding_aid_language",
            Attribute::FindingAidDescriptionRules => "finding_aid_description_rules",
            Attribute::Title => "title",
            Attribute::LinkedAgents => "linked_agents",
            Attribute::Dates => "dates",
            Attribute::Subjects => "subjects",
            Attribute::Extents => "extents",
            Attribute::LangMaterials => "lang_materials",
            Attribute::Id0 => "id_0",
            Attribute::Id1 => "id_1",
            Attribute::Id2 => "id_2",
            Attribute::Id3 => "id_3",
            Attribute::ArkName => "ark_name",
            Attribute::Notes => "notes",
        }
    }

    fn extract(self, object: &ArchivalObject) -> AttributeValue<'_> {
        match self {
            Attribute::Repository => AttributeValue::Repository(object.repository.as_ref()),
            Attribute::FindingAidLanguage => {
                AttributeValue::Text(object.finding_aid_language.as_deref())
            },
            Attribute::FindingAidDescriptionRules => {
                AttributeValue::Text(object.finding_aid_description_rules.as_deref())
            },
            Attribute::Title => AttributeValue::Text(object.title.as_deref()),
            Attribute::LinkedAgents => AttributeValue::Agents(&object.linked_agents),
            Attribute::Dates => AttributeValue::Dates(&object.dates),
            Attribute::Subjects => AttributeValue::Subjects(&object.subjects),
            Attribute::Extents => AttributeValue::Extents(&object.extents),
            Attribute::LangMaterials => AttributeValue::Languages(&object.lang_materials),
            Attribute::Id0 => AttributeValue::Text(object.id_0.as_deref()),
            Attribute::Id1 => AttributeValue::Text(object.id_1.as_deref()),
            Attribute::Id2 => AttributeValue::Text(object.id_2.as_deref()),
            Attribute::Id3 => AttributeValue::Text(object.id_3.as_deref()),
            Attribute::ArkName => AttributeValue::Ark(object.ark_name.as_ref()),
            Attribute::Notes => AttributeValue::Notes(&object.notes),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A borrowed attribute value.
#[derive(Debug, Clone, Copy)]
enum AttributeValue<'a> {
    Repository(Option<&'a Ref<Repository>>),
    Text(Option<&'a str>),
    Agents(&'a [LinkedAgent]),
    Dates(&'a [Date]),
    Subjects(&'a [Ref<Subject>]),
    Extents(&'a [Extent]),
    Languages(&'a [LangMaterial]),
    Ark(Option<&'a ArkName>),
    Notes(&'a [Note]),
}

/// A handler of the [`HandlerSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// [`HandlerSet::handle_repository`]
    Repository,
    /// [`HandlerSet::handle_title`]
    Title,
    /// [`HandlerSet::handle_agents`]
    Agents,
    /// [`HandlerSet::handle_subjects`]
    Subjects,
    /// [`HandlerSet::handle_extents`]
    Extents,
    /// [`HandlerSet::handle_languages`]
    Languages,
    /// [`HandlerSet::handle_identifiers`]
    Identifiers,
    /// [`HandlerSet::handle_ark`]
    Ark,
    /// [`HandlerSet::handle_notes`]
    Notes,
}

impl Handler {
    /// Attributes the handler receives, in argument order.
    #[must_use]
    pub const fn attributes(self) -> &'static [Attribute] {
        use Attribute as A;
        match self {
            Handler::Repository => &[
                A::Repository,
                A::FindingAidLanguage,
                A::FindingAidDescriptionRules,
            ],
            Handler::Title => &[A::Title, A::LinkedAgents, A::Dates],
            Handler::Agents => &[A::LinkedAgents],
            Handler::Subjects => &[A::Subjects],
            Handler::Extents => &[A::Extents],
            Handler::Languages => &[A::LangMaterials],
            Handler::Identifiers => &[A::Id0, A::Id1, A::Id2, A::Id3],
            Handler::Ark => &[A::ArkName],
            Handler::Notes => &[A::Notes],
        }
    }

    /// Short name used in logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Handler::Repository => "repository",
            Handler::Title => "title",
            Handler::Agents => "agents",
            Handler::Subjects => "subjects",
            Handler::Extents => "extents",
            Handler::Languages => "languages",
            Handler::Identifiers => "identifiers",
            Handler::Ark => "ark",
            Handler::Notes => "notes",
        }
    }

    fn invoke(
        self,
        handlers: &HandlerSet,
        out: &mut FieldBuilder,
        values: &[AttributeValue<'_>],
    ) -> Result<()> {
        use AttributeValue as V;
        match (self, values) {
            (Handler::Repository, [V::Repository(repository), V::Text(language), V::Text(rules)]) => {
                handlers.handle_repository(out, *repository, *language, *rules);
            },
            (Handler::Title, [V::Text(title), V::Agents(agents), V::Dates(dates)]) => {
                handlers.handle_title(out, *title, agents, dates);
            },
            (Handler::Agents, [V::Agents(agents)]) => handlers.handle_agents(out, agents),
            (Handler::Subjects, [V::Subjects(subjects)]) => handlers.handle_subjects(out, subjects),
            (Handler::Extents, [V::Extents(extents)]) => handlers.handle_extents(out, extents),
            (Handler::Languages, [V::Languages(languages)]) => {
                handlers.handle_languages(out, languages);
            },
            (Handler::Identifiers, [V::Text(id0), V::Text(id1), V::Text(id2), V::Text(id3)]) => {
                handlers.handle_identifiers(out, [*id0, *id1, *id2, *id3]);
            },
            (Handler::Ark, [V::Ark(ark)]) => handlers.handle_ark(out, *ark),
            (Handler::Notes, [V::Notes(notes)]) => handlers.handle_notes(out, notes),
            _ => {
                return Err(ExportError::InvalidBinding(format!(
                    "{} handler cannot take the attributes it was given",
                    self.name()
                )))
            },
        }
        Ok(())
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attributes routed to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Attributes read from the archival object, in argument order
    pub attributes: &'static [Attribute],
    /// Handler receiving them
    pub handler: Handler,
}

impl Binding {
    /// Bind `attributes` to `handler`.
    #[must_use]
    pub const fn new(attributes: &'static [Attribute], handler: Handler) -> Self {
        Binding {
            attributes,
            handler,
        }
    }

    /// Bind a handler to exactly the attributes it declares.
    #[must_use]
    pub const fn declared(handler: Handler) -> Self {
        Binding::new(handler.attributes(), handler)
    }
}

/// Bindings applied to every archival object.
pub const ARCHIVAL_OBJECT_BINDINGS: &[Binding] = &[
    Binding::declared(Handler::Repository),
    Binding::declared(Handler::Title),
    Binding::declared(Handler::Agents),
    Binding::declared(Handler::Subjects),
    Binding::declared(Handler::Extents),
    Binding::declared(Handler::Languages),
];

/// Bindings applied to resources after [`ARCHIVAL_OBJECT_BINDINGS`].
pub const RESOURCE_BINDINGS: &[Binding] = &[
    Binding::declared(Handler::Identifiers),
    Binding::declared(Handler::Ark),
    Binding::declared(Handler::Notes),
];

/// An ordered, validated list of bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTable {
    name: &'static str,
    bindings: Vec<Binding>,
}

impl BindingTable {
    /// Build and validate a table.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidBinding`] when a binding's attributes do
    /// not match its handler's declaration, or when a handler is bound twice.
    pub fn new(name: &'static str, bindings: &[Binding]) -> Result<Self> {
        let mut seen = HashSet::new();
        for binding in bindings {
            let declared = binding.handler.attributes();
            if binding.attributes != declared {
                return Err(ExportError::InvalidBinding(format!(
                    "{name}: {} handler declares [{}] but is bound to [{}]",
                    binding.handler,
                    join(declared),
                    join(binding.attributes)
                )));
            }
            if !seen.insert(binding.handler) {
                return Err(ExportError::InvalidBinding(format!(
                    "{name}: {} handler is bound more than once",
                    binding.handler
                )));
            }
        }

        Ok(BindingTable {
            name,
            bindings: bindings.to_vec(),
        })
    }

    /// The table applied to every archival object.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in bindings are inconsistent.
    pub fn archival_object() -> Result<Self> {
        Self::new("archival_object", ARCHIVAL_OBJECT_BINDINGS)
    }

    /// The table applied to resources.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in bindings are inconsistent.
    pub fn resource() -> Result<Self> {
        Self::new("resource", RESOURCE_BINDINGS)
    }

    /// Name of the table.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bindings in application order.
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Run every binding against `object`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidBinding`] if a binding cannot be
    /// dispatched.
    pub fn apply(
        &self,
        handlers: &HandlerSet,
        object: &ArchivalObject,
        out: &mut FieldBuilder,
    ) -> Result<()> {
        let mut values = Vec::with_capacity(4);
        for binding in &self.bindings {
            values.clear();
            values.extend(binding.attributes.iter().map(|a| a.extract(object)));
            tracing::trace!(table = self.name, handler = %binding.handler, "invoking handler");
            binding.handler.invoke(handlers, out, &values)?;
        }
        Ok(())
    }
}

fn join(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(|a| a.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Exports archival objects and resources as MARC records.
pub struct MarcExporter {
    handlers: HandlerSet,
    controlfields: Box<dyn ControlfieldAssembler>,
    archival_object_table: BindingTable,
    resource_table: BindingTable,
}

impl fmt::Debug for MarcExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarcExporter")
            .field("handlers", &self.handlers)
            .field("archival_object_table", &self.archival_object_table)
            .field("resource_table", &self.resource_table)
            .finish_non_exhaustive()
    }
}

impl MarcExporter {
    /// An exporter with the built-in binding tables and 008 assembly.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidBinding`] if the built-in tables are
    /// inconsistent.
    pub fn new(handlers: HandlerSet) -> Result<Self> {
        Ok(MarcExporter {
            handlers,
            controlfields: Box::new(Field008Assembler),
            archival_object_table: BindingTable::archival_object()?,
            resource_table: BindingTable::resource()?,
        })
    }

    /// Use a different 008 assembler.
    #[must_use]
    pub fn with_controlfield_assembler(
        mut self,
        assembler: impl ControlfieldAssembler + 'static,
    ) -> Self {
        self.controlfields = Box::new(assembler);
        self
    }

    /// Replace the binding tables.
    #[must_use]
    pub fn with_tables(mut self, archival_object: BindingTable, resource: BindingTable) -> Self {
        self.archival_object_table = archival_object;
        self.resource_table = resource;
        self
    }

    /// The handlers in use.
    #[must_use]
    pub fn handlers(&self) -> &HandlerSet {
        &self.handlers
    }

    /// Export the descriptive fields of an archival object.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidBinding`] if a binding cannot be
    /// dispatched.
    pub fn export_archival_object(&self, object: &ArchivalObject) -> Result<Record> {
        let mut out = FieldBuilder::new(Leader::archival());
        self.archival_object_table
            .apply(&self.handlers, object, &mut out)?;
        Ok(out.finish())
    }

    /// Export a resource: leader, 008, then the archival-object and resource
    /// bindings.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidBinding`] if a binding cannot be
    /// dispatched.
    pub fn export_resource(&self, object: &ArchivalObject) -> Result<Record> {
        let mut out = FieldBuilder::new(Leader::for_level(object.level.as_deref()));
        out.control_field("008", self.controlfields.assemble(object));

        self.archival_object_table
            .apply(&self.handlers, object, &mut out)?;
        self.resource_table.apply(&self.handlers, object, &mut out)?;

        let record = out.finish();
        tracing::debug!(
            title = ?object.title,
            fields = record.fields.len(),
            "exported resource"
        );
        Ok(record)
    }

    /// Export `object` as a resource or an archival object depending on its
    /// model type.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidBinding`] if a binding cannot be
    /// dispatched.
    pub fn export(&self, object: &ArchivalObject) -> Result<Record> {
        if object.is_resource() {
            self.export_resource(object)
        } else {
            self.export_archival_object(object)
        }
    }

    /// Export many resources in parallel; results are in input order.
    #[must_use]
    pub fn export_resources(&self, objects: &[ArchivalObject]) -> Vec<Result<Record>> {
        objects
            .par_iter()
            .map(|object| self.export_resource(object))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archival::{Repository, Term, TermType};
    use crate::config::ExportOptions;

    fn exporter() -> MarcExporter {
        MarcExporter::new(HandlerSet::default()).unwrap()
    }

    #[test]
    fn test_builtin_tables_are_valid() {
        let table = BindingTable::archival_object().unwrap();
        let handlers: Vec<_> = table.bindings().iter().map(|b| b.handler).collect();
        assert_eq!(
            handlers,
            vec![
                Handler::Repository,
                Handler::Title,
                Handler::Agents,
                Handler::Subjects,
                Handler::Extents,
                Handler::Languages,
            ]
        );
        assert_eq!(BindingTable::resource().unwrap().bindings().len(), 3);
    }

    #[test]
    fn test_mismatched_attributes_rejected() {
        let bindings = [Binding::new(&[Attribute::Notes], Handler::Subjects)];
        let err = BindingTable::new("broken", &bindings).unwrap_err();
        assert!(matches!(err, ExportError::InvalidBinding(_)));
        assert!(err.to_string().contains("subjects"));
    }

    #[test]
    fn test_attribute_order_matters() {
        let bindings = [Binding::new(
            &[Attribute::Id1, Attribute::Id0, Attribute::Id2, Attribute::Id3],
            Handler::Identifiers,
        )];
        assert!(BindingTable::new("swapped", &bindings).is_err());
    }

    #[test]
    fn test_duplicate_handler_rejected() {
        let bindings = [
            Binding::declared(Handler::Notes),
            Binding::declared(Handler::Notes),
        ];
        let err = BindingTable::new("twice", &bindings).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_archival_object_has_no_resource_fields() {
        let object = ArchivalObject {
            jsonmodel_type: Some("archival_object".to_string()),
            title: Some("Folder 1".to_string()),
            id_0: Some("MS".to_string()),
            notes: vec![crate::archival::Note::text("abstract", true, "Letters")],
            ..ArchivalObject::default()
        };
        let record = exporter().export(&object).unwrap();
        assert_eq!(record.tags(), vec!["245"]);
        assert!(record.control_fields.is_empty());
    }

    #[test]
    fn test_resource_field_order() {
        let object = ArchivalObject {
            jsonmodel_type: Some("resource".to_string()),
            repository: Some(Ref::resolved(Repository {
                country: Some("US".to_string()),
                ..Repository::default()
            })),
            title: Some("Smith Papers".to_string()),
            level: Some("item".to_string()),
            subjects: vec![Ref::resolved(Subject {
                source: "lcsh".to_string(),
                terms: vec![Term::new("Horses", TermType::Topical)],
            })],
            id_0: Some("MS".to_string()),
            id_1: Some("12".to_string()),
            ..ArchivalObject::default()
        };

        let record = exporter().export(&object).unwrap();
        assert_eq!(record.tags(), vec!["040", "049", "044", "245", "650", "099"]);
        assert_eq!(record.leader.bibliographic_level, 'm');
        assert_eq!(record.get_control_field("008").map(str::len), Some(40));
    }

    #[test]
    fn test_custom_tables_set_output_order() {
        let archival_object = BindingTable::new(
            "subjects_first",
            &[
                Binding::declared(Handler::Subjects),
                Binding::declared(Handler::Title),
            ],
        )
        .unwrap();
        let resource = BindingTable::new(
            "notes_first",
            &[
                Binding::declared(Handler::Notes),
                Binding::declared(Handler::Identifiers),
            ],
        )
        .unwrap();
        let exporter = exporter().with_tables(archival_object, resource);

        let object = ArchivalObject {
            jsonmodel_type: Some("resource".to_string()),
            repository: Some(Ref::resolved(Repository {
                country: Some("US".to_string()),
                ..Repository::default()
            })),
            title: Some("Smith Papers".to_string()),
            subjects: vec![Ref::resolved(Subject {
                source: "lcsh".to_string(),
                terms: vec![Term::new("Horses", TermType::Topical)],
            })],
            id_0: Some("MS".to_string()),
            notes: vec![crate::archival::Note::text("abstract", true, "Letters")],
            ..ArchivalObject::default()
        };

        let record = exporter.export(&object).unwrap();
        assert_eq!(record.tags(), vec!["650", "245", "520", "099"]);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let exporter = MarcExporter::new(HandlerSet::new(ExportOptions::new().with_arks(true)))
            .unwrap();
        let objects: Vec<_> = (0..20)
            .map(|i| ArchivalObject {
                jsonmodel_type: Some("resource".to_string()),
                title: Some(format!("Collection {i}")),
                id_0: Some(i.to_string()),
                ..ArchivalObject::default()
            })
            .collect();

        let batch = exporter.export_resources(&objects);
        for (object, result) in objects.iter().zip(batch) {
            assert_eq!(result.unwrap(), exporter.export_resource(object).unwrap());
        }
    }
}
