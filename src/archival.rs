//! Archival description records consumed by the exporter.
//!
//! These types mirror the JSON shape of archival objects and resources as
//! delivered by the archival management system: linked records arrive as
//! `{"ref": ..., "_resolved": {...}}` pairs, and the `_resolved` part may be
//! missing when resolution failed or the linked record is unpublished. Every
//! such reference is modelled as an `Option` and the exporter skips what did
//! not resolve.
//!
//! The exporter only reads these values; nothing here is mutated during an
//! export.
//!
//! # Examples
//!
//! ```
//! use archmarc::archival::ArchivalObject;
//!
//! let json = r#"{
//!     "jsonmodel_type": "resource",
//!     "title": "Smith Family Papers",
//!     "level": "collection",
//!     "id_0": "MS", "id_1": "", "id_2": "12",
//!     "subjects": [
//!         {"ref": "/subjects/1",
//!          "_resolved": {"source": "lcsh",
//!                        "terms": [{"term": "Horses", "term_type": "topical"}]}}
//!     ]
//! }"#;
//!
//! let object = ArchivalObject::from_json(json).unwrap();
//! assert_eq!(object.identifiers(), [Some("MS"), Some(""), Some("12"), None]);
//! assert_eq!(object.subjects.len(), 1);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// A link to another record, possibly carrying the resolved record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref<T> {
    /// URI of the linked record
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// The linked record, when resolution succeeded
    #[serde(rename = "_resolved", default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<T>,
}

impl<T> Ref<T> {
    /// Wrap an already resolved record.
    pub fn resolved(value: T) -> Self {
        Ref {
            uri: None,
            resolved: Some(value),
        }
    }

    /// A reference whose target could not be resolved.
    #[must_use]
    pub fn unresolved(uri: &str) -> Self {
        Ref {
            uri: Some(uri.to_string()),
            resolved: None,
        }
    }

    /// The resolved record, if any.
    pub fn get(&self) -> Option<&T> {
        self.resolved.as_ref()
    }
}

/// An archival object or resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchivalObject {
    /// `resource` or `archival_object`
    pub jsonmodel_type: Option<String>,
    /// Holding repository
    pub repository: Option<Ref<Repository>>,
    /// Title of the described material
    pub title: Option<String>,
    /// Level of description (`collection`, `series`, `item`, ...)
    pub level: Option<String>,
    /// Publication flag of the object itself
    pub publish: Option<bool>,
    /// Identifier component 0
    pub id_0: Option<String>,
    /// Identifier component 1
    pub id_1: Option<String>,
    /// Identifier component 2
    pub id_2: Option<String>,
    /// Identifier component 3
    pub id_3: Option<String>,
    /// Agents linked to the material (creators, subjects, sources)
    pub linked_agents: Vec<LinkedAgent>,
    /// Dates of the material
    pub dates: Vec<Date>,
    /// Linked subjects
    pub subjects: Vec<Ref<Subject>>,
    /// Physical extents
    pub extents: Vec<Extent>,
    /// Languages of the material
    pub lang_materials: Vec<LangMaterial>,
    /// Notes
    pub notes: Vec<Note>,
    /// Language of the finding aid
    pub finding_aid_language: Option<String>,
    /// Description rules used for the finding aid
    pub finding_aid_description_rules: Option<String>,
    /// Archival Resource Key
    pub ark_name: Option<ArkName>,
    /// Last modification time, RFC 3339
    pub system_mtime: Option<String>,
}

impl ArchivalObject {
    /// Parse an archival object from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe an archival object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the object is a resource (collection-level record).
    #[must_use]
    pub fn is_resource(&self) -> bool {
        self.jsonmodel_type.as_deref() == Some("resource")
    }

    /// Identifier components `id_0..id_3` in order.
    #[must_use]
    pub fn identifiers(&self) -> [Option<&str>; 4] {
        [
            self.id_0.as_deref(),
            self.id_1.as_deref(),
            self.id_2.as_deref(),
            self.id_3.as_deref(),
        ]
    }
}

/// A repository record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// Short repository code
    pub repo_code: Option<String>,
    /// Full name
    pub name: Option<String>,
    /// MARC organization code
    pub org_code: Option<String>,
    /// ISO 3166 country code
    pub country: Option<String>,
    /// Parent institution name
    pub parent_institution_name: Option<String>,
}

/// A subject heading with its ordered terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subject {
    /// Vocabulary the heading comes from (`lcsh`, `aat`, `local`, `built`, ...)
    pub source: String,
    /// Terms; the first is the primary term, the rest are subdivisions
    pub terms: Vec<Term>,
}

/// One term of a subject heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term text
    pub term: String,
    /// Kind of term
    pub term_type: TermType,
}

impl Term {
    /// Create a term.
    #[must_use]
    pub fn new(term: &str, term_type: TermType) -> Self {
        Term {
            term: term.to_string(),
            term_type,
        }
    }
}

/// Kind of a subject term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermType {
    /// Uniform title
    UniformTitle,
    /// Chronological term
    Temporal,
    /// Topical term
    Topical,
    /// Geographic name
    Geographic,
    /// Cultural context
    CulturalContext,
    /// Genre or form
    GenreForm,
    /// Style or period
    StylePeriod,
    /// Occupation
    Occupation,
    /// Function
    Function,
    /// Any term type this crate does not know
    #[serde(other)]
    Other,
}

/// An agent linked to the described material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedAgent {
    /// `creator`, `subject` or `source`
    pub role: String,
    /// MARC relator code
    pub relator: Option<String>,
    /// Subdivision terms when the agent is used as a subject
    pub terms: Vec<Term>,
    /// URI of the agent
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// The agent, when resolution succeeded
    #[serde(rename = "_resolved", skip_serializing_if = "Option::is_none")]
    pub resolved: Option<Agent>,
}

/// An agent record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agent {
    /// `agent_person`, `agent_family`, `agent_corporate_entity` or `agent_software`
    pub jsonmodel_type: String,
    /// Authorized name
    pub display_name: AgentName,
}

/// The display name of an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentName {
    /// Name as sorted in an index
    pub sort_name: String,
    /// Dates associated with the name
    pub dates: Option<String>,
    /// `inverted` or `direct` (personal names)
    pub name_order: Option<String>,
    /// Authority vocabulary of the name (`lcnaf`, `local`, ...)
    pub source: Option<String>,
}

/// A date of the described material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Date {
    /// `single`, `inclusive`, `range` or `bulk`
    pub date_type: String,
    /// Free-text date expression
    pub expression: Option<String>,
    /// Begin date (ISO)
    pub begin: Option<String>,
    /// End date (ISO)
    pub end: Option<String>,
}

/// A physical extent statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extent {
    /// Quantity, already formatted
    pub number: String,
    /// Extent type enumeration value
    pub extent_type: String,
    /// Summary of containers
    pub container_summary: Option<String>,
    /// Physical dimensions
    pub dimensions: Option<String>,
    /// `whole` or `part`
    pub portion: Option<String>,
}

/// Language of the material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LangMaterial {
    /// Language and script pair
    pub language_and_script: Option<LanguageAndScript>,
}

/// A language code with an optional script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageAndScript {
    /// ISO 639-2 language code
    pub language: Option<String>,
    /// ISO 15924 script code
    pub script: Option<String>,
}

/// A descriptive note.
///
/// The payload (`content`, `subnotes`) is only read by a
/// [`NoteTextExtractor`](crate::collaborators::NoteTextExtractor).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    /// `note_singlepart`, `note_multipart`, ...
    pub jsonmodel_type: Option<String>,
    /// Note type (`accessrestrict`, `prefercite`, ...)
    #[serde(rename = "type")]
    pub note_type: String,
    /// Whether the note is published
    pub publish: bool,
    /// Label shown with the note
    pub label: Option<String>,
    /// Text content of single-part notes
    #[serde(deserialize_with = "string_or_seq")]
    pub content: Vec<String>,
    /// Sub-notes of multi-part notes
    pub subnotes: Vec<Subnote>,
}

impl Note {
    /// A single-part note with the given text.
    #[must_use]
    pub fn text(note_type: &str, publish: bool, content: &str) -> Self {
        Note {
            jsonmodel_type: Some("note_singlepart".to_string()),
            note_type: note_type.to_string(),
            publish,
            content: vec![content.to_string()],
            ..Note::default()
        }
    }
}

/// A sub-note of a multi-part note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subnote {
    /// `note_text`, `note_chronology`, ...
    pub jsonmodel_type: String,
    /// Text content
    pub content: Option<String>,
    /// Whether the sub-note is published
    pub publish: Option<bool>,
}

/// Archival Resource Key of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArkName {
    /// Current ARK URL
    pub current: Option<String>,
}

/// Accept either a single string or a list of strings.
fn string_or_seq<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    })
}
