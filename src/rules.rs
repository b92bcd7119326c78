//! Classification rules: which MARC tag, indicators and subfield codes an
//! archival value maps to.
//!
//! Every lookup here is a pure function over immutable tables. A lookup that
//! has no entry returns `None`, and callers drop the item without raising an
//! error.
//!
//! Rules come in two layers:
//!
//! - the **base** tables, which follow the common archival-to-MARC mapping;
//! - a [`LocalOverrides`] table of local cataloging conventions, consulted
//!   first at lookup time.
//!
//! [`RuleSet::stock`] applies no overrides, [`RuleSet::local`] (the default)
//! applies [`LocalOverrides::BOULDER`].
//!
//! # Examples
//!
//! ```
//! use archmarc::archival::TermType;
//! use archmarc::rules::RuleSet;
//!
//! let rules = RuleSet::local();
//! let field = rules.subject_field_for(TermType::Topical, "built");
//! assert_eq!((field.tag, field.indicator1, field.indicator2), ("610", ' ', '7'));
//!
//! let field = RuleSet::stock().subject_field_for(TermType::Topical, "built");
//! assert_eq!(field.tag, "650");
//! ```

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::archival::TermType;

/// Second indicator of a data field meaning "source specified in subfield $2".
pub const SOURCE_IN_SUBFIELD_2: char = '7';

/// How the second indicator of a subject field is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator2Rule {
    /// Thesaurus code of the subject's source vocabulary
    SourceCode,
    /// Always this value
    Fixed(char),
}

/// Tag and second-indicator rule for a primary subject term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectTag {
    /// MARC tag
    pub tag: &'static str,
    /// Second indicator rule
    pub indicator2: Indicator2Rule,
}

/// A resolved subject field shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectField {
    /// MARC tag
    pub tag: &'static str,
    /// First indicator (`0` nonfiling characters for 630, blank otherwise)
    pub indicator1: char,
    /// Second indicator (thesaurus)
    pub indicator2: char,
}

impl SubjectField {
    /// Whether the heading must name its vocabulary in `$2`.
    #[must_use]
    pub fn needs_source_subfield(&self) -> bool {
        self.indicator2 == SOURCE_IN_SUBFIELD_2
    }
}

/// How the first indicator of a note field is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator1Policy {
    /// Always this value
    Constant(char),
    /// `1` when the note is published, `0` otherwise
    PublishFlag,
}

/// Field shape of a note type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteField {
    /// MARC tag
    pub tag: &'static str,
    /// First indicator policy
    pub indicator1: Indicator1Policy,
    /// Second indicator
    pub indicator2: char,
    /// Subfield receiving the note text
    pub code: char,
}

impl NoteField {
    const fn new(tag: &'static str, indicator1: Indicator1Policy) -> Self {
        NoteField {
            tag,
            indicator1,
            indicator2: ' ',
            code: 'a',
        }
    }

    /// First indicator for a note with the given publication flag.
    #[must_use]
    pub fn indicator1_for(&self, published: bool) -> char {
        match self.indicator1 {
            Indicator1Policy::Constant(c) => c,
            Indicator1Policy::PublishFlag => {
                if published {
                    '1'
                } else {
                    '0'
                }
            },
        }
    }
}

/// Role of a linked agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    /// Creator of the material
    Creator,
    /// Subject of the material
    Subject,
    /// Source (former owner, donor)
    Source,
}

impl AgentRole {
    /// Parse a role enumeration value.
    #[must_use]
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "creator" => Some(Self::Creator),
            "subject" => Some(Self::Subject),
            "source" => Some(Self::Source),
            _ => None,
        }
    }
}

/// Field shape for a name heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentField {
    /// MARC tag
    pub tag: &'static str,
    /// First indicator (type of name)
    pub indicator1: char,
    /// Second indicator rule
    pub indicator2: Indicator2Rule,
}

/// Local cataloging conventions layered over the base rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalOverrides {
    /// (primary term type, subject source) pairs exported with a different field
    pub subject_tags: &'static [(TermType, &'static str, SubjectTag)],
    /// Subdivision codes added or replaced
    pub subdivisions: &'static [(TermType, char)],
    /// Source values rewritten when written to `$2`
    pub subfield_2_sources: &'static [(&'static str, &'static str)],
}

impl LocalOverrides {
    /// No local conventions.
    pub const NONE: LocalOverrides = LocalOverrides {
        subject_tags: &[],
        subdivisions: &[],
        subfield_2_sources: &[],
    };

    /// Boulder conventions: buildings (`built` topical subjects) are exported as
    /// corporate names with a `local` source, and occupations subdivide with `$x`.
    pub const BOULDER: LocalOverrides = LocalOverrides {
        subject_tags: &[(
            TermType::Topical,
            "built",
            SubjectTag {
                tag: "610",
                indicator2: Indicator2Rule::Fixed(SOURCE_IN_SUBFIELD_2),
            },
        )],
        subdivisions: &[(TermType::Occupation, 'x')],
        subfield_2_sources: &[("built", "local")],
    };
}

impl Default for LocalOverrides {
    fn default() -> Self {
        Self::BOULDER
    }
}

lazy_static! {
    /// Primary term type -> subject field.
    static ref BASE_SUBJECT_TAGS: HashMap<TermType, SubjectTag> = {
        let source = |tag| SubjectTag { tag, indicator2: Indicator2Rule::SourceCode };
        let fixed = |tag| SubjectTag {
            tag,
            indicator2: Indicator2Rule::Fixed(SOURCE_IN_SUBFIELD_2),
        };
        HashMap::from([
            (TermType::UniformTitle, source("630")),
            (TermType::Temporal, source("648")),
            (TermType::Topical, source("650")),
            (TermType::Geographic, source("651")),
            (TermType::CulturalContext, source("651")),
            (TermType::GenreForm, source("655")),
            (TermType::StylePeriod, source("655")),
            (TermType::Occupation, fixed("656")),
            (TermType::Function, fixed("656")),
        ])
    };

    /// Subdivision term type -> subfield code.
    static ref BASE_SUBDIVISIONS: HashMap<TermType, char> = HashMap::from([
        (TermType::UniformTitle, 't'),
        (TermType::GenreForm, 'v'),
        (TermType::StylePeriod, 'v'),
        (TermType::Topical, 'x'),
        (TermType::CulturalContext, 'x'),
        (TermType::Temporal, 'y'),
        (TermType::Geographic, 'z'),
    ]);

    /// Vocabulary -> thesaurus code (second indicator of 6XX).
    static ref SOURCE_CODES: HashMap<&'static str, char> = HashMap::from([
        ("naf", '0'),
        ("lcnaf", '0'),
        ("lcsh", '0'),
        ("lcshac", '1'),
        ("mesh", '2'),
        ("nal", '3'),
        ("cash", '5'),
        ("rvm", '6'),
    ]);

    /// Note type -> field shape.
    static ref NOTE_FIELDS: HashMap<&'static str, NoteField> = {
        use Indicator1Policy::{Constant, PublishFlag};
        let general = NoteField::new("500", Constant(' '));
        HashMap::from([
            ("odd", general),
            ("dimensions", general),
            ("materialspec", general),
            ("phystech", general),
            ("physfacet", general),
            ("processinfo", general),
            ("separatedmaterial", general),
            ("accessrestrict", NoteField::new("506", PublishFlag)),
            ("abstract", NoteField::new("520", Constant('3'))),
            ("prefercite", NoteField::new("524", Constant(' '))),
            ("altformavail", NoteField::new("535", Constant('2'))),
            ("originalsloc", NoteField::new("535", Constant('1'))),
            ("userestrict", NoteField::new("540", Constant(' '))),
            ("legalstatus", NoteField::new("540", Constant(' '))),
            ("acqinfo", NoteField::new("541", PublishFlag)),
            ("relatedmaterial", NoteField::new("544", PublishFlag)),
            ("otherfindaid", NoteField::new("555", Constant('0'))),
            ("custodhist", NoteField::new("561", PublishFlag)),
            ("appraisal", NoteField::new("583", PublishFlag)),
            ("accruals", NoteField::new("584", Constant(' '))),
        ])
    };

    /// Note type -> label put in front of the note text.
    static ref NOTE_PREFIXES: HashMap<&'static str, &'static str> = HashMap::from([
        ("dimensions", "Dimensions"),
        ("physdesc", "Physical Description note"),
        ("materialspec", "Material Specific Details"),
        ("physloc", "Location of resource"),
        ("phystech", "Physical Characteristics / Technical Requirements"),
        ("physfacet", "Physical Facet"),
        ("processinfo", "Processing Information"),
        ("separatedmaterial", "Materials Separated from the Resource"),
    ]);
}

/// The full rule set: base tables plus local overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleSet {
    overrides: LocalOverrides,
}

impl RuleSet {
    /// Base rules without local conventions.
    #[must_use]
    pub const fn stock() -> Self {
        RuleSet {
            overrides: LocalOverrides::NONE,
        }
    }

    /// Base rules with the local conventions applied.
    #[must_use]
    pub const fn local() -> Self {
        RuleSet {
            overrides: LocalOverrides::BOULDER,
        }
    }

    /// Base rules with a custom override table.
    #[must_use]
    pub const fn with_overrides(overrides: LocalOverrides) -> Self {
        RuleSet { overrides }
    }

    /// The override table in effect.
    #[must_use]
    pub const fn overrides(&self) -> &LocalOverrides {
        &self.overrides
    }

    /// Field for a subject whose primary term has `term_type` and whose
    /// vocabulary is `source`.
    ///
    /// Term types without an entry export as topical subjects (650).
    #[must_use]
    pub fn subject_field_for(&self, term_type: TermType, source: &str) -> SubjectField {
        let rule = self
            .overrides
            .subject_tags
            .iter()
            .find(|(t, s, _)| *t == term_type && *s == source)
            .map(|(_, _, rule)| *rule)
            .or_else(|| BASE_SUBJECT_TAGS.get(&term_type).copied())
            .unwrap_or(SubjectTag {
                tag: "650",
                indicator2: Indicator2Rule::SourceCode,
            });

        let indicator2 = match rule.indicator2 {
            Indicator2Rule::SourceCode => source_code(source),
            Indicator2Rule::Fixed(c) => c,
        };

        SubjectField {
            tag: rule.tag,
            indicator1: if rule.tag == "630" { '0' } else { ' ' },
            indicator2,
        }
    }

    /// Subfield code for a subdivision term, or `None` when the term type
    /// cannot subdivide a heading.
    #[must_use]
    pub fn subdivision_code_for(&self, term_type: TermType) -> Option<char> {
        self.overrides
            .subdivisions
            .iter()
            .find(|(t, _)| *t == term_type)
            .map(|(_, code)| *code)
            .or_else(|| BASE_SUBDIVISIONS.get(&term_type).copied())
    }

    /// Value written to `$2` for a heading from `source`.
    #[must_use]
    pub fn subfield_2_source<'a>(&self, source: &'a str) -> &'a str {
        self.overrides
            .subfield_2_sources
            .iter()
            .find(|(from, _)| *from == source)
            .map_or(source, |(_, to)| *to)
    }
}

/// Thesaurus code for a subject or name vocabulary; `7` for anything not
/// covered by a dedicated code.
#[must_use]
pub fn source_code(source: &str) -> char {
    SOURCE_CODES
        .get(source)
        .copied()
        .unwrap_or(SOURCE_IN_SUBFIELD_2)
}

/// Field shape for a note type, or `None` when the note type is not exported.
#[must_use]
pub fn note_field_for(note_type: &str) -> Option<NoteField> {
    NOTE_FIELDS.get(note_type).copied()
}

/// Label put in front of the text of a note type, if any.
#[must_use]
pub fn note_prefix_for(note_type: &str) -> Option<&'static str> {
    NOTE_PREFIXES.get(note_type).copied()
}

/// MARC country code for an ISO 3166 country code.
///
/// `US` maps to `us_code`; every other code is lowercased.
#[must_use]
pub fn country_code_for(iso_country: &str, us_code: &str) -> String {
    if iso_country == "US" {
        us_code.to_string()
    } else {
        iso_country.to_lowercase()
    }
}

/// Field shape for a linked agent.
///
/// `first_creator` marks the creator that becomes the main entry (1XX).
/// Unknown agent types yield `None`.
#[must_use]
pub fn agent_field_for(
    agent_type: &str,
    role: AgentRole,
    first_creator: bool,
    name_order: Option<&str>,
) -> Option<AgentField> {
    let (suffix, indicator1) = match agent_type {
        "agent_person" => ("00", if name_order == Some("direct") { '0' } else { '1' }),
        "agent_family" => ("00", '3'),
        "agent_corporate_entity" | "agent_software" => ("10", '2'),
        _ => return None,
    };

    let (tag, indicator2) = match (role, first_creator, suffix) {
        (AgentRole::Creator, true, "00") => ("100", Indicator2Rule::Fixed(' ')),
        (AgentRole::Creator, true, _) => ("110", Indicator2Rule::Fixed(' ')),
        (AgentRole::Subject, _, "00") => ("600", Indicator2Rule::SourceCode),
        (AgentRole::Subject, _, _) => ("610", Indicator2Rule::SourceCode),
        (_, _, "00") => ("700", Indicator2Rule::Fixed(' ')),
        _ => ("710", Indicator2Rule::Fixed(' ')),
    };

    Some(AgentField {
        tag,
        indicator1,
        indicator2,
    })
}
