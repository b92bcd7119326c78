//! Common test helpers and fixtures shared across the test suite.

#![allow(dead_code)]

use archmarc::archival::{
    Agent, AgentName, ArchivalObject, ArkName, Date, Extent, LinkedAgent, Note, Ref, Repository,
    Subject, Term, TermType,
};
use archmarc::{ExportOptions, HandlerSet, LabelTable, MarcExporter};

/// A resolved subject from `source` with the given terms.
pub fn subject(source: &str, terms: &[(&str, TermType)]) -> Ref<Subject> {
    Ref::resolved(Subject {
        source: source.to_string(),
        terms: terms
            .iter()
            .map(|(term, term_type)| Term::new(term, *term_type))
            .collect(),
    })
}

/// A resolved repository in `country`.
pub fn repository(country: &str) -> Ref<Repository> {
    Ref::resolved(Repository {
        repo_code: Some("SPEC".to_string()),
        name: Some("Special Collections and Archives".to_string()),
        country: Some(country.to_string()),
        ..Repository::default()
    })
}

/// A resolved linked agent.
pub fn linked_agent(role: &str, agent_type: &str, sort_name: &str) -> LinkedAgent {
    LinkedAgent {
        role: role.to_string(),
        resolved: Some(Agent {
            jsonmodel_type: agent_type.to_string(),
            display_name: AgentName {
                sort_name: sort_name.to_string(),
                ..AgentName::default()
            },
        }),
        ..LinkedAgent::default()
    }
}

/// An empty resource at `collection` level.
pub fn bare_resource() -> ArchivalObject {
    ArchivalObject {
        jsonmodel_type: Some("resource".to_string()),
        level: Some("collection".to_string()),
        ..ArchivalObject::default()
    }
}

/// A resource exercising every handler.
pub fn create_realistic_resource() -> ArchivalObject {
    ArchivalObject {
        repository: Some(repository("US")),
        title: Some("Smith Family Papers".to_string()),
        publish: Some(true),
        id_0: Some("COU".to_string()),
        id_1: Some("1234".to_string()),
        id_2: Some(String::new()),
        linked_agents: vec![
            linked_agent("creator", "agent_family", "Smith family"),
            linked_agent("subject", "agent_person", "Smith, Jane"),
        ],
        dates: vec![Date {
            date_type: "inclusive".to_string(),
            expression: Some("1890-1955".to_string()),
            begin: Some("1890".to_string()),
            end: Some("1955".to_string()),
        }],
        subjects: vec![
            subject("lcsh", &[("Horses", TermType::Topical)]),
            subject("built", &[("Norlin Library", TermType::Topical)]),
            subject(
                "lcsh",
                &[
                    ("Ranching", TermType::Topical),
                    ("Colorado", TermType::Geographic),
                    ("History", TermType::Topical),
                ],
            ),
        ],
        extents: vec![Extent {
            number: "2.5".to_string(),
            extent_type: "linear_feet".to_string(),
            container_summary: Some("5 boxes".to_string()),
            dimensions: Some("40 x 30 cm".to_string()),
            portion: Some("whole".to_string()),
        }],
        notes: vec![
            Note::text("abstract", true, "Letters and diaries of a ranching family."),
            Note::text("prefercite", true, "Smith Papers"),
            Note::text("accessrestrict", true, "Open for research."),
            Note::text("processinfo", false, "Processed by student staff."),
        ],
        ark_name: Some(ArkName {
            current: Some("https://n2t.net/ark:/47540/k1".to_string()),
        }),
        system_mtime: Some("2024-03-15T10:20:30Z".to_string()),
        ..bare_resource()
    }
}

/// Labels used by the fixtures.
pub fn test_labels() -> LabelTable {
    LabelTable::new().with_label("extent_extent_type", "linear_feet", "Linear Feet")
}

/// An exporter with the given options and the fixture labels.
pub fn create_exporter(options: ExportOptions) -> MarcExporter {
    MarcExporter::new(HandlerSet::new(options).with_labels(test_labels()))
        .expect("built-in binding tables are valid")
}
