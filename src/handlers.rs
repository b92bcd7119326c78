//! Attribute handlers: one per group of archival attributes.
//!
//! A handler receives exactly the attributes its binding declares (see
//! [`driver`](crate::driver)), consults the [`RuleSet`] and writes the
//! resulting fields into a [`FieldBuilder`]. Items that cannot be mapped
//! (unresolved links, unknown enumeration values, empty text) are dropped
//! with a `debug` event; handlers never fail.

use crate::archival::{
    Agent, ArkName, Date, Extent, LangMaterial, LinkedAgent, Note, Ref, Repository, Subject,
    Term,
};
use crate::builder::FieldBuilder;
use crate::collaborators::{ArchivalNoteText, EnumerationLabels, LabelTable, NoteTextExtractor};
use crate::config::{CatalogingConventions, ExportOptions};
use crate::record::Field;
use crate::rules::{
    agent_field_for, country_code_for, note_field_for, note_prefix_for, source_code, AgentRole,
    Indicator2Rule, RuleSet, SOURCE_IN_SUBFIELD_2,
};

/// Enumeration holding the display labels of extent types.
pub const EXTENT_TYPE_ENUMERATION: &str = "extent_extent_type";

/// Second indicator for a name heading whose vocabulary is not recorded.
const SOURCE_NOT_SPECIFIED: char = '4';

/// The handlers together with the rules and collaborators they share.
///
/// # Examples
///
/// ```
/// use archmarc::builder::FieldBuilder;
/// use archmarc::handlers::HandlerSet;
/// use archmarc::ExportOptions;
///
/// let handlers = HandlerSet::new(ExportOptions::default());
/// let mut out = FieldBuilder::default();
/// handlers.handle_identifiers(&mut out, [Some("MS"), None, Some("12"), Some("")]);
///
/// let record = out.finish();
/// assert_eq!(record.call_number(), Some("MS.12"));
/// ```
pub struct HandlerSet {
    rules: RuleSet,
    conventions: CatalogingConventions,
    options: ExportOptions,
    notes: Box<dyn NoteTextExtractor>,
    labels: Box<dyn EnumerationLabels>,
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSet")
            .field("rules", &self.rules)
            .field("conventions", &self.conventions)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for HandlerSet {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

impl HandlerSet {
    /// Handlers with local rules, default conventions and the default
    /// collaborators.
    #[must_use]
    pub fn new(options: ExportOptions) -> Self {
        HandlerSet {
            rules: RuleSet::local(),
            conventions: CatalogingConventions::default(),
            options,
            notes: Box::new(ArchivalNoteText),
            labels: Box::new(LabelTable::new()),
        }
    }

    /// Use a different rule set.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Use different cataloging conventions.
    #[must_use]
    pub fn with_conventions(mut self, conventions: CatalogingConventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// Use a different note text extractor.
    #[must_use]
    pub fn with_note_extractor(mut self, notes: impl NoteTextExtractor + 'static) -> Self {
        self.notes = Box::new(notes);
        self
    }

    /// Use a different label source.
    #[must_use]
    pub fn with_labels(mut self, labels: impl EnumerationLabels + 'static) -> Self {
        self.labels = Box::new(labels);
        self
    }

    /// Rules in effect.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Export options in effect.
    #[must_use]
    pub fn options(&self) -> ExportOptions {
        self.options
    }

    /// Cataloging source (040), local code (049) and country (044).
    ///
    /// 040 is written from the cataloging conventions; the finding aid
    /// language and description rules are part of the binding but do not
    /// change it.
    pub fn handle_repository(
        &self,
        out: &mut FieldBuilder,
        repository: Option<&Ref<Repository>>,
        _finding_aid_language: Option<&str>,
        _finding_aid_description_rules: Option<&str>,
    ) {
        let Some(repository) = repository.and_then(Ref::get) else {
            tracing::debug!("repository not resolved, skipping 040/049/044");
            return;
        };

        let conventions = &self.conventions;
        let cataloging_source = out.append_or_reuse("040", ' ', ' ');
        cataloging_source.add_subfield_str('a', &conventions.cataloging_agency);
        cataloging_source.add_subfield_str('b', &conventions.cataloging_language);
        cataloging_source.add_subfield_str('e', &conventions.description_rules);
        cataloging_source.add_subfield_str('c', &conventions.cataloging_agency);

        out.append_or_reuse("049", ' ', ' ')
            .add_subfield_str('a', &conventions.local_code);

        match repository.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) => {
                let code = country_code_for(country, &conventions.us_country_code);
                out.append_or_reuse("044", ' ', ' ').add_subfield('a', code);
            },
            None => tracing::debug!("repository has no country, skipping 044"),
        }
    }

    /// Title statement (245).
    pub fn handle_title(
        &self,
        out: &mut FieldBuilder,
        title: Option<&str>,
        linked_agents: &[LinkedAgent],
        dates: &[Date],
    ) {
        let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
            tracing::debug!("no title, skipping 245");
            return;
        };

        let has_creator = linked_agents
            .iter()
            .any(|agent| agent.role == "creator" && agent.resolved.is_some());

        let inclusive = dates
            .iter()
            .find(|d| matches!(d.date_type.as_str(), "single" | "inclusive" | "range"))
            .and_then(|d| date_statement(d, true));
        let bulk = dates
            .iter()
            .find(|d| d.date_type == "bulk")
            .and_then(|d| date_statement(d, false));

        let mut field = Field::new("245".to_string(), if has_creator { '1' } else { '0' }, '0');
        if inclusive.is_some() || bulk.is_some() {
            field.add_subfield('a', format!("{title},"));
        } else {
            field.add_subfield_str('a', title);
        }
        if let Some(value) = inclusive {
            field.add_subfield('f', value);
        }
        if let Some(value) = bulk {
            field.add_subfield('g', value);
        }
        out.append(field);
    }

    /// Name headings for linked agents (1XX, 6XX, 7XX).
    ///
    /// The first resolved creator is the main entry; later creators and
    /// sources are added entries; agents in the subject role become subject
    /// headings.
    pub fn handle_agents(&self, out: &mut FieldBuilder, linked_agents: &[LinkedAgent]) {
        let mut main_entry_written = false;

        for linked in linked_agents {
            let Some(agent) = linked.resolved.as_ref() else {
                tracing::debug!(uri = ?linked.uri, "agent not resolved, skipping");
                continue;
            };
            let Some(role) = AgentRole::parse(&linked.role) else {
                tracing::debug!(role = %linked.role, "unknown agent role, skipping");
                continue;
            };

            let first_creator = role == AgentRole::Creator && !main_entry_written;
            if let Some(field) = self.agent_field(linked, agent, role, first_creator) {
                main_entry_written |= first_creator;
                out.append(field);
            }
        }
    }

    fn agent_field(
        &self,
        linked: &LinkedAgent,
        agent: &Agent,
        role: AgentRole,
        first_creator: bool,
    ) -> Option<Field> {
        let name = &agent.display_name;
        if name.sort_name.trim().is_empty() {
            tracing::debug!(agent_type = %agent.jsonmodel_type, "agent without a name, skipping");
            return None;
        }

        let Some(shape) =
            agent_field_for(&agent.jsonmodel_type, role, first_creator, name.name_order.as_deref())
        else {
            tracing::debug!(agent_type = %agent.jsonmodel_type, "unmapped agent type, skipping");
            return None;
        };

        let source = name.source.as_deref().filter(|s| !s.is_empty());
        let indicator2 = match (shape.indicator2, source) {
            (Indicator2Rule::Fixed(c), _) => c,
            (Indicator2Rule::SourceCode, Some(source)) => source_code(source),
            (Indicator2Rule::SourceCode, None) => SOURCE_NOT_SPECIFIED,
        };

        let mut field = Field::new(shape.tag.to_string(), shape.indicator1, indicator2);
        field.add_subfield_str('a', name.sort_name.trim());
        if let Some(dates) = name.dates.as_deref().filter(|d| !d.is_empty()) {
            field.add_subfield_str('d', dates);
        }
        if role == AgentRole::Subject {
            self.add_subdivisions(&mut field, &linked.terms);
        }
        if let Some(relator) = linked.relator.as_deref().filter(|r| !r.is_empty()) {
            field.add_subfield_str('4', relator);
        }
        if indicator2 == SOURCE_IN_SUBFIELD_2 {
            if let Some(source) = source {
                field.add_subfield_str('2', self.rules.subfield_2_source(source));
            }
        }
        Some(field)
    }

    /// Subject headings (6XX), one per resolved subject.
    pub fn handle_subjects(&self, out: &mut FieldBuilder, subjects: &[Ref<Subject>]) {
        for link in subjects {
            let Some(subject) = link.get() else {
                tracing::debug!(uri = ?link.uri, "subject not resolved, skipping");
                continue;
            };
            let Some((primary, subdivisions)) = subject.terms.split_first() else {
                tracing::debug!(uri = ?link.uri, "subject without terms, skipping");
                continue;
            };

            let shape = self
                .rules
                .subject_field_for(primary.term_type, &subject.source);
            let mut field = Field::new(shape.tag.to_string(), shape.indicator1, shape.indicator2);
            field.add_subfield_str('a', &primary.term);
            self.add_subdivisions(&mut field, subdivisions);
            if shape.needs_source_subfield() {
                field.add_subfield_str('2', self.rules.subfield_2_source(&subject.source));
            }
            out.append(field);
        }
    }

    fn add_subdivisions(&self, field: &mut Field, terms: &[Term]) {
        for term in terms {
            match self.rules.subdivision_code_for(term.term_type) {
                Some(code) => field.add_subfield_str(code, &term.term),
                None => tracing::debug!(
                    term = %term.term,
                    term_type = ?term.term_type,
                    tag = %field.tag,
                    "no subdivision code for term type, omitting"
                ),
            }
        }
    }

    /// Physical description (300), one per extent.
    ///
    /// Dimensions are not part of the statement.
    pub fn handle_extents(&self, out: &mut FieldBuilder, extents: &[Extent]) {
        for extent in extents {
            let number = &extent.number;
            let label = self
                .labels
                .label(EXTENT_TYPE_ENUMERATION, &extent.extent_type);
            let mut statement = format!("{number} {label}");
            if let Some(summary) = extent.container_summary.as_deref().filter(|s| !s.is_empty()) {
                statement.push_str(&format!(" ({summary})"));
            }

            out.append(
                Field::builder("300".to_string(), ' ', ' ')
                    .subfield('a', statement)
                    .build(),
            );
        }
    }

    /// Languages of the material are carried by the 008 only.
    pub fn handle_languages(&self, _out: &mut FieldBuilder, lang_materials: &[LangMaterial]) {
        tracing::trace!(count = lang_materials.len(), "languages not exported as data fields");
    }

    /// Local call number (099) from the identifier components.
    pub fn handle_identifiers(&self, out: &mut FieldBuilder, ids: [Option<&str>; 4]) {
        let parts: Vec<&str> = ids
            .into_iter()
            .flatten()
            .filter(|id| !id.is_empty())
            .collect();
        if parts.is_empty() {
            tracing::debug!("no identifier components, skipping 099");
            return;
        }

        out.append(
            Field::builder("099".to_string(), ' ', '9')
                .subfield('a', parts.join("."))
                .build(),
        );
    }

    /// Electronic location (856) of the Archival Resource Key.
    pub fn handle_ark(&self, out: &mut FieldBuilder, ark_name: Option<&ArkName>) {
        if !self.options.arks_enabled {
            return;
        }
        let Some(url) = ark_name
            .and_then(|ark| ark.current.as_deref())
            .filter(|url| !url.is_empty())
        else {
            tracing::debug!("no current ARK, skipping 856");
            return;
        };

        out.append(
            Field::builder("856".to_string(), '4', '2')
                .subfield_str('z', "Archival Resource Key:")
                .subfield_str('u', url)
                .build(),
        );
    }

    /// Notes (5XX) in input order.
    pub fn handle_notes(&self, out: &mut FieldBuilder, notes: &[Note]) {
        for note in notes {
            let Some(shape) = note_field_for(&note.note_type) else {
                tracing::debug!(note_type = %note.note_type, "note type not exported");
                continue;
            };

            let text = self
                .notes
                .extract_note_text(note, self.options.include_unpublished, true);
            if text.is_empty() {
                tracing::debug!(note_type = %note.note_type, "note has no text, skipping");
                continue;
            }

            let value = match note_prefix_for(&note.note_type) {
                Some(prefix) => format!("{prefix}: {text}"),
                None => text,
            };

            out.append(
                Field::builder(
                    shape.tag.to_string(),
                    shape.indicator1_for(note.publish),
                    shape.indicator2,
                )
                .subfield(shape.code, value)
                .build(),
            );
        }
    }
}

/// `$f`/`$g` value of a date; the expression is only used for non-bulk dates.
fn date_statement(date: &Date, use_expression: bool) -> Option<String> {
    fn nonempty(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    if use_expression {
        if let Some(expression) = nonempty(date.expression.as_deref()) {
            return Some(expression.to_string());
        }
    }

    let begin = nonempty(date.begin.as_deref());
    let end = nonempty(date.end.as_deref());
    match (begin, end) {
        (Some(begin), _) if date.date_type == "single" => Some(begin.to_string()),
        (Some(begin), Some(end)) => Some(format!("{begin} - {end}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archival::{AgentName, TermType};
    use crate::record::Record;

    fn run(handle: impl FnOnce(&HandlerSet, &mut FieldBuilder)) -> Record {
        run_with(&HandlerSet::default(), handle)
    }

    fn run_with(handlers: &HandlerSet, handle: impl FnOnce(&HandlerSet, &mut FieldBuilder)) -> Record {
        let mut out = FieldBuilder::default();
        handle(handlers, &mut out);
        out.finish()
    }

    fn subject(source: &str, terms: &[(&str, TermType)]) -> Ref<Subject> {
        Ref::resolved(Subject {
            source: source.to_string(),
            terms: terms.iter().map(|(t, ty)| Term::new(t, *ty)).collect(),
        })
    }

    fn agent(role: &str, agent_type: &str, sort_name: &str) -> LinkedAgent {
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

    fn date(date_type: &str, expression: Option<&str>, begin: &str, end: &str) -> Date {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Date {
            date_type: date_type.to_string(),
            expression: expression.map(str::to_string),
            begin: opt(begin),
            end: opt(end),
        }
    }

    #[test]
    fn test_repository_fields() {
        let repository = Ref::resolved(Repository {
            country: Some("US".to_string()),
            ..Repository::default()
        });
        let record = run(|h, out| h.handle_repository(out, Some(&repository), None, None));

        assert_eq!(record.tags(), vec!["040", "049", "044"]);
        let cataloging = record.get_field("040").unwrap();
        assert_eq!(cataloging.subfield_codes(), "abec");
        assert_eq!(cataloging.get_subfield('e'), Some("dacs"));
        assert_eq!(record.get_field("049").unwrap().get_subfield('a'), Some("CODE"));
        assert_eq!(record.get_field("044").unwrap().get_subfield('a'), Some("xxu"));
    }

    #[test]
    fn test_repository_country_lowercased_or_absent() {
        let canadian = Ref::resolved(Repository {
            country: Some("CA".to_string()),
            ..Repository::default()
        });
        let record = run(|h, out| h.handle_repository(out, Some(&canadian), None, None));
        assert_eq!(record.get_field("044").unwrap().get_subfield('a'), Some("ca"));

        let no_country = Ref::resolved(Repository::default());
        let record = run(|h, out| h.handle_repository(out, Some(&no_country), None, None));
        assert_eq!(record.tags(), vec!["040", "049"]);
    }

    #[test]
    fn test_unresolved_repository_emits_nothing() {
        let repository: Ref<Repository> = Ref::unresolved("/repositories/2");
        let record = run(|h, out| h.handle_repository(out, Some(&repository), None, None));
        assert!(record.fields.is_empty());
        let record = run(|h, out| h.handle_repository(out, None, None, None));
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_title_with_dates() {
        let agents = vec![agent("creator", "agent_person", "Smith, John")];
        let dates = vec![
            date("bulk", Some("mostly 1920s"), "1920", "1929"),
            date("inclusive", Some("1900-1950"), "1900", "1950"),
        ];
        let record = run(|h, out| h.handle_title(out, Some("Smith Papers"), &agents, &dates));

        let title = record.get_field("245").unwrap();
        assert_eq!((title.indicator1, title.indicator2), ('1', '0'));
        assert_eq!(title.get_subfield('a'), Some("Smith Papers,"));
        assert_eq!(title.get_subfield('f'), Some("1900-1950"));
        assert_eq!(title.get_subfield('g'), Some("1920 - 1929"));
    }

    #[test]
    fn test_title_without_creator_or_dates() {
        let record = run(|h, out| h.handle_title(out, Some("Letters"), &[], &[]));
        let title = record.get_field("245").unwrap();
        assert_eq!(title.indicator1, '0');
        assert_eq!(title.get_subfield('a'), Some("Letters"));
        assert_eq!(title.subfield_codes(), "a");

        let record = run(|h, out| h.handle_title(out, Some("  "), &[], &[]));
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_single_date_uses_begin() {
        let dates = vec![date("single", None, "1923", "")];
        let record = run(|h, out| h.handle_title(out, Some("Diary"), &[], &dates));
        assert_eq!(record.get_field("245").unwrap().get_subfield('f'), Some("1923"));
    }

    #[test]
    fn test_agents_main_and_added_entries() {
        let mut source = agent("source", "agent_corporate_entity", "Acme Corp.");
        source.relator = Some("dnr".to_string());
        let agents = vec![
            agent("creator", "agent_person", "Smith, John"),
            agent("creator", "agent_family", "Smith family"),
            source,
        ];
        let record = run(|h, out| h.handle_agents(out, &agents));

        assert_eq!(record.tags(), vec!["100", "700", "710"]);
        assert_eq!(record.fields[1].indicator1, '3');
        assert_eq!(record.fields[2].get_subfield('4'), Some("dnr"));
    }

    #[test]
    fn test_unresolved_creator_does_not_take_main_entry() {
        let agents = vec![
            LinkedAgent {
                role: "creator".to_string(),
                uri: Some("/agents/people/9".to_string()),
                ..LinkedAgent::default()
            },
            agent("creator", "agent_corporate_entity", "Acme Corp."),
        ];
        let record = run(|h, out| h.handle_agents(out, &agents));
        assert_eq!(record.tags(), vec!["110"]);
    }

    #[test]
    fn test_subject_agent_with_source() {
        let mut subject = agent("subject", "agent_person", "Lincoln, Abraham");
        if let Some(a) = subject.resolved.as_mut() {
            a.display_name.dates = Some("1809-1865".to_string());
            a.display_name.source = Some("local".to_string());
        }
        subject.terms = vec![Term::new("Correspondence", TermType::GenreForm)];
        let record = run(|h, out| h.handle_agents(out, &[subject]));

        let field = record.get_field("600").unwrap();
        assert_eq!(field.indicator2, '7');
        assert_eq!(field.subfield_codes(), "adv2");
        assert_eq!(field.get_subfield('2'), Some("local"));
    }

    #[test]
    fn test_subject_agent_without_source() {
        let subject = agent("subject", "agent_corporate_entity", "Acme Corp.");
        let record = run(|h, out| h.handle_agents(out, &[subject]));
        let field = record.get_field("610").unwrap();
        assert_eq!(field.indicator2, '4');
        assert!(field.get_subfield('2').is_none());
    }

    #[test]
    fn test_lcsh_topical_subject() {
        let subjects = vec![subject(
            "lcsh",
            &[("Horses", TermType::Topical), ("Colorado", TermType::Geographic)],
        )];
        let record = run(|h, out| h.handle_subjects(out, &subjects));

        let field = record.get_field("650").unwrap();
        assert_eq!((field.indicator1, field.indicator2), (' ', '0'));
        assert_eq!(field.subfield_codes(), "az");
        assert!(field.get_subfield('2').is_none());
    }

    #[test]
    fn test_built_topical_subject() {
        let subjects = vec![subject("built", &[("Norlin Library", TermType::Topical)])];
        let record = run(|h, out| h.handle_subjects(out, &subjects));

        let field = record.get_field("610").unwrap();
        assert_eq!(field.indicator2, '7');
        assert_eq!(field.get_subfield('2'), Some("local"));
    }

    #[test]
    fn test_built_topical_subject_with_stock_rules() {
        let handlers = HandlerSet::default().with_rules(RuleSet::stock());
        let subjects = vec![subject("built", &[("Norlin Library", TermType::Topical)])];
        let record = run_with(&handlers, |h, out| h.handle_subjects(out, &subjects));

        let field = record.get_field("650").unwrap();
        assert_eq!(field.get_subfield('2'), Some("built"));
    }

    #[test]
    fn test_subject_with_unmapped_subdivision() {
        let subjects = vec![subject(
            "aat",
            &[
                ("Photographs", TermType::GenreForm),
                ("Archiving", TermType::Function),
                ("1900-1950", TermType::Temporal),
            ],
        )];
        let record = run(|h, out| h.handle_subjects(out, &subjects));

        let field = record.get_field("655").unwrap();
        assert_eq!(field.subfield_codes(), "ay2");
        assert_eq!(field.get_subfield('2'), Some("aat"));
    }

    #[test]
    fn test_unresolved_and_empty_subjects_skipped() {
        let subjects = vec![Ref::unresolved("/subjects/4"), subject("lcsh", &[])];
        let record = run(|h, out| h.handle_subjects(out, &subjects));
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_extents() {
        let handlers = HandlerSet::default().with_labels(LabelTable::new().with_label(
            EXTENT_TYPE_ENUMERATION,
            "linear_feet",
            "Linear Feet",
        ));
        let extents = vec![
            Extent {
                number: "2.5".to_string(),
                extent_type: "linear_feet".to_string(),
                container_summary: Some("5 boxes".to_string()),
                dimensions: Some("30 x 40 cm".to_string()),
                portion: Some("whole".to_string()),
            },
            Extent {
                number: "3".to_string(),
                extent_type: "reels".to_string(),
                ..Extent::default()
            },
        ];
        let record = run_with(&handlers, |h, out| h.handle_extents(out, &extents));

        let values: Vec<_> = record
            .get_fields("300")
            .iter()
            .map(|f| f.get_subfield('a').unwrap_or_default().to_string())
            .collect();
        assert_eq!(values, vec!["2.5 Linear Feet (5 boxes)", "3 reels"]);
    }

    #[test]
    fn test_every_extent_gets_a_300() {
        let extents = vec![Extent::default(), Extent::default()];
        let record = run(|h, out| h.handle_extents(out, &extents));
        assert_eq!(record.tags(), vec!["300", "300"]);
    }

    #[test]
    fn test_languages_emit_nothing() {
        let langs = vec![LangMaterial::default()];
        let record = run(|h, out| h.handle_languages(out, &langs));
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_identifiers() {
        let record = run(|h, out| h.handle_identifiers(out, [Some("MS"), Some(""), Some("12"), None]));
        let field = record.get_field("099").unwrap();
        assert_eq!((field.indicator1, field.indicator2), (' ', '9'));
        assert_eq!(field.get_subfield('a'), Some("MS.12"));

        let record = run(|h, out| h.handle_identifiers(out, [None, Some(""), None, None]));
        assert!(record.fields.is_empty());

        // Only empty components are dropped; values are written as given.
        let record = run(|h, out| h.handle_identifiers(out, [Some(" MS "), Some("12"), None, None]));
        assert_eq!(record.call_number(), Some(" MS .12"));
    }

    #[test]
    fn test_ark_only_when_enabled() {
        let ark = ArkName {
            current: Some("https://n2t.net/ark:/47540/xyz".to_string()),
        };
        let record = run(|h, out| h.handle_ark(out, Some(&ark)));
        assert!(record.fields.is_empty());

        let handlers = HandlerSet::new(ExportOptions::new().with_arks(true));
        let record = run_with(&handlers, |h, out| h.handle_ark(out, Some(&ark)));
        let field = record.get_field("856").unwrap();
        assert_eq!((field.indicator1, field.indicator2), ('4', '2'));
        assert_eq!(field.subfield_codes(), "zu");
        assert_eq!(field.get_subfield('u'), ark.current.as_deref());
    }

    #[test]
    fn test_notes() {
        let notes = vec![
            Note::text("prefercite", true, "Smith Papers"),
            Note::text("accessrestrict", false, "Closed until 2030."),
            Note::text("bioghist", true, "Born in Boulder."),
            Note::text("processinfo", true, "Processed in 2019."),
            Note::text("odd", true, "   "),
        ];
        let record = run(|h, out| h.handle_notes(out, &notes));

        assert_eq!(record.tags(), vec!["524", "500"]);
        assert_eq!(record.fields[0].get_subfield('a'), Some("Smith Papers"));
        assert_eq!(
            record.fields[1].get_subfield('a'),
            Some("Processing Information: Processed in 2019.")
        );
    }

    #[test]
    fn test_prefixed_note_without_text_is_skipped() {
        let notes = vec![
            Note::text("dimensions", true, ""),
            Note::text("processinfo", true, ""),
        ];
        let record = run(|h, out| h.handle_notes(out, &notes));
        assert!(record.get_field("500").is_none());
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_extracted_note_text_is_not_trimmed() {
        struct Padded;
        impl NoteTextExtractor for Padded {
            fn extract_note_text(&self, note: &Note, _: bool, _: bool) -> String {
                format!("  {}  ", note.content.join(" "))
            }
        }

        let handlers = HandlerSet::default().with_note_extractor(Padded);
        let notes = vec![Note::text("prefercite", true, "Cite as: X")];
        let record = run_with(&handlers, |h, out| h.handle_notes(out, &notes));
        assert_eq!(
            record.get_field("524").unwrap().get_subfield('a'),
            Some("  Cite as: X  ")
        );
    }

    #[test]
    fn test_unresolved_creator_does_not_set_title_indicator() {
        let agents = vec![LinkedAgent {
            role: "creator".to_string(),
            ..LinkedAgent::default()
        }];
        let record = run(|h, out| h.handle_title(out, Some("Letters"), &agents, &[]));
        assert_eq!(record.get_field("245").unwrap().indicator1, '0');
    }

    #[test]
    fn test_unpublished_notes_when_included() {
        let handlers = HandlerSet::new(ExportOptions::new().with_unpublished(true));
        let notes = vec![Note::text("accessrestrict", false, "Closed until 2030.")];
        let record = run_with(&handlers, |h, out| h.handle_notes(out, &notes));

        let field = record.get_field("506").unwrap();
        assert_eq!(field.indicator1, '0');
    }

    #[test]
    fn test_date_statement() {
        assert_eq!(
            date_statement(&date("inclusive", None, "1900", "1950"), true),
            Some("1900 - 1950".to_string())
        );
        assert_eq!(
            date_statement(&date("bulk", Some("ignored"), "1920", ""), false),
            Some("1920".to_string())
        );
        assert_eq!(date_statement(&date("range", Some(" "), "", ""), true), None);
    }
}
