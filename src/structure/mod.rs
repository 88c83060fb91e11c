//! Structuring pipeline: labeled tokens to a document tree.
//!
//! The stages run in order on a single report:
//!
//! 1. [`cluster_tokens`] groups consecutive tokens sharing a label.
//! 2. [`TreeAssembler`] builds divisions, headings, paragraphs, lists,
//!    notes and inline references, segmenting paragraphs into sentences
//!    as they are closed.
//! 3. [`reconnect_paragraphs`] merges paragraphs cut by a float.
//! 4. [`deduplicate_notes`] keeps one copy of each running header/footer.
//! 5. [`assign_emails`](crate::email::assign_emails) attaches emails to persons.

mod assembler;
mod cluster;
mod context;
mod notes;
mod numbering;
mod options;
mod reconnect;
mod reference;
mod sentence;

pub use assembler::TreeAssembler;
pub use cluster::{cluster_tokens, Cluster};
pub use context::ProcessingContext;
pub use notes::deduplicate_notes;
pub use numbering::{extract_section_number, SectionNumber};
pub use options::{CoordinateTarget, ErrorMode, ProcessingOptions};
pub use reconnect::reconnect_paragraphs;
pub use reference::{find_entry, resolve_marker};
pub use sentence::{RuleSentenceDetector, SentenceDetector, SentenceSegmenter};

use log::debug;
use uuid::Uuid;

use crate::email::assign_emails;
use crate::error::{Error, Result};
use crate::model::{CatalogEntry, Document, ReportInput};
use crate::text::normalize_field;

/// Random `xml:id` value: an underscore and seven hex digits.
pub(crate) fn random_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("_{}", &uuid[..7])
}

fn check_catalog(kind: &str, catalog: &[CatalogEntry]) -> Result<()> {
    match catalog.iter().position(|entry| entry.id.trim().is_empty()) {
        Some(pos) => Err(Error::InvalidInput(format!(
            "{} catalog entry {} has no identifier",
            kind, pos
        ))),
        None => Ok(()),
    }
}

/// Run the whole pipeline on one report.
///
/// Missing collaborators are reported before any work is done.
pub fn structure_report(
    input: &ReportInput,
    context: &ProcessingContext,
    options: &ProcessingOptions,
) -> Result<Document> {
    let detector = if options.segment_sentences {
        Some(context.sentence_detector()?)
    } else {
        None
    };
    check_catalog("figure", &input.figures)?;
    check_catalog("table", &input.tables)?;
    let needs_assignment = !input.persons.is_empty() && !input.emails.is_empty();
    let name_variants = if needs_assignment {
        Some(context.name_variants()?)
    } else {
        None
    };

    let language = input
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(options.default_language.as_str())
        .to_string();

    let segmenter = detector.map(|detector| {
        SentenceSegmenter::new(detector, &language)
            .with_coords(options.wants_coordinates(CoordinateTarget::Sentence))
            .with_ids(options.generate_ids)
    });

    let clusters = cluster_tokens(input.tokens.iter().cloned());
    debug!("Assembling {} clusters", clusters.len());
    let mut divisions =
        TreeAssembler::new(options, segmenter, &input.figures, &input.tables).assemble(clusters)?;

    if options.reconnect_paragraphs {
        divisions.iter_mut().for_each(reconnect_paragraphs);
    }

    let mut notes = deduplicate_notes(input.notes.clone(), options.generate_ids);
    if options.wants_coordinates(CoordinateTarget::Note) {
        for note in &mut notes {
            note.coords = note.token_boxes();
        }
    }

    let mut persons = input.persons.clone();
    if let Some(generator) = name_variants {
        assign_emails(&mut persons, &input.emails, generator);
    }

    debug!(
        "Structured report: {} divisions, {} running notes",
        divisions.len(),
        notes.len()
    );

    Ok(Document {
        title: input
            .title
            .as_deref()
            .map(normalize_field)
            .filter(|t| !t.is_empty()),
        language: Some(language),
        divisions,
        notes,
        persons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LabeledToken;

    #[test]
    fn test_random_id_format() {
        let id = random_id();
        assert_eq!(id.len(), 8);
        assert!(id.starts_with('_'));
        assert!(id[1..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(random_id(), random_id());
    }

    #[test]
    fn test_missing_detector_fails_at_setup() {
        let input = ReportInput::from_tokens(vec![LabeledToken::new("Texte.", "<paragraph>", 0)]);
        let options = ProcessingOptions::new().with_sentences(true);
        let err = structure_report(&input, &ProcessingContext::empty(), &options).unwrap_err();
        assert!(matches!(err, Error::MissingResource(_)));

        // Without segmentation nothing is needed.
        let doc = structure_report(&input, &ProcessingContext::empty(), &ProcessingOptions::new())
            .unwrap();
        assert_eq!(doc.divisions.len(), 1);
    }

    #[test]
    fn test_language_fallback() {
        let mut input = ReportInput::default();
        let doc = structure_report(&input, &ProcessingContext::new(), &ProcessingOptions::new())
            .unwrap();
        assert_eq!(doc.language.as_deref(), Some("fr"));
        assert!(doc.is_empty());

        input.language = Some("en".to_string());
        let doc = structure_report(&input, &ProcessingContext::new(), &ProcessingOptions::new())
            .unwrap();
        assert_eq!(doc.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_catalog_entry_without_id_rejected() {
        let mut input = ReportInput::from_tokens(vec![LabeledToken::new("Texte.", "<paragraph>", 0)]);
        input.tables = vec![CatalogEntry::new(" ", Some("Tableau 1"))];
        let err = structure_report(&input, &ProcessingContext::new(), &ProcessingOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.starts_with("table")));
    }
}
