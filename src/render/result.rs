//! Rendering result with statistics.

use crate::model::{Document, DocumentNode};
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (TEI, text, etc.)
    pub content: String,

    /// Document title, if known
    pub title: Option<String>,

    /// Document language
    pub language: Option<String>,

    /// Structure statistics
    pub stats: StructureStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, doc: &Document, stats: StructureStats) -> Self {
        Self {
            content,
            title: doc.title.clone(),
            language: doc.language.clone(),
            stats,
        }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            title: None,
            language: None,
            stats: StructureStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts of the elements of a structured report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureStats {
    /// Number of body divisions
    pub division_count: u32,

    /// Number of section headings
    pub heading_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of sentences in segmented paragraphs
    pub sentence_count: u32,

    /// Number of lists
    pub list_count: u32,

    /// Number of list items
    pub item_count: u32,

    /// Number of inline figure/table references
    pub reference_count: u32,

    /// References that point to a catalog entry
    pub resolved_reference_count: u32,

    /// Number of typed notes inside divisions
    pub note_count: u32,

    /// Running notes left after deduplication
    pub running_note_count: u32,

    /// Number of persons
    pub person_count: u32,

    /// Persons with an assigned email
    pub assigned_email_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl StructureStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a whole document.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::new();
        for division in &doc.divisions {
            stats.division_count += 1;
            division.children.iter().for_each(|c| stats.add_node(c));
        }
        stats.running_note_count = doc.notes.len() as u32;
        stats.person_count = doc.persons.len() as u32;
        stats.assigned_email_count = doc.persons.iter().filter(|p| p.email.is_some()).count() as u32;
        stats.count_text(&doc.plain_text());
        stats
    }

    /// Count one node and its descendants.
    pub fn add_node(&mut self, node: &DocumentNode) {
        match node {
            DocumentNode::Division(div) => {
                self.division_count += 1;
                div.children.iter().for_each(|c| self.add_node(c));
            }
            DocumentNode::Heading(_) => self.heading_count += 1,
            DocumentNode::Paragraph(p) => {
                self.paragraph_count += 1;
                p.children.iter().for_each(|c| self.add_node(c));
            }
            DocumentNode::Sentence(s) => {
                self.sentence_count += 1;
                s.children.iter().for_each(|c| self.add_node(c));
            }
            DocumentNode::List(list) => {
                self.list_count += 1;
                list.children.iter().for_each(|c| self.add_node(c));
            }
            DocumentNode::ListItem(_) => self.item_count += 1,
            DocumentNode::InlineRef(r) => {
                self.reference_count += 1;
                if r.target.is_some() {
                    self.resolved_reference_count += 1;
                }
            }
            DocumentNode::Note(_) => self.note_count += 1,
            DocumentNode::TextRun(_) => {}
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &StructureStats) {
        self.division_count += other.division_count;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.sentence_count += other.sentence_count;
        self.list_count += other.list_count;
        self.item_count += other.item_count;
        self.reference_count += other.reference_count;
        self.resolved_reference_count += other.resolved_reference_count;
        self.note_count += other.note_count;
        self.running_note_count += other.running_note_count;
        self.person_count += other.person_count;
        self.assigned_email_count += other.assigned_email_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Division, Heading, InlineRef, Paragraph, Person, RefType};

    #[test]
    fn test_stats_count_text() {
        let mut stats = StructureStats::new();
        stats.count_text("Patient presents with fever.");
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.char_count, 25);
    }

    #[test]
    fn test_stats_from_document() {
        let mut p = Paragraph::with_text("See ");
        let mut r = InlineRef::new(RefType::Figure, "Fig. 1");
        r.target = Some("#fig_0".to_string());
        p.add_node(DocumentNode::InlineRef(r));
        p.add_node(DocumentNode::InlineRef(InlineRef::new(RefType::Table, "Tab. 9")));

        let mut div = Division::new();
        div.push(DocumentNode::Heading(Heading::new("Diagnosis", 1)));
        div.push(DocumentNode::Paragraph(p));

        let mut doc = Document::new();
        doc.divisions.push(div);
        doc.persons.push(Person::new("Jean", "Dupont"));

        let stats = StructureStats::from_document(&doc);
        assert_eq!(stats.division_count, 1);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.reference_count, 2);
        assert_eq!(stats.resolved_reference_count, 1);
        assert_eq!(stats.person_count, 1);
        assert_eq!(stats.assigned_email_count, 0);
    }

    #[test]
    fn test_stats_merge() {
        let mut a = StructureStats {
            paragraph_count: 5,
            sentence_count: 2,
            ..Default::default()
        };
        let b = StructureStats {
            paragraph_count: 3,
            sentence_count: 1,
            person_count: 4,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.paragraph_count, 8);
        assert_eq!(a.sentence_count, 3);
        assert_eq!(a.person_count, 4);
    }

    #[test]
    fn test_render_result_content_only() {
        let result = RenderResult::content_only("<TEI/>".to_string());
        assert_eq!(result.content_len(), 6);
        assert_eq!(result.stats, StructureStats::default());
    }
}
