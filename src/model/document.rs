//! Document-level types.

use super::{
    CatalogEntry, Division, DocumentNode, InlineRef, LabeledToken, NoteBlock, NoteRecord,
    Paragraph, Person,
};
use serde::{Deserialize, Serialize};

/// Everything the structuring pipeline needs for one report.
///
/// This is the JSON shape accepted by the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportInput {
    /// Labeled body tokens in reading order
    pub tokens: Vec<LabeledToken>,

    /// Figure catalog for marker resolution
    #[serde(default)]
    pub figures: Vec<CatalogEntry>,

    /// Table catalog for marker resolution
    #[serde(default)]
    pub tables: Vec<CatalogEntry>,

    /// Running header/footer blocks, one per page and placement
    #[serde(default)]
    pub notes: Vec<NoteBlock>,

    /// Persons extracted from the report header
    #[serde(default)]
    pub persons: Vec<Person>,

    /// Sanitized emails extracted from the report header
    #[serde(default)]
    pub emails: Vec<String>,

    /// Document language (ISO 639-1)
    #[serde(default)]
    pub language: Option<String>,

    /// Document title from the header model
    #[serde(default)]
    pub title: Option<String>,
}

impl ReportInput {
    /// Create an input holding only body tokens.
    pub fn from_tokens(tokens: Vec<LabeledToken>) -> Self {
        Self {
            tokens,
            ..Default::default()
        }
    }
}

/// A structured report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document language
    pub language: Option<String>,

    /// Document title
    pub title: Option<String>,

    /// Body divisions, none of them empty
    pub divisions: Vec<Division>,

    /// Deduplicated running notes
    pub notes: Vec<NoteRecord>,

    /// Persons with their assigned emails
    pub persons: Vec<Person>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the body has no division.
    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }

    /// Iterate over all paragraphs directly under divisions.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.divisions.iter().flat_map(|d| d.paragraphs())
    }

    /// Collect every inline reference in document order.
    pub fn inline_refs(&self) -> Vec<&InlineRef> {
        self.divisions
            .iter()
            .flat_map(|d| d.children.iter())
            .flat_map(DocumentNode::inline_refs)
            .collect()
    }

    /// Get plain text content of the body and running notes.
    pub fn plain_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(ref title) = self.title {
            parts.push(title.clone());
        }
        parts.extend(
            self.divisions
                .iter()
                .map(|d| d.plain_text())
                .filter(|t| !t.is_empty()),
        );
        parts.extend(self.notes.iter().map(|n| n.text.clone()));
        parts.join("\n\n")
    }
}
