//! Tree node types of a structured report.

use super::{BoundingBox, LabeledToken};
use serde::{Deserialize, Serialize};

/// A node of the document tree.
///
/// Children are owned: attaching a node to a new parent moves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNode {
    /// Section container
    Division(Division),
    /// Section heading
    Heading(Heading),
    /// Paragraph of running text
    Paragraph(Paragraph),
    /// Sentence inside a segmented paragraph
    Sentence(Sentence),
    /// List of items
    List(List),
    /// Item of a list
    ListItem(ListItem),
    /// Inline reference to a figure, table or bibliographic entry
    InlineRef(InlineRef),
    /// Typed note leaf
    Note(Note),
    /// Plain text
    TextRun(TextRun),
}

impl DocumentNode {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        DocumentNode::TextRun(TextRun::new(text))
    }

    /// Get plain text content of the node and its descendants.
    pub fn plain_text(&self) -> String {
        match self {
            DocumentNode::Division(div) => div.plain_text(),
            DocumentNode::Heading(head) => head.text.clone(),
            DocumentNode::Paragraph(p) => p.plain_text(),
            DocumentNode::Sentence(s) => concat_text(&s.children),
            DocumentNode::List(list) => list
                .children
                .iter()
                .map(|c| c.plain_text())
                .collect::<Vec<_>>()
                .join("\n"),
            DocumentNode::ListItem(item) => item.text.clone(),
            DocumentNode::InlineRef(r) => r.text.clone(),
            DocumentNode::Note(note) => note.text.clone(),
            DocumentNode::TextRun(run) => run.text.clone(),
        }
    }

    /// Borrow the node as a paragraph.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            DocumentNode::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Mutably borrow the node as a paragraph.
    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            DocumentNode::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Collect every inline reference below this node, in document order.
    pub fn inline_refs(&self) -> Vec<&InlineRef> {
        let mut refs = Vec::new();
        collect_refs(self, &mut refs);
        refs
    }
}

fn collect_refs<'a>(node: &'a DocumentNode, out: &mut Vec<&'a InlineRef>) {
    match node {
        DocumentNode::InlineRef(r) => out.push(r),
        DocumentNode::Division(div) => div.children.iter().for_each(|c| collect_refs(c, out)),
        DocumentNode::Paragraph(p) => p.children.iter().for_each(|c| collect_refs(c, out)),
        DocumentNode::Sentence(s) => s.children.iter().for_each(|c| collect_refs(c, out)),
        DocumentNode::List(l) => l.children.iter().for_each(|c| collect_refs(c, out)),
        _ => {}
    }
}

fn concat_text(nodes: &[DocumentNode]) -> String {
    nodes.iter().map(|n| n.plain_text()).collect()
}

/// A section container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Division {
    /// Random identifier, when requested
    pub id: Option<String>,

    /// Child nodes in document order
    pub children: Vec<DocumentNode>,
}

impl Division {
    /// Create a new empty division.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child and return its index.
    pub fn push(&mut self, node: DocumentNode) -> usize {
        self.children.push(node);
        self.children.len() - 1
    }

    /// Check if the division has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The heading of the division, if it starts with one.
    pub fn heading(&self) -> Option<&Heading> {
        match self.children.first() {
            Some(DocumentNode::Heading(h)) => Some(h),
            _ => None,
        }
    }

    /// Iterate over the paragraphs directly under the division.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.children.iter().filter_map(DocumentNode::as_paragraph)
    }

    /// Get plain text content of the division.
    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .map(|c| c.plain_text())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A section heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1 = section, 2 = sub-section)
    pub level: u8,

    /// Section number extracted from the heading text (e.g. "1.2.")
    pub number: Option<String>,

    /// Heading text without its number
    pub text: String,

    /// Random identifier, when requested
    pub id: Option<String>,

    /// Geometry of the heading
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coords: Vec<BoundingBox>,
}

impl Heading {
    /// Create a heading without a number.
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            level: level.clamp(1, 6),
            number: None,
            text: text.into(),
            id: None,
            coords: Vec::new(),
        }
    }
}

/// A paragraph of mixed text and inline references.
///
/// Once segmented, its children are sentences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Random identifier, when requested
    pub id: Option<String>,

    /// Text runs and inline references, or sentences after segmentation
    pub children: Vec<DocumentNode>,

    /// Tokens backing the paragraph content, for geometry mapping
    #[serde(skip)]
    pub tokens: Vec<LabeledToken>,

    /// Set when a figure or table interrupted the paragraph
    #[serde(skip)]
    pub open_break: bool,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Append text, extending the trailing text run if there is one.
    pub fn add_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(DocumentNode::TextRun(run)) = self.children.last_mut() {
            run.text.push_str(&text);
        } else {
            self.children.push(DocumentNode::text(text));
        }
    }

    /// Append a node.
    pub fn add_node(&mut self, node: DocumentNode) {
        self.children.push(node);
    }

    /// Check if the paragraph content ends with whitespace (or is empty).
    pub fn ends_with_whitespace(&self) -> bool {
        match self.children.last() {
            None => true,
            Some(DocumentNode::TextRun(run)) => run.text.ends_with(char::is_whitespace),
            Some(_) => false,
        }
    }

    /// Check if the paragraph has been split into sentences.
    pub fn is_segmented(&self) -> bool {
        !self.children.is_empty()
            && self
                .children
                .iter()
                .all(|c| matches!(c, DocumentNode::Sentence(_)))
    }

    /// Iterate over sentences of a segmented paragraph.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.children.iter().filter_map(|c| match c {
            DocumentNode::Sentence(s) => Some(s),
            _ => None,
        })
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        concat_text(&self.children)
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() || self.plain_text().trim().is_empty()
    }
}

/// A sentence of a segmented paragraph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentence {
    /// Random identifier, when requested
    pub id: Option<String>,

    /// Text runs and inline references
    pub children: Vec<DocumentNode>,

    /// Geometry of the sentence
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coords: Vec<BoundingBox>,
}

impl Sentence {
    /// Get plain text content of the sentence.
    pub fn plain_text(&self) -> String {
        concat_text(&self.children)
    }
}

/// A list of items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct List {
    /// Random identifier, when requested
    pub id: Option<String>,

    /// List items
    pub children: Vec<DocumentNode>,
}

impl List {
    /// Append an item.
    pub fn add_item(&mut self, text: impl Into<String>) {
        self.children
            .push(DocumentNode::ListItem(ListItem { text: text.into() }));
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the list has no item.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// An item of a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    /// Item text
    pub text: String,
}

/// Kind of target an inline reference points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    /// A figure
    Figure,
    /// A table
    Table,
    /// A bibliographic entry
    Bibliographic,
}

impl RefType {
    /// Value of the TEI `type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefType::Figure => "figure",
            RefType::Table => "table",
            RefType::Bibliographic => "bibr",
        }
    }

    /// Prefix of the target identifier.
    pub fn target_prefix(&self) -> &'static str {
        match self {
            RefType::Figure => "#fig_",
            RefType::Table => "#tab_",
            RefType::Bibliographic => "#b",
        }
    }
}

/// An inline reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineRef {
    /// What the reference points to
    pub ref_type: RefType,

    /// Literal marker text
    pub text: String,

    /// Target identifier (`#fig_3`), when resolved
    pub target: Option<String>,

    /// Geometry of the marker
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coords: Vec<BoundingBox>,
}

impl InlineRef {
    /// Create an unresolved reference.
    pub fn new(ref_type: RefType, text: impl Into<String>) -> Self {
        Self {
            ref_type,
            text: text.into(),
            target: None,
            coords: Vec::new(),
        }
    }
}

/// Kind of typed note leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Document title
    Title,
    /// Patient mention
    Patient,
    /// Medical staff mention
    Medic,
    /// Other note
    Other,
}

impl NoteKind {
    /// Value of the TEI `type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Title => "title",
            NoteKind::Patient => "patient",
            NoteKind::Medic => "medic",
            NoteKind::Other => "other",
        }
    }
}

/// A typed note leaf inside a division.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Note kind
    pub kind: NoteKind,

    /// Note text
    pub text: String,

    /// Random identifier, when requested
    pub id: Option<String>,
}

/// A run of plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,
}

impl TextRun {
    /// Create a new text run.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_add_text_merges_runs() {
        let mut p = Paragraph::new();
        p.add_text("Hello ");
        p.add_text("world");
        assert_eq!(p.children.len(), 1);
        assert_eq!(p.plain_text(), "Hello world");
    }

    #[test]
    fn test_paragraph_with_ref() {
        let mut p = Paragraph::with_text("See ");
        p.add_node(DocumentNode::InlineRef(InlineRef::new(RefType::Figure, "Fig. 1")));
        p.add_text(" below.");
        assert_eq!(p.plain_text(), "See Fig. 1 below.");
        assert_eq!(p.children.len(), 3);
        assert!(!p.ends_with_whitespace());
    }

    #[test]
    fn test_division_plain_text() {
        let mut div = Division::new();
        div.push(DocumentNode::Heading(Heading::new("Diagnosis", 1)));
        div.push(DocumentNode::Paragraph(Paragraph::with_text("Fever.")));
        assert_eq!(div.plain_text(), "Diagnosis\n\nFever.");
        assert_eq!(div.heading().map(|h| h.text.as_str()), Some("Diagnosis"));
    }

    #[test]
    fn test_inline_refs_collected_in_order() {
        let mut p = Paragraph::new();
        p.add_node(DocumentNode::InlineRef(InlineRef::new(RefType::Figure, "Fig. 1")));
        p.add_node(DocumentNode::InlineRef(InlineRef::new(RefType::Table, "Tab. 2")));
        let node = DocumentNode::Paragraph(p);
        let refs = node.inline_refs();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[1].ref_type, RefType::Table);
    }

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(Heading::new("x", 9).level, 6);
    }
}
