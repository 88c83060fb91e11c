//! The closed label taxonomy of the full-text model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking the first token of a labeled entity.
pub const BEGIN_PREFIX: &str = "I-";

/// Labels emitted by the full-text tagger that the assembler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Document title
    Title,
    /// Level-1 section heading
    Section,
    /// Level-2 section heading
    SubSection,
    /// List item
    Item,
    /// Paragraph text
    Paragraph,
    /// Figure block
    Figure,
    /// Table block
    Table,
    /// Inline call-out to a figure
    FigureMarker,
    /// Inline call-out to a table
    TableMarker,
    /// Patient mention
    Patient,
    /// Medical staff mention
    Medic,
    /// Anything else the model recognizes
    Other,
}

impl Label {
    /// All labels of the taxonomy.
    pub const ALL: [Label; 12] = [
        Label::Title,
        Label::Section,
        Label::SubSection,
        Label::Item,
        Label::Paragraph,
        Label::Figure,
        Label::Table,
        Label::FigureMarker,
        Label::TableMarker,
        Label::Patient,
        Label::Medic,
        Label::Other,
    ];

    /// Parse a label identifier. The tagger's `I-` begin prefix is ignored.
    pub fn from_identifier(identifier: &str) -> Option<Label> {
        let (_, plain) = Label::split_begin(identifier);
        Label::ALL
            .iter()
            .copied()
            .find(|label| label.identifier() == plain)
    }

    /// Split the `I-` begin prefix off an identifier.
    ///
    /// Returns whether the prefix was present and the bare identifier.
    pub fn split_begin(identifier: &str) -> (bool, &str) {
        match identifier.strip_prefix(BEGIN_PREFIX) {
            Some(plain) => (true, plain),
            None => (false, identifier),
        }
    }

    /// The identifier used by the tagger.
    pub fn identifier(&self) -> &'static str {
        match self {
            Label::Title => "<title>",
            Label::Section => "<section>",
            Label::SubSection => "<subsection>",
            Label::Item => "<item>",
            Label::Paragraph => "<paragraph>",
            Label::Figure => "<figure>",
            Label::Table => "<table>",
            Label::FigureMarker => "<figure_marker>",
            Label::TableMarker => "<table_marker>",
            Label::Patient => "<patient>",
            Label::Medic => "<medic>",
            Label::Other => "<other>",
        }
    }

    /// Check if this is an inline call-out label.
    pub fn is_marker(&self) -> bool {
        matches!(self, Label::FigureMarker | Label::TableMarker)
    }

    /// Check if this label interrupts a paragraph without closing it.
    pub fn is_float(&self) -> bool {
        matches!(self, Label::Figure | Label::Table)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_roundtrip() {
        for label in Label::ALL {
            assert_eq!(Label::from_identifier(label.identifier()), Some(label));
        }
    }

    #[test]
    fn test_begin_prefix() {
        assert_eq!(Label::from_identifier("I-<section>"), Some(Label::Section));
        assert_eq!(Label::split_begin("I-<item>"), (true, "<item>"));
        assert_eq!(Label::split_begin("<item>"), (false, "<item>"));
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(Label::from_identifier("<equation>"), None);
        assert_eq!(Label::from_identifier("section"), None);
    }

    #[test]
    fn test_marker_and_float() {
        assert!(Label::FigureMarker.is_marker());
        assert!(!Label::Figure.is_marker());
        assert!(Label::Table.is_float());
        assert!(!Label::Paragraph.is_float());
    }
}
