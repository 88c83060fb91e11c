//! Catalog entries, persons and running notes.

use super::{merge_boxes, BoundingBox, LabeledToken};
use serde::{Deserialize, Serialize};

/// A figure or table that inline markers may point to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Identifier used to build the reference target
    pub id: String,

    /// Human-readable label (e.g. "Figure 2")
    #[serde(default)]
    pub label: Option<String>,
}

impl CatalogEntry {
    /// Create an entry.
    pub fn new(id: impl Into<String>, label: Option<&str>) -> Self {
        Self {
            id: id.into(),
            label: label.map(str::to_string),
        }
    }
}

/// A named person extracted from the report (medic, patient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email assigned by the email assigner
    #[serde(default)]
    pub email: Option<String>,
}

impl Person {
    /// Create a person without email.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
        }
    }

    /// Full name, first name first.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Where a running note sits on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotePlace {
    /// Page header
    Headnote,
    /// Page footer
    Footnote,
    /// Left margin
    Leftnote,
    /// Right margin
    Rightnote,
}

impl NotePlace {
    /// Value of the TEI `place` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotePlace::Headnote => "headnote",
            NotePlace::Footnote => "footnote",
            NotePlace::Leftnote => "leftnote",
            NotePlace::Rightnote => "rightnote",
        }
    }
}

/// One running note block of one page, as segmented upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteBlock {
    /// Placement on the page
    pub place: NotePlace,

    /// Tokens of the block
    pub tokens: Vec<LabeledToken>,
}

impl NoteBlock {
    /// Create a block from its tokens.
    pub fn new(place: NotePlace, tokens: Vec<LabeledToken>) -> Self {
        Self { place, tokens }
    }
}

/// A running note kept after deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Normalized note text, leading ordinal removed
    pub text: String,

    /// Leading ordinal (`n` attribute)
    pub number: Option<u32>,

    /// Placement on the page
    pub place: NotePlace,

    /// Random identifier, when requested
    pub id: Option<String>,

    /// Geometry of the note text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coords: Vec<BoundingBox>,

    /// Tokens left after the ordinal was consumed
    #[serde(skip)]
    pub tokens: Vec<LabeledToken>,
}

impl NoteRecord {
    /// Per-page union of the remaining token boxes.
    pub fn token_boxes(&self) -> Vec<BoundingBox> {
        merge_boxes(self.tokens.iter().filter_map(|t| t.bbox.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_full_name() {
        assert_eq!(Person::new("Jean", "Dupont").full_name(), "Jean Dupont");
        assert_eq!(Person::new("", "Dupont").full_name(), "Dupont");
    }

    #[test]
    fn test_note_place_serde() {
        let json = serde_json::to_string(&NotePlace::Footnote).unwrap();
        assert_eq!(json, "\"footnote\"");
    }
}
