//! Token-level types produced by the upstream tagger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token of the report as labeled by the sequence tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledToken {
    /// The text span of the token (may be whitespace)
    pub text: String,

    /// Label identifier assigned by the tagger (e.g. `<paragraph>`)
    pub label: String,

    /// Position of the token in the original tokenization
    #[serde(default)]
    pub index: usize,

    /// Page geometry of the token, if known
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

impl LabeledToken {
    /// Create a token without geometry.
    pub fn new(text: impl Into<String>, label: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            index,
            bbox: None,
        }
    }

    /// Attach a bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Check if the token carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if the token is only whitespace (spaces, newlines).
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Rectangle on a page, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Page number (1-indexed)
    pub page: u32,
    /// Left coordinate
    pub x: f64,
    /// Top coordinate
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(page: u32, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            page,
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box covering both boxes. Both must be on the same page.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = (self.x + self.width).max(other.x + other.width);
        let y2 = (self.y + self.height).max(other.y + other.height);
        BoundingBox::new(self.page, x1, y1, x2 - x1, y2 - y1)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{:.2},{:.2},{:.2},{:.2}",
            self.page, self.x, self.y, self.width, self.height
        )
    }
}

/// Merge token boxes into one box per run of consecutive tokens on the same page.
pub fn merge_boxes<'a, I>(boxes: I) -> Vec<BoundingBox>
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    let mut merged: Vec<BoundingBox> = Vec::new();
    for bbox in boxes {
        match merged.last_mut() {
            Some(last) if last.page == bbox.page => *last = last.union(bbox),
            _ => merged.push(*bbox),
        }
    }
    merged
}

/// Render boxes as a `coords` attribute value.
pub fn coords_string(boxes: &[BoundingBox]) -> String {
    boxes
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

/// Half-open byte span `[start, end)` into a flattened string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffsetPosition {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl OffsetPosition {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if `offset` falls strictly inside the span (not on its edges).
    pub fn strictly_contains(&self, offset: usize) -> bool {
        offset > self.start && offset < self.end
    }

    /// Check if two spans share at least one byte.
    pub fn overlaps(&self, other: &OffsetPosition) -> bool {
        self.start < other.end && other.start < self.end
    }
}
