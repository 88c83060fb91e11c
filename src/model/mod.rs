//! Document model types for structured report representation.
//!
//! This module defines the input tokens produced by the tagger, the
//! owned document tree built from them, and the side entities (catalogs,
//! persons, running notes) that travel with a report.

mod document;
mod entity;
mod label;
mod node;
mod token;

pub use document::{Document, ReportInput};
pub use entity::{CatalogEntry, NoteBlock, NotePlace, NoteRecord, Person};
pub use label::Label;
pub use node::{
    Division, DocumentNode, Heading, InlineRef, List, ListItem, Note, NoteKind, Paragraph,
    RefType, Sentence, TextRun,
};
pub use token::{coords_string, merge_boxes, BoundingBox, LabeledToken, OffsetPosition};
