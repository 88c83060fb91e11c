//! # medstruct
//!
//! Structuring of labeled medical report tokens into TEI documents.
//!
//! An upstream sequence tagger assigns a label (`<section>`, `<paragraph>`,
//! `<figure_marker>`, ...) to every layout token of a report. This library
//! turns that flat sequence into a document tree of divisions, headings,
//! paragraphs, sentences, lists, notes and figure/table references, and
//! serializes it as TEI XML, JSON or plain text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use medstruct::{parse_input_file, process_document, render, ProcessingContext, ProcessingOptions};
//!
//! fn main() -> medstruct::Result<()> {
//!     let input = parse_input_file("report.json")?;
//!
//!     let context = ProcessingContext::new();
//!     let options = ProcessingOptions::new().with_sentences(true);
//!     let doc = process_document(&input, &context, &options)?;
//!
//!     let tei = render::to_tei(&doc, &render::RenderOptions::default())?;
//!     println!("{}", tei);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Tree assembly**: sections, sub-sections, paragraphs, lists and notes
//! - **Sentence segmentation**: pluggable detector, references never split
//! - **Reference resolution**: figure/table markers linked to their catalog
//! - **Running notes**: headers and footers deduplicated across pages
//! - **Email assignment**: header emails matched to persons by name
//! - **Parallel processing**: Uses Rayon for batches of reports

pub mod email;
pub mod error;
pub mod model;
pub mod render;
pub mod structure;
pub mod text;

// Re-export commonly used types
pub use email::{assign_emails, DefaultNameVariants, NameVariantGenerator};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, CatalogEntry, Division, Document, DocumentNode, Heading, InlineRef, Label,
    LabeledToken, List, Note, NoteBlock, NoteKind, NotePlace, NoteRecord, OffsetPosition,
    Paragraph, Person, RefType, ReportInput, Sentence, TextRun,
};
pub use render::{JsonFormat, RenderOptions, RenderResult, StructureStats};
pub use structure::{
    CoordinateTarget, ErrorMode, ProcessingContext, ProcessingOptions, RuleSentenceDetector,
    SentenceDetector,
};

use rayon::prelude::*;
use std::io::Read;
use std::path::Path;

/// Structure one report.
///
/// # Arguments
///
/// * `input` - Labeled tokens and side data of the report
/// * `context` - Sentence detector and name variant generator
/// * `options` - Processing options
///
/// # Example
///
/// ```
/// use medstruct::{process_document, LabeledToken, ProcessingContext, ProcessingOptions, ReportInput};
///
/// let input = ReportInput::from_tokens(vec![
///     LabeledToken::new("1. Diagnosis", "<section>", 0),
///     LabeledToken::new("Patient presents with fever.", "<paragraph>", 1),
/// ]);
/// let doc = process_document(&input, &ProcessingContext::new(), &ProcessingOptions::new()).unwrap();
/// assert_eq!(doc.divisions.len(), 1);
/// ```
pub fn process_document(
    input: &ReportInput,
    context: &ProcessingContext,
    options: &ProcessingOptions,
) -> Result<Document> {
    structure::structure_report(input, context, options)
}

/// Structure many reports in parallel.
///
/// Each report gets its own `Result`: a failing report does not affect
/// the others. Output order follows input order.
pub fn process_batch(
    inputs: &[ReportInput],
    context: &ProcessingContext,
    options: &ProcessingOptions,
) -> Vec<Result<Document>> {
    inputs
        .par_iter()
        .map(|input| process_document(input, context, options))
        .collect()
}

/// Read a JSON report input from a file.
///
/// # Example
///
/// ```no_run
/// use medstruct::parse_input_file;
///
/// let input = parse_input_file("report.json").unwrap();
/// println!("Tokens: {}", input.tokens.len());
/// ```
pub fn parse_input_file<P: AsRef<Path>>(path: P) -> Result<ReportInput> {
    let data = std::fs::read_to_string(path)?;
    parse_input_str(&data)
}

/// Read a JSON report input from a string.
pub fn parse_input_str(data: &str) -> Result<ReportInput> {
    let input: ReportInput = serde_json::from_str(data)?;
    Ok(input)
}

/// Read a JSON report input from a reader.
pub fn parse_input_reader<R: Read>(reader: R) -> Result<ReportInput> {
    let input: ReportInput = serde_json::from_reader(reader)?;
    Ok(input)
}

/// Convert a JSON report input file to TEI XML.
///
/// # Example
///
/// ```no_run
/// use medstruct::to_tei;
///
/// let tei = to_tei("report.json").unwrap();
/// std::fs::write("report.tei.xml", tei).unwrap();
/// ```
pub fn to_tei<P: AsRef<Path>>(path: P) -> Result<String> {
    Medstruct::new().process_file(path)?.to_tei()
}

/// Extract plain text from a JSON report input file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = Medstruct::new().process_file(path)?;
    Ok(doc.plain_text())
}

/// Builder for structuring and rendering reports.
///
/// # Example
///
/// ```no_run
/// use medstruct::{CoordinateTarget, Medstruct};
///
/// let tei = Medstruct::new()
///     .with_sentences()
///     .with_coordinates(CoordinateTarget::Sentence)
///     .with_ids()
///     .strict()
///     .process_file("report.json")?
///     .to_tei()?;
/// # Ok::<(), medstruct::Error>(())
/// ```
pub struct Medstruct {
    context: ProcessingContext,
    processing_options: ProcessingOptions,
    render_options: RenderOptions,
}

impl Medstruct {
    /// Create a new builder with the default collaborators.
    pub fn new() -> Self {
        Self {
            context: ProcessingContext::new(),
            processing_options: ProcessingOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Use a custom processing context.
    pub fn with_context(mut self, context: ProcessingContext) -> Self {
        self.context = context;
        self
    }

    /// Segment paragraphs into sentences.
    pub fn with_sentences(mut self) -> Self {
        self.processing_options = self.processing_options.with_sentences(true);
        self
    }

    /// Request coordinates for an element.
    pub fn with_coordinates(mut self, target: CoordinateTarget) -> Self {
        self.processing_options = self.processing_options.with_coordinates(target);
        self
    }

    /// Generate random `xml:id` identifiers.
    pub fn with_ids(mut self) -> Self {
        self.processing_options = self.processing_options.with_ids(true);
        self
    }

    /// Fail on labels outside the taxonomy.
    pub fn strict(mut self) -> Self {
        self.processing_options = self.processing_options.strict();
        self
    }

    /// Set the fallback language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.processing_options = self.processing_options.with_language(language);
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Structure an input already in memory.
    pub fn process(self, input: &ReportInput) -> Result<MedstructResult> {
        let document = process_document(input, &self.context, &self.processing_options)?;
        Ok(MedstructResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Structure a JSON input file.
    pub fn process_file<P: AsRef<Path>>(self, path: P) -> Result<MedstructResult> {
        let input = parse_input_file(path)?;
        self.process(&input)
    }
}

impl Default for Medstruct {
    fn default() -> Self {
        Self::new()
    }
}

/// A structured report ready to be rendered.
pub struct MedstructResult {
    /// The structured document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl MedstructResult {
    /// Convert to TEI XML.
    pub fn to_tei(&self) -> Result<String> {
        render::to_tei(&self.document, &self.render_options)
    }

    /// Convert to TEI XML with structure statistics.
    pub fn to_tei_with_stats(&self) -> Result<RenderResult> {
        render::to_tei_with_stats(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get plain text of the body and running notes.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
