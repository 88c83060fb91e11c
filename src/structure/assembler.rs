//! Tree assembly from label clusters.
//!
//! A single forward pass over the clusters. The assembler keeps the
//! current division, the open paragraph and the open list as indices
//! into the division's children, plus the label of the previous cluster.

use log::{debug, trace, warn};

use super::cluster::Cluster;
use super::numbering::extract_section_number;
use super::options::{CoordinateTarget, ErrorMode, ProcessingOptions};
use super::reference::resolve_marker;
use super::sentence::SentenceSegmenter;
use super::random_id;
use crate::error::{Error, Result};
use crate::model::{
    merge_boxes, CatalogEntry, Division, DocumentNode, Heading, Label, List, Note, NoteKind,
    Paragraph,
};
use crate::text::{normalize_field, normalize_inline};

/// Builds body divisions from clusters.
pub struct TreeAssembler<'a> {
    options: &'a ProcessingOptions,
    segmenter: Option<SentenceSegmenter<'a>>,
    figures: &'a [CatalogEntry],
    tables: &'a [CatalogEntry],
    divisions: Vec<Division>,
    paragraph: Option<usize>,
    list: Option<usize>,
    previous: Option<Label>,
}

impl<'a> TreeAssembler<'a> {
    /// Create an assembler. Paragraphs are segmented only when a segmenter is given.
    pub fn new(
        options: &'a ProcessingOptions,
        segmenter: Option<SentenceSegmenter<'a>>,
        figures: &'a [CatalogEntry],
        tables: &'a [CatalogEntry],
    ) -> Self {
        let mut assembler = Self {
            options,
            segmenter,
            figures,
            tables,
            divisions: Vec::new(),
            paragraph: None,
            list: None,
            previous: None,
        };
        assembler.open_division();
        assembler
    }

    /// Consume the clusters and return the non-empty divisions.
    pub fn assemble(mut self, clusters: Vec<Cluster>) -> Result<Vec<Division>> {
        for cluster in clusters {
            let label = cluster.label;
            match label {
                Some(label) => {
                    trace!("Dispatching {} cluster ({} tokens)", label, cluster.tokens.len());
                    self.dispatch(label, cluster)?;
                }
                None => match self.options.error_mode {
                    ErrorMode::Strict => return Err(Error::UnknownLabel(cluster.identifier)),
                    ErrorMode::Lenient => {
                        warn!("Dropping cluster with unknown label {}", cluster.identifier)
                    }
                },
            }
            self.previous = label;
        }

        self.close_paragraph();
        Ok(self.finish())
    }

    fn dispatch(&mut self, label: Label, cluster: Cluster) -> Result<()> {
        match label {
            Label::Title => self.add_note(NoteKind::Title, &cluster),
            Label::Patient => self.add_note(NoteKind::Patient, &cluster),
            Label::Medic => self.add_note(NoteKind::Medic, &cluster),
            Label::Other => self.add_note(NoteKind::Other, &cluster),
            Label::Section => self.add_section(1, &cluster),
            Label::SubSection => self.add_section(2, &cluster),
            Label::Item => self.add_item(&cluster),
            Label::Paragraph => self.add_paragraph(cluster),
            Label::FigureMarker | Label::TableMarker => self.add_marker(label, cluster)?,
            Label::Figure | Label::Table => self.break_paragraph(),
        }
        Ok(())
    }

    fn division(&mut self) -> &mut Division {
        if self.divisions.is_empty() {
            self.divisions.push(Division::new());
        }
        let last = self.divisions.len() - 1;
        &mut self.divisions[last]
    }

    fn open_paragraph(&mut self) -> Option<&mut Paragraph> {
        let idx = self.paragraph?;
        self.division().children.get_mut(idx)?.as_paragraph_mut()
    }

    fn new_id(&self) -> Option<String> {
        self.options.generate_ids.then(random_id)
    }

    fn open_division(&mut self) {
        let mut division = Division::new();
        division.id = self.new_id();
        self.divisions.push(division);
    }

    /// Segment the open paragraph and forget it.
    fn close_paragraph(&mut self) {
        let Some(idx) = self.paragraph.take() else {
            return;
        };
        let Some(segmenter) = self.segmenter.as_ref() else {
            return;
        };
        let last = self.divisions.len() - 1;
        if let Some(paragraph) = self.divisions[last]
            .children
            .get_mut(idx)
            .and_then(DocumentNode::as_paragraph_mut)
        {
            segmenter.segment(paragraph);
        }
    }

    fn add_note(&mut self, kind: NoteKind, cluster: &Cluster) {
        let text = normalize_field(&cluster.text());
        if text.is_empty() {
            return;
        }
        let id = self.new_id();
        self.division()
            .push(DocumentNode::Note(Note { kind, text, id }));
    }

    fn add_section(&mut self, level: u8, cluster: &Cluster) {
        self.close_paragraph();
        self.list = None;
        self.open_division();

        let text = normalize_field(&cluster.text());
        if text.is_empty() {
            return;
        }

        let mut heading = match extract_section_number(&text) {
            Some(numbering) => {
                let mut heading = Heading::new(numbering.text, level);
                heading.number = Some(numbering.number);
                heading
            }
            None => {
                debug!("No section number in heading {:?}", text);
                Heading::new(text, level)
            }
        };
        heading.id = self.new_id();
        if self.options.wants_coordinates(CoordinateTarget::Head) {
            heading.coords = merge_boxes(cluster.tokens.iter().filter_map(|t| t.bbox.as_ref()));
        }
        self.division().push(DocumentNode::Heading(heading));
    }

    fn add_item(&mut self, cluster: &Cluster) {
        let text = normalize_field(&cluster.text());
        if text.is_empty() {
            return;
        }

        let continues = matches!(self.previous, Some(l) if l.is_marker() || l == Label::Item);
        let idx = match self.list {
            Some(idx) if continues => idx,
            _ => {
                let list = List {
                    id: self.new_id(),
                    children: Vec::new(),
                };
                let idx = self.division().push(DocumentNode::List(list));
                self.list = Some(idx);
                idx
            }
        };

        if let Some(DocumentNode::List(list)) = self.division().children.get_mut(idx) {
            list.add_item(text);
        }
    }

    fn add_paragraph(&mut self, cluster: Cluster) {
        let text = normalize_inline(&cluster.text());
        let continues = matches!(self.previous, Some(l) if l.is_marker() || l.is_float())
            && self.paragraph.is_some();

        if !continues {
            if text.trim().is_empty() {
                return;
            }
            self.close_paragraph();
            let mut paragraph = Paragraph::new();
            paragraph.id = self.new_id();
            let idx = self.division().push(DocumentNode::Paragraph(paragraph));
            self.paragraph = Some(idx);
        }

        if let Some(paragraph) = self.open_paragraph() {
            paragraph.add_text(text);
            paragraph.open_break = false;
            paragraph.tokens.extend(cluster.tokens);
        }
    }

    fn add_marker(&mut self, label: Label, cluster: Cluster) -> Result<()> {
        let with_coords = self.options.wants_coordinates(CoordinateTarget::Ref);
        let Some(reference) =
            resolve_marker(label, &cluster.tokens, self.figures, self.tables, with_coords)?
        else {
            return Ok(());
        };
        let trailing_space = cluster.text().ends_with(char::is_whitespace);

        match self.open_paragraph() {
            Some(paragraph) => {
                if !paragraph.ends_with_whitespace() {
                    paragraph.add_text(" ");
                }
                paragraph.add_node(DocumentNode::InlineRef(reference));
                if trailing_space {
                    paragraph.add_text(" ");
                }
                paragraph.tokens.extend(cluster.tokens);
            }
            None => {
                self.division().push(DocumentNode::InlineRef(reference));
            }
        }
        Ok(())
    }

    fn break_paragraph(&mut self) {
        if let Some(paragraph) = self.open_paragraph() {
            if !paragraph.ends_with_whitespace() {
                paragraph.add_text(" ");
            }
            paragraph.open_break = true;
        }
    }

    fn finish(self) -> Vec<Division> {
        self.divisions
            .into_iter()
            .map(|mut division| {
                division
                    .children
                    .retain(|c| !matches!(c, DocumentNode::Paragraph(p) if p.children.is_empty()));
                division
            })
            .filter(|division| !division.is_empty())
            .collect()
    }
}
