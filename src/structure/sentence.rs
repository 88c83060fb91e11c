//! Sentence segmentation of paragraphs.
//!
//! A paragraph is flattened into one string in which every inline
//! reference occupies a protected span. The boundary detector works on
//! that string; the paragraph is then rebuilt as a sequence of sentences,
//! each reference being moved (never copied) into the sentence that
//! starts at or before it.

use std::collections::{HashMap, HashSet};

use unicode_segmentation::UnicodeSegmentation;

use crate::model::{
    merge_boxes, BoundingBox, DocumentNode, LabeledToken, OffsetPosition, Paragraph, Sentence,
};

use super::random_id;
use crate::text::normalize_unicode;

/// Sentence boundary detection service.
///
/// Implementations must return ordered, non-overlapping spans and never
/// place a boundary strictly inside a forbidden span.
pub trait SentenceDetector: Send + Sync {
    /// Detect sentence spans in `text`.
    fn detect(
        &self,
        text: &str,
        forbidden: &[OffsetPosition],
        tokens: &[LabeledToken],
        language: &str,
    ) -> Vec<OffsetPosition>;

    /// Tokens that do not take part in text/geometry alignment.
    fn is_skippable(&self, token: &LabeledToken) -> bool {
        token.is_whitespace()
    }
}

/// Rule-based detector on top of Unicode sentence boundaries (UAX #29).
///
/// Boundaries falling after a known abbreviation or a single-letter
/// initial are suppressed.
#[derive(Debug, Clone)]
pub struct RuleSentenceDetector {
    abbreviations: HashMap<String, HashSet<String>>,
}

const FRENCH_ABBREVIATIONS: &[&str] = &[
    "dr", "pr", "m", "mme", "mlle", "mr", "st", "ste", "cf", "etc", "fig", "tab", "env", "vol",
    "n°", "no", "p", "av", "bd", "ex", "hab", "j", "cp", "inj", "amp",
];

const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "dr", "prof", "mr", "mrs", "ms", "st", "cf", "etc", "fig", "tab", "vs", "e.g", "i.e", "no",
    "vol", "approx", "p", "pp", "al",
];

impl RuleSentenceDetector {
    /// Create a detector with the built-in French and English abbreviations.
    pub fn new() -> Self {
        let mut abbreviations = HashMap::new();
        abbreviations.insert(
            "fr".to_string(),
            FRENCH_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
        );
        abbreviations.insert(
            "en".to_string(),
            ENGLISH_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
        );
        Self { abbreviations }
    }

    /// Add abbreviations (without trailing period) for a language.
    pub fn with_abbreviations<I, S>(mut self, language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.abbreviations
            .entry(language_key(language))
            .or_default()
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    fn ends_with_abbreviation(&self, prefix: &str, language: &str) -> bool {
        let Some(before_dot) = prefix.trim_end().strip_suffix('.') else {
            return false;
        };
        let word = before_dot
            .rsplit(|c: char| c.is_whitespace() || c == '(' || c == '[')
            .next()
            .unwrap_or("");
        if word.is_empty() {
            return false;
        }
        let mut chars = word.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_uppercase() {
                return true;
            }
        }
        self.abbreviations
            .get(&language_key(language))
            .is_some_and(|set| set.contains(&word.to_lowercase()))
    }
}

impl Default for RuleSentenceDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn language_key(language: &str) -> String {
    language.chars().take(2).collect::<String>().to_lowercase()
}

impl SentenceDetector for RuleSentenceDetector {
    fn detect(
        &self,
        text: &str,
        forbidden: &[OffsetPosition],
        _tokens: &[LabeledToken],
        language: &str,
    ) -> Vec<OffsetPosition> {
        let mut boundaries = vec![0];
        for (offset, _) in text.split_sentence_bound_indices().skip(1) {
            if forbidden.iter().any(|span| span.strictly_contains(offset)) {
                continue;
            }
            if self.ends_with_abbreviation(&text[..offset], language) {
                continue;
            }
            boundaries.push(offset);
        }
        boundaries.push(text.len());

        boundaries
            .windows(2)
            .filter_map(|w| trimmed_span(text, w[0], w[1]))
            .collect()
    }
}

/// Shrink `[start, end)` so it neither starts nor ends with whitespace.
fn trimmed_span(text: &str, start: usize, end: usize) -> Option<OffsetPosition> {
    let slice = &text[start..end];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();
    let span = OffsetPosition::new(start + leading, end - trailing);
    (!span.is_empty()).then_some(span)
}

/// Segments paragraphs into sentences with a given detector.
pub struct SentenceSegmenter<'a> {
    detector: &'a dyn SentenceDetector,
    language: &'a str,
    with_coords: bool,
    generate_ids: bool,
}

enum Piece {
    Text { span: OffsetPosition, text: String },
    Protected { start: usize, node: DocumentNode },
}

impl<'a> SentenceSegmenter<'a> {
    /// Create a segmenter.
    pub fn new(detector: &'a dyn SentenceDetector, language: &'a str) -> Self {
        Self {
            detector,
            language,
            with_coords: false,
            generate_ids: false,
        }
    }

    /// Compute sentence geometry from the backing tokens.
    pub fn with_coords(mut self, with_coords: bool) -> Self {
        self.with_coords = with_coords;
        self
    }

    /// Give each sentence a random identifier.
    pub fn with_ids(mut self, generate_ids: bool) -> Self {
        self.generate_ids = generate_ids;
        self
    }

    /// Replace the paragraph content by its sentences.
    ///
    /// Already segmented paragraphs are left untouched.
    pub fn segment(&self, paragraph: &mut Paragraph) {
        if paragraph.is_segmented() {
            return;
        }

        let (text, pieces, protected) = flatten(std::mem::take(&mut paragraph.children));

        let mut spans: Vec<OffsetPosition> = self
            .detector
            .detect(&text, &protected, &paragraph.tokens, self.language)
            .into_iter()
            .filter(|s| {
                !s.is_empty()
                    && s.end <= text.len()
                    && text.is_char_boundary(s.start)
                    && text.is_char_boundary(s.end)
            })
            .collect();

        if spans.is_empty() {
            match trimmed_span(&text, 0, text.len()) {
                Some(whole) => {
                    log::debug!("No sentence detected, keeping the paragraph as one sentence");
                    spans.push(whole);
                }
                None => return,
            }
        }

        let mut sentences: Vec<Sentence> = spans.iter().map(|_| Sentence::default()).collect();

        for piece in pieces {
            match piece {
                Piece::Text { span, text } => {
                    for (sentence, s) in sentences.iter_mut().zip(&spans) {
                        let lo = span.start.max(s.start);
                        let hi = span.end.min(s.end);
                        if lo < hi {
                            push_text(sentence, &text[lo - span.start..hi - span.start]);
                        }
                    }
                }
                Piece::Protected { start, node } => {
                    let idx = spans.iter().rposition(|s| s.start <= start).unwrap_or(0);
                    sentences[idx].children.push(node);
                }
            }
        }

        if self.with_coords {
            self.assign_coords(&text, &spans, &protected, &paragraph.tokens, &mut sentences);
        }

        paragraph.children = sentences
            .into_iter()
            .map(|mut sentence| {
                if self.generate_ids {
                    sentence.id = Some(random_id());
                }
                DocumentNode::Sentence(sentence)
            })
            .collect();
    }

    /// Align backing tokens with the flattened text and give each sentence
    /// the union of the boxes of the tokens starting inside it.
    ///
    /// A token that cannot be placed is left without a position and the
    /// next one is placed at its first occurrence.
    fn assign_coords(
        &self,
        text: &str,
        spans: &[OffsetPosition],
        protected: &[OffsetPosition],
        tokens: &[LabeledToken],
        sentences: &mut [Sentence],
    ) {
        let mut boxes: Vec<Vec<&BoundingBox>> = vec![Vec::new(); sentences.len()];
        let mut pos = 0;
        let mut resync = false;

        for token in tokens {
            if self.detector.is_skippable(token) {
                continue;
            }
            let tok = normalize_unicode(token.text.trim());
            let Some(found) = text[pos..].find(tok.as_str()) else {
                resync = true;
                continue;
            };
            let start = pos + found;
            if !resync && !is_gap(text, pos, start, protected) {
                resync = true;
                continue;
            }
            resync = false;
            pos = start + tok.len();

            let sentence = spans.iter().position(|s| s.start <= start && start < s.end);
            if let (Some(idx), Some(bbox)) = (sentence, token.bbox.as_ref()) {
                boxes[idx].push(bbox);
            }
        }

        for (sentence, boxes) in sentences.iter_mut().zip(boxes) {
            sentence.coords = merge_boxes(boxes);
        }
    }
}

/// Whether `text[from..to]` holds only whitespace and inline reference text.
fn is_gap(text: &str, from: usize, to: usize, protected: &[OffsetPosition]) -> bool {
    text[from..to].char_indices().all(|(i, c)| {
        let offset = from + i;
        c.is_whitespace() || protected.iter().any(|p| p.start <= offset && offset < p.end)
    })
}

fn flatten(children: Vec<DocumentNode>) -> (String, Vec<Piece>, Vec<OffsetPosition>) {
    let mut text = String::new();
    let mut pieces = Vec::with_capacity(children.len());
    let mut protected = Vec::new();

    for child in children {
        let start = text.len();
        match child {
            DocumentNode::TextRun(run) => {
                text.push_str(&run.text);
                pieces.push(Piece::Text {
                    span: OffsetPosition::new(start, text.len()),
                    text: run.text,
                });
            }
            node => {
                text.push_str(&node.plain_text());
                protected.push(OffsetPosition::new(start, text.len()));
                pieces.push(Piece::Protected { start, node });
            }
        }
    }
    (text, pieces, protected)
}

fn push_text(sentence: &mut Sentence, text: &str) {
    if let Some(DocumentNode::TextRun(run)) = sentence.children.last_mut() {
        run.text.push_str(text);
    } else {
        sentence.children.push(DocumentNode::text(text));
    }
}
