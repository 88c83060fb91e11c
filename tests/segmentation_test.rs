//! Sentence segmentation tests through the public API.

use std::sync::Arc;

use medstruct::structure::SentenceSegmenter;
use medstruct::{
    process_document, DocumentNode, Error, InlineRef, LabeledToken, OffsetPosition, Paragraph,
    ProcessingContext, ProcessingOptions, RefType, ReportInput, RuleSentenceDetector,
    SentenceDetector,
};

/// Splits after every semicolon.
struct SemicolonDetector;

impl SentenceDetector for SemicolonDetector {
    fn detect(
        &self,
        text: &str,
        forbidden: &[OffsetPosition],
        _tokens: &[LabeledToken],
        _language: &str,
    ) -> Vec<OffsetPosition> {
        let mut spans = Vec::new();
        let mut start = 0;
        for (i, c) in text.char_indices() {
            let end = i + c.len_utf8();
            if c == ';' && !forbidden.iter().any(|f| f.strictly_contains(end)) {
                spans.push(OffsetPosition::new(start, end));
                start = end;
            }
        }
        if start < text.len() {
            spans.push(OffsetPosition::new(start, text.len()));
        }
        spans
    }
}

/// Never finds a boundary.
struct SilentDetector;

impl SentenceDetector for SilentDetector {
    fn detect(
        &self,
        _text: &str,
        _forbidden: &[OffsetPosition],
        _tokens: &[LabeledToken],
        _language: &str,
    ) -> Vec<OffsetPosition> {
        Vec::new()
    }
}

fn paragraph_with_refs() -> Paragraph {
    let mut p = Paragraph::with_text("Fièvre à 39. Voir ");
    p.add_node(DocumentNode::InlineRef(InlineRef::new(RefType::Figure, "Fig. 1")));
    p.add_text(" et ");
    p.add_node(DocumentNode::InlineRef(InlineRef::new(RefType::Table, "tab. 2")));
    p.add_text(". Le Dr. Martin a revu la ");
    p.add_node(DocumentNode::InlineRef(InlineRef::new(RefType::Figure, "figure 3")));
    p.add_text(". Fin.");
    p
}

fn ref_texts(p: &Paragraph) -> Vec<String> {
    p.children
        .iter()
        .flat_map(|c| c.inline_refs())
        .map(|r| r.text.clone())
        .collect()
}

fn sentence_texts(p: &Paragraph) -> Vec<String> {
    p.sentences().map(|s| s.plain_text().trim().to_string()).collect()
}

#[test]
fn test_detection_is_deterministic() {
    let detector = RuleSentenceDetector::new();
    let text = "Patient vu par le Pr. Durand. Bilan sanguin normal. Scanner prévu.";
    let forbidden = [OffsetPosition::new(0, 7)];

    let first = detector.detect(text, &forbidden, &[], "fr");
    let second = detector.detect(text, &forbidden, &[], "fr");
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_segmentation_is_deterministic() {
    let detector = RuleSentenceDetector::new();
    let segmenter = SentenceSegmenter::new(&detector, "fr");

    let mut a = paragraph_with_refs();
    let mut b = paragraph_with_refs();
    segmenter.segment(&mut a);
    segmenter.segment(&mut b);
    assert_eq!(sentence_texts(&a), sentence_texts(&b));
}

#[test]
fn test_references_preserved_across_segmentation() {
    let expected = ref_texts(&paragraph_with_refs());
    assert_eq!(expected.len(), 3);

    let detectors: Vec<Box<dyn SentenceDetector>> = vec![
        Box::new(RuleSentenceDetector::new()),
        Box::new(SemicolonDetector),
        Box::new(SilentDetector),
    ];
    for detector in &detectors {
        let mut p = paragraph_with_refs();
        SentenceSegmenter::new(detector.as_ref(), "fr").segment(&mut p);
        assert!(p.is_segmented());
        assert_eq!(ref_texts(&p), expected);
    }
}

#[test]
fn test_rule_detector_sentences() {
    let mut p = paragraph_with_refs();
    let detector = RuleSentenceDetector::new();
    SentenceSegmenter::new(&detector, "fr").segment(&mut p);

    assert_eq!(
        sentence_texts(&p),
        vec![
            "Fièvre à 39.",
            "Voir Fig. 1 et tab. 2.",
            "Le Dr. Martin a revu la figure 3.",
            "Fin.",
        ]
    );
}

#[test]
fn test_custom_detector_in_context() {
    let input = ReportInput::from_tokens(vec![LabeledToken::new(
        "Paracétamol 1 g; Ibuprofène 400 mg; repos",
        "<paragraph>",
        0,
    )]);
    let context = ProcessingContext::new().with_sentence_detector(Arc::new(SemicolonDetector));
    let options = ProcessingOptions::new().with_sentences(true);
    let doc = process_document(&input, &context, &options).unwrap();

    let paragraph = doc.paragraphs().next().unwrap();
    assert_eq!(
        sentence_texts(paragraph),
        vec!["Paracétamol 1 g;", "Ibuprofène 400 mg;", "repos"]
    );
}

#[test]
fn test_no_boundary_keeps_whole_paragraph() {
    let input = ReportInput::from_tokens(vec![LabeledToken::new(
        "  Pas de ponctuation dans ce paragraphe ",
        "<paragraph>",
        0,
    )]);
    let context = ProcessingContext::new().with_sentence_detector(Arc::new(SilentDetector));
    let options = ProcessingOptions::new().with_sentences(true);
    let doc = process_document(&input, &context, &options).unwrap();

    let paragraph = doc.paragraphs().next().unwrap();
    let sentences: Vec<_> = paragraph.sentences().collect();
    assert_eq!(sentences.len(), 1);
    assert_eq!(
        sentences[0].plain_text(),
        "Pas de ponctuation dans ce paragraphe"
    );
}

#[test]
fn test_missing_detector_reported_before_work() {
    let input = ReportInput::from_tokens(vec![LabeledToken::new("Texte.", "<paragraph>", 0)]);
    let options = ProcessingOptions::new().with_sentences(true);
    let result = process_document(&input, &ProcessingContext::empty(), &options);
    assert!(matches!(result, Err(Error::MissingResource(_))));
}
