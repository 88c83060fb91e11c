//! TEI XML rendering for structured reports.

use crate::error::Result;
use crate::model::{
    coords_string, BoundingBox, Division, Document, DocumentNode, Heading, InlineRef, List, Note,
    NoteRecord, Paragraph, Person, Sentence,
};

use super::{RenderOptions, RenderResult, StructureStats};

const TEI_NAMESPACE: &str = "http://www.tei-c.org/ns/1.0";
const APPLICATION: &str = "medstruct";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert a document to TEI XML.
pub fn to_tei(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = TeiRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to TEI XML with statistics.
pub fn to_tei_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = TeiRenderer::new(options);
    renderer.render_with_stats(doc)
}

/// Escape text for use in XML content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

type Attributes = Vec<(&'static str, String)>;

/// TEI renderer.
pub struct TeiRenderer {
    options: RenderOptions,
    output: String,
    depth: usize,
}

impl TeiRenderer {
    /// Create a new TEI renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            output: String::new(),
            depth: 0,
        }
    }

    /// Render a document to TEI.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        self.render_document(doc);
        Ok(self.output)
    }

    /// Render a document to TEI with structure statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        self.render_document(doc);
        let stats = if self.options.collect_stats {
            StructureStats::from_document(doc)
        } else {
            StructureStats::default()
        };
        Ok(RenderResult::new(self.output, doc, stats))
    }

    fn render_document(&mut self, doc: &Document) {
        self.output
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        self.newline();

        let mut attrs: Attributes = vec![("xmlns", TEI_NAMESPACE.to_string())];
        if let Some(ref language) = doc.language {
            attrs.push(("xml:lang", language.clone()));
        }
        self.open("TEI", &attrs);
        if self.options.include_header {
            self.render_header(doc);
        }

        let text_attrs: Attributes = doc
            .language
            .iter()
            .map(|l| ("xml:lang", l.clone()))
            .collect();
        self.open("text", &text_attrs);
        if doc.divisions.is_empty()
            && (!self.options.include_running_notes || doc.notes.is_empty())
        {
            self.empty("body", &[]);
        } else {
            self.open("body", &[]);
            for division in &doc.divisions {
                self.render_division(division);
            }
            if self.options.include_running_notes {
                for note in &doc.notes {
                    self.render_running_note(note);
                }
            }
            self.close("body");
        }
        self.close("text");
        self.close("TEI");
    }

    fn render_header(&mut self, doc: &Document) {
        self.open("teiHeader", &[]);
        self.open("fileDesc", &[]);

        self.open("titleStmt", &[]);
        match doc.title {
            Some(ref title) => self.leaf(
                "title",
                &[("level", "a".to_string()), ("type", "main".to_string())],
                title,
            ),
            None => self.empty("title", &[("level", "a".to_string()), ("type", "main".to_string())]),
        }
        self.close("titleStmt");

        self.open("sourceDesc", &[]);
        if doc.persons.is_empty() {
            self.empty("listPerson", &[]);
        } else {
            self.open("listPerson", &[]);
            for person in &doc.persons {
                self.render_person(person);
            }
            self.close("listPerson");
        }
        self.close("sourceDesc");
        self.close("fileDesc");

        self.open("encodingDesc", &[]);
        self.open("appInfo", &[]);
        let mut attrs: Attributes = vec![
            ("version", VERSION.to_string()),
            ("ident", APPLICATION.to_string()),
        ];
        if let Some(when) = self.options.timestamp {
            attrs.push(("when", when.format("%Y-%m-%dT%H:%M:%S%z").to_string()));
        }
        self.open("application", &attrs);
        self.leaf("label", &[], APPLICATION);
        self.close("application");
        self.close("appInfo");
        self.close("encodingDesc");

        self.close("teiHeader");
    }

    fn render_person(&mut self, person: &Person) {
        self.open("person", &[]);
        let mut names = String::new();
        if !person.first_name.is_empty() {
            names.push_str(&inline("forename", &[], &person.first_name));
        }
        if !person.last_name.is_empty() {
            names.push_str(&inline("surname", &[], &person.last_name));
        }
        self.line(&format!("<persName>{}</persName>", names));
        if let Some(ref email) = person.email {
            self.leaf("email", &[], email);
        }
        self.close("person");
    }

    fn render_division(&mut self, division: &Division) {
        self.open("div", &id_attr(&division.id));
        for child in &division.children {
            self.render_node(child);
        }
        self.close("div");
    }

    fn render_node(&mut self, node: &DocumentNode) {
        match node {
            DocumentNode::Division(div) => self.render_division(div),
            DocumentNode::Heading(heading) => self.render_heading(heading),
            DocumentNode::Paragraph(p) => self.render_paragraph(p),
            DocumentNode::Sentence(s) => {
                let rendered = self.sentence_markup(s);
                self.line(&rendered);
            }
            DocumentNode::List(list) => self.render_list(list),
            DocumentNode::ListItem(item) => self.leaf("item", &[], &item.text),
            DocumentNode::InlineRef(r) => {
                let rendered = self.ref_markup(r);
                self.line(&rendered);
            }
            DocumentNode::Note(note) => self.render_note(note),
            DocumentNode::TextRun(run) => {
                let text = run.text.trim();
                if !text.is_empty() {
                    self.line(&escape_xml(text));
                }
            }
        }
    }

    fn render_heading(&mut self, heading: &Heading) {
        let mut attrs = id_attr(&heading.id);
        if let Some(ref number) = heading.number {
            attrs.push(("n", number.clone()));
        }
        self.push_coords(&mut attrs, &heading.coords);
        self.leaf("head", &attrs, &heading.text);
    }

    fn render_paragraph(&mut self, para: &Paragraph) {
        if para.is_empty() {
            return;
        }
        let attrs = id_attr(&para.id);
        if para.is_segmented() {
            self.open("p", &attrs);
            for sentence in para.sentences() {
                let rendered = self.sentence_markup(sentence);
                self.line(&rendered);
            }
            self.close("p");
        } else {
            let content = self.mixed_content(&para.children);
            let content = content.trim();
            self.line(&format!("<p{}>{}</p>", attributes(&attrs), content));
        }
    }

    fn sentence_markup(&self, sentence: &Sentence) -> String {
        let mut attrs = id_attr(&sentence.id);
        self.push_coords(&mut attrs, &sentence.coords);
        let content = self.mixed_content(&sentence.children);
        format!("<s{}>{}</s>", attributes(&attrs), content.trim())
    }

    fn mixed_content(&self, nodes: &[DocumentNode]) -> String {
        let mut content = String::new();
        for node in nodes {
            match node {
                DocumentNode::TextRun(run) => content.push_str(&escape_xml(&run.text)),
                DocumentNode::InlineRef(r) => content.push_str(&self.ref_markup(r)),
                DocumentNode::Sentence(s) => content.push_str(&self.sentence_markup(s)),
                other => content.push_str(&escape_xml(&other.plain_text())),
            }
        }
        content
    }

    fn ref_markup(&self, reference: &InlineRef) -> String {
        let mut attrs: Attributes = vec![("type", reference.ref_type.as_str().to_string())];
        if let Some(ref target) = reference.target {
            attrs.push(("target", target.clone()));
        }
        self.push_coords(&mut attrs, &reference.coords);
        inline("ref", &attrs, &reference.text)
    }

    fn render_list(&mut self, list: &List) {
        if list.is_empty() {
            return;
        }
        self.open("list", &id_attr(&list.id));
        for item in &list.children {
            self.render_node(item);
        }
        self.close("list");
    }

    fn render_note(&mut self, note: &Note) {
        let mut attrs: Attributes = vec![("type", note.kind.as_str().to_string())];
        attrs.extend(id_attr(&note.id));
        self.leaf("note", &attrs, &note.text);
    }

    fn render_running_note(&mut self, note: &NoteRecord) {
        let mut attrs: Attributes = vec![("place", note.place.as_str().to_string())];
        if let Some(number) = note.number {
            attrs.push(("n", number.to_string()));
        }
        attrs.extend(id_attr(&note.id));
        self.push_coords(&mut attrs, &note.coords);
        self.leaf("note", &attrs, &note.text);
    }

    fn push_coords(&self, attrs: &mut Attributes, boxes: &[BoundingBox]) {
        if self.options.include_coords && !boxes.is_empty() {
            attrs.push(("coords", coords_string(boxes)));
        }
    }

    // Low-level writers

    fn indent(&mut self) {
        let width = self.options.indent * self.depth;
        self.output.extend(std::iter::repeat(' ').take(width));
    }

    fn newline(&mut self) {
        if self.options.indent > 0 {
            self.output.push('\n');
        }
    }

    fn line(&mut self, markup: &str) {
        self.indent();
        self.output.push_str(markup);
        self.newline();
    }

    fn open(&mut self, tag: &str, attrs: &[(&'static str, String)]) {
        self.line(&format!("<{}{}>", tag, attributes(attrs)));
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{}>", tag));
    }

    fn empty(&mut self, tag: &str, attrs: &[(&'static str, String)]) {
        self.line(&format!("<{}{}/>", tag, attributes(attrs)));
    }

    fn leaf(&mut self, tag: &str, attrs: &[(&'static str, String)], text: &str) {
        let markup = inline(tag, attrs, text);
        self.line(&markup);
    }
}

fn id_attr(id: &Option<String>) -> Attributes {
    id.iter().map(|id| ("xml:id", id.clone())).collect()
}

fn attributes(attrs: &[(&'static str, String)]) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!(" {}=\"{}\"", name, escape_xml(value)))
        .collect()
}

fn inline(tag: &str, attrs: &[(&'static str, String)], text: &str) -> String {
    format!("<{tag}{}>{}</{tag}>", attributes(attrs), escape_xml(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NoteKind, NotePlace, RefType};
    use chrono::{TimeZone, Utc};

    fn sample() -> Document {
        let mut heading = Heading::new("Diagnosis", 1);
        heading.number = Some("1.".to_string());

        let mut p = Paragraph::with_text("Fever & cough, see ");
        let mut r = InlineRef::new(RefType::Figure, "Fig. 1");
        r.target = Some("#fig_0".to_string());
        p.add_node(DocumentNode::InlineRef(r));
        p.add_text(".");

        let mut div = Division::new();
        div.push(DocumentNode::Heading(heading));
        div.push(DocumentNode::Paragraph(p));
        div.push(DocumentNode::Note(Note {
            kind: NoteKind::Patient,
            text: "M. Dupont".to_string(),
            id: None,
        }));

        let mut doc = Document::new();
        doc.language = Some("fr".to_string());
        doc.title = Some("Compte rendu".to_string());
        doc.divisions.push(div);
        doc
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("l'examen > 2"), "l&apos;examen &gt; 2");
    }

    #[test]
    fn test_attribute_values_escaped() {
        let mut heading = Heading::new("Résultats", 1);
        heading.number = Some("1\"'".to_string());
        let mut p = Paragraph::with_text("Voir ");
        let mut r = InlineRef::new(RefType::Figure, "Fig. <1>");
        r.target = Some("#fig_a&b\"".to_string());
        p.add_node(DocumentNode::InlineRef(r));

        let mut div = Division::new();
        div.push(DocumentNode::Heading(heading));
        div.push(DocumentNode::Paragraph(p));
        let mut doc = Document::new();
        doc.divisions.push(div);

        let tei = to_tei(&doc, &RenderOptions::new().with_header(false)).unwrap();
        assert!(tei.contains("<head n=\"1&quot;&apos;\">Résultats</head>"));
        assert!(tei.contains(
            "<ref type=\"figure\" target=\"#fig_a&amp;b&quot;\">Fig. &lt;1&gt;</ref>"
        ));
    }

    #[test]
    fn test_body_markup() {
        let tei = to_tei(&sample(), &RenderOptions::default()).unwrap();
        assert!(tei.starts_with("<?xml"));
        assert!(tei.contains("<TEI xmlns=\"http://www.tei-c.org/ns/1.0\" xml:lang=\"fr\">"));
        assert!(tei.contains("<head n=\"1.\">Diagnosis</head>"));
        assert!(tei.contains(
            "<p>Fever &amp; cough, see <ref type=\"figure\" target=\"#fig_0\">Fig. 1</ref>.</p>"
        ));
        assert!(tei.contains("<note type=\"patient\">M. Dupont</note>"));
        assert!(tei.contains("<title level=\"a\" type=\"main\">Compte rendu</title>"));
    }

    #[test]
    fn test_header_optional() {
        let tei = to_tei(&sample(), &RenderOptions::new().with_header(false)).unwrap();
        assert!(!tei.contains("teiHeader"));
        assert!(tei.contains("<body>"));
    }

    #[test]
    fn test_timestamp_and_persons() {
        let mut doc = sample();
        let mut person = Person::new("Jean", "Dupont");
        person.email = Some("j.dupont@chu.fr".to_string());
        doc.persons.push(person);

        let when = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        let tei = to_tei(&doc, &RenderOptions::new().with_timestamp(when)).unwrap();
        assert!(tei.contains("when=\"2024-03-01T10:30:00+0000\""));
        assert!(tei.contains(
            "<persName><forename>Jean</forename><surname>Dupont</surname></persName>"
        ));
        assert!(tei.contains("<email>j.dupont@chu.fr</email>"));
    }

    #[test]
    fn test_segmented_paragraph_and_coords() {
        let mut sentence = Sentence::default();
        sentence.children.push(DocumentNode::text("Fièvre."));
        sentence.coords = vec![BoundingBox::new(1, 10.0, 20.0, 30.5, 12.0)];
        sentence.id = Some("_abc1234".to_string());
        let mut p = Paragraph::new();
        p.children.push(DocumentNode::Sentence(sentence));

        let mut div = Division::new();
        div.push(DocumentNode::Paragraph(p));
        let mut doc = Document::new();
        doc.divisions.push(div);

        let tei = to_tei(&doc, &RenderOptions::default()).unwrap();
        assert!(tei.contains(
            "<s xml:id=\"_abc1234\" coords=\"1,10.00,20.00,30.50,12.00\">Fièvre.</s>"
        ));

        let tei = to_tei(&doc, &RenderOptions::new().with_coords(false)).unwrap();
        assert!(tei.contains("<s xml:id=\"_abc1234\">Fièvre.</s>"));
    }

    #[test]
    fn test_running_notes() {
        let mut doc = sample();
        doc.notes.push(NoteRecord {
            text: "Running header".to_string(),
            number: Some(1),
            place: NotePlace::Headnote,
            id: None,
            coords: Vec::new(),
            tokens: Vec::new(),
        });
        let tei = to_tei(&doc, &RenderOptions::default()).unwrap();
        assert!(tei.contains("<note place=\"headnote\" n=\"1\">Running header</note>"));

        let tei = to_tei(&doc, &RenderOptions::new().with_running_notes(false)).unwrap();
        assert!(!tei.contains("place=\"headnote\""));
    }

    #[test]
    fn test_compact_output() {
        let tei = to_tei(&sample(), &RenderOptions::new().compact()).unwrap();
        assert!(!tei.contains('\n'));
    }

    #[test]
    fn test_empty_document() {
        let tei = to_tei(&Document::new(), &RenderOptions::default()).unwrap();
        assert!(tei.contains("<body/>"));
        assert!(tei.contains("<listPerson/>"));
    }

    #[test]
    fn test_render_with_stats() {
        let result = to_tei_with_stats(&sample(), &RenderOptions::default()).unwrap();
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.reference_count, 1);
        assert_eq!(result.stats.note_count, 1);
        assert_eq!(result.language.as_deref(), Some("fr"));
    }
}
