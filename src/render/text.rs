//! Plain text rendering for structured reports.

use crate::error::Result;
use crate::model::{Division, Document, DocumentNode};

use super::RenderOptions;

/// Convert a document to plain text.
///
/// Headings keep their number, list items are dashed and each sentence
/// of a segmented paragraph starts a new line.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut blocks: Vec<String> = Vec::new();
    if options.include_header {
        if let Some(ref title) = doc.title {
            blocks.push(title.clone());
        }
    }
    for division in &doc.divisions {
        render_division(&mut blocks, division);
    }
    if options.include_running_notes {
        blocks.extend(doc.notes.iter().map(|n| n.text.clone()));
    }
    Ok(blocks.join("\n\n").trim().to_string())
}

fn render_division(blocks: &mut Vec<String>, division: &Division) {
    for child in &division.children {
        let block = match child {
            DocumentNode::Heading(h) => match h.number {
                Some(ref n) => format!("{} {}", n, h.text),
                None => h.text.clone(),
            },
            DocumentNode::Paragraph(p) if p.is_segmented() => p
                .sentences()
                .map(|s| s.plain_text().trim().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            DocumentNode::List(list) => list
                .children
                .iter()
                .map(|item| format!("- {}", item.plain_text()))
                .collect::<Vec<_>>()
                .join("\n"),
            DocumentNode::Division(div) => {
                render_division(blocks, div);
                continue;
            }
            other => other.plain_text().trim().to_string(),
        };
        if !block.is_empty() {
            blocks.push(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Heading, List, Paragraph, Sentence};

    #[test]
    fn test_to_text() {
        let mut heading = Heading::new("Diagnostic", 1);
        heading.number = Some("1.".to_string());
        let mut list = List::default();
        list.add_item("aspirine");
        list.add_item("repos");

        let mut div = Division::new();
        div.push(DocumentNode::Heading(heading));
        div.push(DocumentNode::Paragraph(Paragraph::with_text(" Fièvre élevée. ")));
        div.push(DocumentNode::List(list));
        let mut doc = Document::new();
        doc.divisions.push(div);

        let text = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(text, "1. Diagnostic\n\nFièvre élevée.\n\n- aspirine\n- repos");
    }

    #[test]
    fn test_sentences_on_own_lines() {
        let sentence = |t: &str| {
            DocumentNode::Sentence(Sentence {
                children: vec![DocumentNode::text(t)],
                ..Default::default()
            })
        };
        let mut p = Paragraph::new();
        p.children.push(sentence("Fièvre."));
        p.children.push(sentence(" Toux."));
        let mut div = Division::new();
        div.push(DocumentNode::Paragraph(p));
        let mut doc = Document::new();
        doc.divisions.push(div);

        let text = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(text, "Fièvre.\nToux.");
    }
}
