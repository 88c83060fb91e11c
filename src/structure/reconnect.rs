//! Reconnection of paragraphs cut by a figure or a table.

use crate::model::{Division, DocumentNode, Paragraph};

/// Merge paragraphs that were interrupted by a float with their continuation.
///
/// An open paragraph absorbs the next paragraph of the same division when
/// that paragraph starts with an upper-case letter directly followed by a
/// lower-case one. Open-break marks are cleared afterwards.
pub fn reconnect_paragraphs(division: &mut Division) {
    let mut i = 0;
    while i < division.children.len() {
        let open = matches!(&division.children[i], DocumentNode::Paragraph(p) if p.open_break);
        if open {
            let next = (i + 1..division.children.len())
                .find(|&j| matches!(division.children[j], DocumentNode::Paragraph(_)));
            if let Some(j) = next {
                let continues = division.children[j]
                    .as_paragraph()
                    .is_some_and(|p| starts_like_continuation(&p.plain_text()));
                if continues {
                    if let DocumentNode::Paragraph(following) = division.children.remove(j) {
                        if let Some(paragraph) = division.children[i].as_paragraph_mut() {
                            merge_into(paragraph, following);
                        }
                    }
                    // The merged paragraph may itself end on a break.
                    continue;
                }
            }
            if let Some(paragraph) = division.children[i].as_paragraph_mut() {
                paragraph.open_break = false;
            }
        }
        i += 1;
    }
}

fn starts_like_continuation(text: &str) -> bool {
    let mut chars = text.trim_start().chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(first), Some(second)) if first.is_uppercase() && second.is_lowercase()
    )
}

fn merge_into(paragraph: &mut Paragraph, following: Paragraph) {
    let segmented = paragraph.is_segmented() && following.is_segmented();
    if segmented {
        paragraph.children.extend(following.children);
    } else {
        if !paragraph.ends_with_whitespace() {
            paragraph.add_text(" ");
        }
        for child in following.children {
            match child {
                DocumentNode::TextRun(run) => paragraph.add_text(run.text),
                node => paragraph.add_node(node),
            }
        }
    }
    paragraph.tokens.extend(following.tokens);
    paragraph.open_break = following.open_break;
}
