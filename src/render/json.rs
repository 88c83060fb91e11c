//! JSON rendering for structured reports.

use super::options::JsonFormat;
use crate::error::{Error, Result};
use crate::model::Document;

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Division, DocumentNode, Paragraph};

    #[test]
    fn test_to_json_pretty() {
        let mut doc = Document::new();
        doc.title = Some("Compte rendu".to_string());
        let mut div = Division::new();
        div.push(DocumentNode::Paragraph(Paragraph::with_text("Fièvre.")));
        doc.divisions.push(div);

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("\"type\": \"paragraph\""));
        assert!(json.contains("\"type\": \"text_run\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&Document::new(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
    }

    #[test]
    fn test_json_skips_backing_tokens() {
        let mut p = Paragraph::with_text("Texte");
        p.open_break = true;
        let mut div = Division::new();
        div.push(DocumentNode::Paragraph(p));
        let mut doc = Document::new();
        doc.divisions.push(div);

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains("tokens"));
        assert!(!json.contains("open_break"));
    }
}
