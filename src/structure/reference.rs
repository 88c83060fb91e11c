//! Resolution of inline figure/table call-outs against their catalogs.

use crate::error::{Error, Result};
use crate::model::{merge_boxes, CatalogEntry, InlineRef, Label, LabeledToken, RefType};
use crate::text::{clean_field, dehyphenize};

/// Find the first catalog entry whose label occurs in the marker text.
///
/// Matching is case-insensitive containment, in catalog order.
pub fn find_entry<'a>(marker_text: &str, catalog: &'a [CatalogEntry]) -> Option<&'a CatalogEntry> {
    let text_low = marker_text.to_lowercase();
    catalog.iter().find(|entry| {
        entry
            .label
            .as_deref()
            .map(clean_field)
            .filter(|label| !label.is_empty())
            .is_some_and(|label| text_low.contains(&label.to_lowercase()))
    })
}

/// Build the inline reference for a marker cluster.
///
/// Returns `Ok(None)` when the marker text is blank, and
/// [`Error::UnsupportedMarker`] when `label` is not a marker label.
pub fn resolve_marker(
    label: Label,
    tokens: &[LabeledToken],
    figures: &[CatalogEntry],
    tables: &[CatalogEntry],
    with_coords: bool,
) -> Result<Option<InlineRef>> {
    let (ref_type, catalog) = match label {
        Label::FigureMarker => (RefType::Figure, figures),
        Label::TableMarker => (RefType::Table, tables),
        other => return Err(Error::UnsupportedMarker(other.to_string())),
    };

    let raw: String = tokens.iter().map(|t| t.text.as_str()).collect();
    let text = dehyphenize(&raw).replace('\n', " ").trim().to_string();
    if text.is_empty() {
        return Ok(None);
    }

    let mut reference = InlineRef::new(ref_type, text);
    match find_entry(&reference.text, catalog) {
        Some(entry) => {
            reference.target = Some(format!("{}{}", ref_type.target_prefix(), entry.id));
        }
        None => log::debug!(
            "No {} matches marker {:?}, emitting it without target",
            ref_type.as_str(),
            reference.text
        ),
    }

    if with_coords {
        let boxes: Vec<_> = tokens.iter().filter_map(|t| t.bbox.as_ref()).collect();
        reference.coords = merge_boxes(boxes);
    }

    Ok(Some(reference))
}
