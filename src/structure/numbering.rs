//! Section number extraction from heading text.

use once_cell::sync::Lazy;
use regex::Regex;

// Tried in order; the first pattern that matches wins.
static HEADER_NUMBERING: Lazy<[Regex; 5]> = Lazy::new(|| {
    [
        Regex::new(r"^\d+\.?\s").unwrap(),
        Regex::new(r"^(\d+\.)+\d+\s").unwrap(),
        Regex::new(r"^(\d+\.)+\s").unwrap(),
        Regex::new(r"^[IVXLC]+\.\s").unwrap(),
        Regex::new(r"^[A-Z]\.\s").unwrap(),
    ]
});

/// A section number split off its heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNumber {
    /// Number with internal whitespace removed (e.g. "1.2.")
    pub number: String,

    /// Heading text with the number removed
    pub text: String,
}

/// Extract a leading section number from heading text.
///
/// Returns `None` when no numbering pattern matches; the heading is then
/// used verbatim.
pub fn extract_section_number(text: &str) -> Option<SectionNumber> {
    let found = HEADER_NUMBERING
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str())?;

    let residual = text.replacen(found, "", 1).trim().to_string();
    let number: String = found.chars().filter(|c| !c.is_whitespace()).collect();
    Some(SectionNumber {
        number,
        text: residual,
    })
}
