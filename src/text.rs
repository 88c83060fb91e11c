//! Text normalization shared by the structuring stages.
//!
//! Token text comes straight out of PDF layout extraction, so it still
//! carries ligatures, end-of-line hyphenation and raw newlines.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{L})[-\u{00AD}][ \t]*\r?\n\s*(\p{Ll})").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const LIGATURES: [(&str, &str); 7] = [
    ("\u{FB00}", "ff"),  // ﬀ
    ("\u{FB01}", "fi"),  // ﬁ
    ("\u{FB02}", "fl"),  // ﬂ
    ("\u{FB03}", "ffi"), // ﬃ
    ("\u{FB04}", "ffl"), // ﬄ
    ("\u{FB05}", "st"),  // ﬅ
    ("\u{FB06}", "st"),  // ﬆ
];

/// Join words hyphenated across a line break.
///
/// `"infor-\nmation"` becomes `"information"`; hyphens inside a line are kept.
pub fn dehyphenize(text: &str) -> String {
    HYPHEN_BREAK.replace_all(text, "$1$2").into_owned()
}

/// Collapse every whitespace run (newlines included) into one space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// NFC normalization and ligature expansion.
pub fn normalize_unicode(text: &str) -> String {
    let mut result: String = text.nfc().collect();
    for (ligature, replacement) in LIGATURES {
        if result.contains(ligature) {
            result = result.replace(ligature, replacement);
        }
    }
    result
}

/// Normalize text that is embedded in running content.
///
/// Leading and trailing spaces are kept (collapsed) so that adjacent
/// pieces stay separated.
pub fn normalize_inline(text: &str) -> String {
    collapse_whitespace(&dehyphenize(&normalize_unicode(text)))
}

/// Normalize text of a standalone field (heading, item, note).
pub fn normalize_field(text: &str) -> String {
    normalize_inline(text).trim().to_string()
}

/// Trim a label and drop surrounding punctuation.
pub fn clean_field(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '.' | '(' | ')' | '[' | ']'))
        .trim()
        .to_string()
}

/// Lower-case and strip diacritics (`"Hélène"` → `"helene"`).
pub fn fold_ascii(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
