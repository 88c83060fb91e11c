//! Running header/footer deduplication.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::random_id;
use crate::model::{LabeledToken, NoteBlock, NotePlace, NoteRecord};
use crate::text::normalize_field;

static LEADING_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{1,9})").unwrap());

/// Notes shorter than this (in characters) are layout noise.
const MIN_NOTE_CHARS: usize = 6;

/// Normalize running note blocks and keep the first occurrence of each text.
///
/// Deduplication is per placement: the same text as a header and as a
/// footer yields two notes.
pub fn deduplicate_notes(blocks: Vec<NoteBlock>, generate_ids: bool) -> Vec<NoteRecord> {
    let mut seen: HashSet<(NotePlace, String)> = HashSet::new();
    let mut records = Vec::new();

    for block in blocks {
        let raw: String = block.tokens.iter().map(|t| t.text.as_str()).collect();
        let mut text = normalize_field(&raw);
        if text.chars().count() < MIN_NOTE_CHARS {
            log::debug!("Dropping short running note {:?}", text);
            continue;
        }

        let mut number = None;
        let mut tokens = block.tokens;
        if let Some(digits) = LEADING_ORDINAL.find(&text).map(|m| m.as_str().to_string()) {
            number = digits.parse::<u32>().ok();
            text = text[digits.len()..].trim().to_string();
            tokens = strip_ordinal_tokens(tokens, &digits);
        }
        if text.is_empty() {
            continue;
        }

        if !seen.insert((block.place, text.clone())) {
            continue;
        }
        records.push(NoteRecord {
            text,
            number,
            place: block.place,
            id: generate_ids.then(random_id),
            coords: Vec::new(),
            tokens,
        });
    }
    records
}

/// Drop the leading tokens that spell out `digits`, with surrounding blanks.
fn strip_ordinal_tokens(tokens: Vec<LabeledToken>, digits: &str) -> Vec<LabeledToken> {
    let mut remaining = digits;
    let mut consumed = 0;
    for token in &tokens {
        let text = token.text.trim();
        if text.is_empty() {
            consumed += 1;
            continue;
        }
        if remaining.is_empty() {
            break;
        }
        match remaining.strip_prefix(text) {
            Some(rest) => {
                remaining = rest;
                consumed += 1;
            }
            None => break,
        }
    }
    tokens.into_iter().skip(consumed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(place: NotePlace, parts: &[&str]) -> NoteBlock {
        let tokens = parts
            .iter()
            .enumerate()
            .map(|(i, t)| LabeledToken::new(*t, "<note>", i))
            .collect();
        NoteBlock::new(place, tokens)
    }

    #[test]
    fn test_duplicates_dropped_in_order() {
        let blocks = vec![
            block(NotePlace::Headnote, &["1", " ", "Running", " ", "header"]),
            block(NotePlace::Headnote, &["1", " ", "Running", " ", "header"]),
            block(NotePlace::Headnote, &["2", " ", "Running", " ", "header"]),
        ];
        let notes = deduplicate_notes(blocks, false);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "Running header");
        assert_eq!(notes[0].number, Some(1));
        assert_eq!(notes[0].tokens.len(), 3);
        assert_eq!(notes[0].tokens[0].text, "Running");
    }

    #[test]
    fn test_short_notes_dropped() {
        let notes = deduplicate_notes(vec![block(NotePlace::Footnote, &["p.", " ", "2"])], false);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_length_checked_before_ordinal() {
        // "12 abc" has six characters, "abc" only three.
        let notes = deduplicate_notes(vec![block(NotePlace::Footnote, &["12", " ", "abc"])], false);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "abc");
        assert_eq!(notes[0].number, Some(12));
    }

    #[test]
    fn test_only_ascii_digits_are_ordinals() {
        let notes = deduplicate_notes(
            vec![block(NotePlace::Headnote, &["١٢", " ", "En-tête courant"])],
            false,
        );
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "١٢ En-tête courant");
        assert_eq!(notes[0].number, None);
        assert_eq!(notes[0].tokens.len(), 3);
    }

    #[test]
    fn test_dedup_is_per_place() {
        let blocks = vec![
            block(NotePlace::Headnote, &["CHU de Lyon"]),
            block(NotePlace::Footnote, &["CHU de Lyon"]),
            block(NotePlace::Footnote, &["CHU  de\nLyon"]),
        ];
        let notes = deduplicate_notes(blocks, false);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].place, NotePlace::Headnote);
        assert_eq!(notes[1].place, NotePlace::Footnote);
    }

    #[test]
    fn test_dehyphenized_text() {
        let notes = deduplicate_notes(
            vec![block(NotePlace::Footnote, &["Service de cardio-\nlogie"])],
            true,
        );
        assert_eq!(notes[0].text, "Service de cardiologie");
        assert!(notes[0].id.is_some());
    }

    #[test]
    fn test_strip_ordinal_tokens_split_digits() {
        let tokens = vec![
            LabeledToken::new("1", "<note>", 0),
            LabeledToken::new("2", "<note>", 1),
            LabeledToken::new(" ", "<note>", 2),
            LabeledToken::new("Texte", "<note>", 3),
        ];
        let rest = strip_ordinal_tokens(tokens, "12");
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].text, "Texte");

        let tokens = vec![LabeledToken::new("Page", "<note>", 0)];
        assert_eq!(strip_ordinal_tokens(tokens, "3").len(), 1);
    }
}
