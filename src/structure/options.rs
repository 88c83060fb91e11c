//! Processing options and configuration.

use std::collections::HashSet;
use std::str::FromStr;

/// Options for structuring a report.
#[derive(Debug, Clone)]
pub struct ProcessingOptions {
    /// Split paragraphs into sentences
    pub segment_sentences: bool,

    /// Elements that receive page coordinates
    pub coordinates: HashSet<CoordinateTarget>,

    /// Generate random `xml:id` identifiers on nodes
    pub generate_ids: bool,

    /// Error handling mode for labels outside the taxonomy
    pub error_mode: ErrorMode,

    /// Language used when the input does not declare one
    pub default_language: String,

    /// Merge paragraphs cut by a figure or a table
    pub reconnect_paragraphs: bool,
}

impl ProcessingOptions {
    /// Create new processing options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable sentence segmentation.
    pub fn with_sentences(mut self, segment: bool) -> Self {
        self.segment_sentences = segment;
        self
    }

    /// Request coordinates for an element.
    pub fn with_coordinates(mut self, target: CoordinateTarget) -> Self {
        self.coordinates.insert(target);
        self
    }

    /// Request coordinates for every supported element.
    pub fn with_all_coordinates(mut self) -> Self {
        self.coordinates.extend(CoordinateTarget::ALL);
        self
    }

    /// Enable or disable random identifiers.
    pub fn with_ids(mut self, generate: bool) -> Self {
        self.generate_ids = generate;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on labels outside the taxonomy.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set the fallback language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Enable or disable paragraph reconnection.
    pub fn with_reconnection(mut self, reconnect: bool) -> Self {
        self.reconnect_paragraphs = reconnect;
        self
    }

    /// Check if coordinates are requested for an element.
    pub fn wants_coordinates(&self, target: CoordinateTarget) -> bool {
        self.coordinates.contains(&target)
    }
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            segment_sentences: false,
            coordinates: HashSet::new(),
            generate_ids: false,
            error_mode: ErrorMode::Lenient,
            default_language: "fr".to_string(),
            reconnect_paragraphs: true,
        }
    }
}

/// Error handling mode for unknown labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any label outside the taxonomy
    Strict,
    /// Drop unknown clusters and continue
    #[default]
    Lenient,
}

/// Element that can carry a `coords` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateTarget {
    /// Section headings (`head`)
    Head,
    /// Sentences (`s`)
    Sentence,
    /// Inline references (`ref`)
    Ref,
    /// Running notes (`note`)
    Note,
}

impl CoordinateTarget {
    /// Every supported target.
    pub const ALL: [CoordinateTarget; 4] = [
        CoordinateTarget::Head,
        CoordinateTarget::Sentence,
        CoordinateTarget::Ref,
        CoordinateTarget::Note,
    ];

    /// Parse a comma-separated element list (e.g., "head,s,ref").
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for CoordinateTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "head" => Ok(CoordinateTarget::Head),
            "s" => Ok(CoordinateTarget::Sentence),
            "ref" => Ok(CoordinateTarget::Ref),
            "note" => Ok(CoordinateTarget::Note),
            other => Err(format!("Unknown coordinate element: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_options_builder() {
        let options = ProcessingOptions::new()
            .with_sentences(true)
            .with_coordinates(CoordinateTarget::Sentence)
            .strict()
            .with_language("en");

        assert!(options.segment_sentences);
        assert!(options.wants_coordinates(CoordinateTarget::Sentence));
        assert!(!options.wants_coordinates(CoordinateTarget::Ref));
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.default_language, "en");
    }

    #[test]
    fn test_defaults() {
        let options = ProcessingOptions::default();
        assert!(!options.segment_sentences);
        assert!(options.coordinates.is_empty());
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.reconnect_paragraphs);
    }

    #[test]
    fn test_parse_coordinate_list() {
        let targets = CoordinateTarget::parse_list("head, s,ref").unwrap();
        assert_eq!(
            targets,
            vec![
                CoordinateTarget::Head,
                CoordinateTarget::Sentence,
                CoordinateTarget::Ref
            ]
        );
        assert!(CoordinateTarget::parse_list("head,figure").is_err());
        assert!(CoordinateTarget::parse_list("").unwrap().is_empty());
    }
}
