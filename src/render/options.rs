//! Rendering options and configuration.

use chrono::{DateTime, Utc};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Options for rendering a structured report.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Emit the `teiHeader` (title, persons, application stamp)
    pub include_header: bool,

    /// Emit deduplicated running notes after the body divisions
    pub include_running_notes: bool,

    /// Spaces per nesting level (0 = no line breaks)
    pub indent: usize,

    /// `when` attribute of the application stamp
    pub timestamp: Option<DateTime<Utc>>,

    /// Emit `coords` attributes for elements that carry geometry
    pub include_coords: bool,

    /// Collect structure statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the TEI header.
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Enable or disable running notes.
    pub fn with_running_notes(mut self, include: bool) -> Self {
        self.include_running_notes = include;
        self
    }

    /// Set the indentation width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Render on a single line.
    pub fn compact(mut self) -> Self {
        self.indent = 0;
        self
    }

    /// Set the processing timestamp.
    pub fn with_timestamp(mut self, when: DateTime<Utc>) -> Self {
        self.timestamp = Some(when);
        self
    }

    /// Enable or disable `coords` attributes.
    pub fn with_coords(mut self, include: bool) -> Self {
        self.include_coords = include;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            include_running_notes: true,
            indent: 2,
            timestamp: None,
            include_coords: true,
            collect_stats: false,
        }
    }
}
