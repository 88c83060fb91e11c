//! Error types for medstruct library.

use std::io;
use thiserror::Error;

/// Result type alias for medstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while structuring a report.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON input or failed JSON output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A label that is not a marker reached the marker dispatch.
    #[error("Unsupported marker type: {0}")]
    UnsupportedMarker(String),

    /// A label outside the taxonomy was met in strict mode.
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// A collaborator or resource required by the options is absent.
    #[error("Missing required resource: {0}")]
    MissingResource(String),

    /// The input bundle is inconsistent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during rendering (TEI, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}
