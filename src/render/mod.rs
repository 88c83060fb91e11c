//! Rendering module for converting structured reports to output formats.

mod json;
mod options;
mod result;
mod tei;
mod text;

pub use json::to_json;
pub use options::{JsonFormat, RenderOptions};
pub use result::{RenderResult, StructureStats};
pub use tei::{escape_xml, to_tei, to_tei_with_stats, TeiRenderer};
pub use text::to_text;
