//! Highlight resolution and styling
//!
//! This module turns a document's annotated spans into render segments:
//! - Resolving overlapping, repeated spans into a single partition
//! - Mapping positions back to the spans that cover them
//! - Styling segments for the terminal

mod resolver;
mod segment;
mod style;

pub use resolver::{occurrences, resolve, spans_at, Occurrences};
pub use segment::{HighlightTag, Segment};
pub use style::{Color, Style};
