//! trace-annotator - span annotation and highlighting for LLM reasoning traces
//!
//! The core is [`annotation::SpanStore`], which keeps labelled spans per
//! trace, and [`highlight::resolve`], which turns a trace and its spans into
//! render segments. Spans are anchored by content: every occurrence of a
//! span's text in the trace is highlighted. The remaining modules make up
//! the terminal annotator built on top of them.

pub mod annotation;
pub mod annotator;
pub mod command;
pub mod config;
pub mod display;
pub mod document;
pub mod error;
pub mod highlight;
pub mod input;
pub mod layout;
pub mod session;
pub mod terminal;
pub mod view;

pub use annotation::{Behavior, Score, Span, SpanId, SpanStore};
pub use error::{AnnotatorError, Result};
pub use highlight::{resolve, HighlightTag, Segment};
