//! Span annotation model
//!
//! Spans are anchored by content: each stores the literal text it marks and
//! is located in its document by substring search at render time.

mod behavior;
mod export;
mod span;
mod store;

pub use behavior::{Behavior, Score};
pub use export::{AnnotationExport, ExportedSpan};
pub use span::{Span, SpanId};
pub use store::{DocumentAnnotations, SpanStore};
