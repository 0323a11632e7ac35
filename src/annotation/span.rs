//! Annotated span type
//!
//! A span carries no offset. Its position in a document is found by
//! searching for `text` each time the document is rendered.

use super::behavior::{Behavior, Score};

/// Session-unique span identifier, minted monotonically by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanId(pub u64);

impl std::fmt::Display for SpanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A labelled, scored fragment of a document's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    id: SpanId,
    text: String,
    behavior: Behavior,
    score: Score,
}

impl Span {
    pub(crate) fn new(id: SpanId, text: String, behavior: Behavior, score: Score) -> Self {
        Self {
            id,
            text,
            behavior,
            score,
        }
    }

    pub fn id(&self) -> SpanId {
        self.id
    }

    /// The literal text this span anchors to
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn score(&self) -> Score {
        self.score
    }
}
