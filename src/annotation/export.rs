//! Annotation export
//!
//! Serializes the id-less projection of the span store as
//!
//! ```text
//! {
//!   "trace_001": {
//!     "spans": [
//!       ["capital", "Logical reasoning", 1]
//!     ]
//!   }
//! }
//! ```
//!
//! Documents keep the order their annotations were first created in.

use std::fs;
use std::path::Path;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use super::behavior::{Behavior, Score};
use crate::error::Result;

/// A span as it appears in an export: `[text, behavior, score]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedSpan(pub String, pub Behavior, pub Score);

impl ExportedSpan {
    pub fn new(text: impl Into<String>, behavior: Behavior, score: Score) -> Self {
        Self(text.into(), behavior, score)
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Export projection of every annotated document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationExport {
    documents: Vec<(String, Vec<ExportedSpan>)>,
}

impl AnnotationExport {
    pub fn new(documents: Vec<(String, Vec<ExportedSpan>)>) -> Self {
        Self { documents }
    }

    /// Document ids in export order
    pub fn document_ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|(id, _)| id.as_str())
    }

    /// Exported spans of one document
    pub fn spans(&self, document_id: &str) -> Option<&[ExportedSpan]> {
        self.documents
            .iter()
            .find(|(id, _)| id == document_id)
            .map(|(_, spans)| spans.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of exported spans
    pub fn span_count(&self) -> usize {
        self.documents.iter().map(|(_, spans)| spans.len()).sum()
    }

    /// Render as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pretty-printed JSON export to a file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        fs::write(path, json)?;
        tracing::info!(
            path = %path.display(),
            documents = self.documents.len(),
            spans = self.span_count(),
            "annotations exported"
        );
        Ok(())
    }
}

/// `{ "spans": [...] }` wrapper for one document
struct DocumentEntry<'a>(&'a [ExportedSpan]);

impl Serialize for DocumentEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut entry = serializer.serialize_struct("DocumentEntry", 1)?;
        entry.serialize_field("spans", self.0)?;
        entry.end()
    }
}

impl Serialize for AnnotationExport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.documents.len()))?;
        for (id, spans) in &self.documents {
            map.serialize_entry(id, &DocumentEntry(spans))?;
        }
        map.end()
    }
}
