//! Span store
//!
//! Owns every span created during the session, grouped per document.
//! Operations referencing an unknown document or span are silent no-ops so
//! that a stray delete or activation never disturbs captured work.

use std::collections::HashMap;

use super::behavior::{Behavior, Score};
use super::export::{AnnotationExport, ExportedSpan};
use super::span::{Span, SpanId};
use crate::error::{AnnotatorError, Result};

/// The spans of a single document, in creation order
#[derive(Debug, Clone, Default)]
pub struct DocumentAnnotations {
    spans: Vec<Span>,
}

impl DocumentAnnotations {
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    fn position(&self, span_id: SpanId) -> Option<usize> {
        self.spans.iter().position(|s| s.id() == span_id)
    }
}

/// Session-wide span container keyed by document id
#[derive(Debug, Default)]
pub struct SpanStore {
    /// Annotations per document
    documents: HashMap<String, DocumentAnnotations>,
    /// Document ids in the order their annotations were first created
    order: Vec<String>,
    /// Active span per document
    active: HashMap<String, SpanId>,
    /// Last id handed out
    last_id: u64,
}

impl SpanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new span to a document, creating its annotations on first use
    ///
    /// The text is not checked against the document. A span whose text never
    /// occurs simply never highlights.
    pub fn add(
        &mut self,
        document_id: &str,
        text: impl Into<String>,
        behavior: Behavior,
        score: Score,
    ) -> Result<SpanId> {
        let text = text.into();
        if text.is_empty() {
            return Err(AnnotatorError::InvalidArgument(
                "span text must not be empty".to_string(),
            ));
        }

        self.last_id += 1;
        let id = SpanId(self.last_id);

        if !self.documents.contains_key(document_id) {
            self.order.push(document_id.to_string());
        }
        let annotations = self.documents.entry(document_id.to_string()).or_default();
        annotations.spans.push(Span::new(id, text, behavior, score));

        tracing::debug!(document = document_id, span_id = id.0, %behavior, %score, "span added");
        Ok(id)
    }

    /// Remove a span; unknown documents or ids are ignored
    pub fn remove(&mut self, document_id: &str, span_id: SpanId) {
        let Some(annotations) = self.documents.get_mut(document_id) else {
            return;
        };
        let Some(idx) = annotations.position(span_id) else {
            return;
        };

        annotations.spans.remove(idx);
        if self.active.get(document_id) == Some(&span_id) {
            self.active.remove(document_id);
        }

        tracing::debug!(document = document_id, span_id = span_id.0, "span removed");
    }

    /// Replace the active span for a document (None clears it)
    pub fn set_active(&mut self, document_id: &str, span_id: Option<SpanId>) {
        match span_id {
            Some(id) => {
                self.active.insert(document_id.to_string(), id);
            }
            None => {
                self.active.remove(document_id);
            }
        }
        tracing::trace!(document = document_id, span_id = ?span_id.map(|id| id.0), "active span set");
    }

    /// Clear the active span for a document
    pub fn clear_active(&mut self, document_id: &str) {
        self.set_active(document_id, None);
    }

    /// Current active span for a document
    pub fn active(&self, document_id: &str) -> Option<SpanId> {
        self.active.get(document_id).copied()
    }

    /// Spans of a document in insertion order (empty if none were ever added)
    pub fn list(&self, document_id: &str) -> &[Span] {
        self.documents
            .get(document_id)
            .map(|a| a.spans())
            .unwrap_or(&[])
    }

    /// Look up a single span
    pub fn get(&self, document_id: &str, span_id: SpanId) -> Option<&Span> {
        self.list(document_id).iter().find(|s| s.id() == span_id)
    }

    /// Annotations for a document, if any were ever created
    pub fn annotations(&self, document_id: &str) -> Option<&DocumentAnnotations> {
        self.documents.get(document_id)
    }

    /// Total number of spans across all documents
    pub fn span_count(&self) -> usize {
        self.documents.values().map(|a| a.spans.len()).sum()
    }

    /// Number of documents that have (or had) annotations
    pub fn document_count(&self) -> usize {
        self.order.len()
    }

    /// Id-less projection of every document's spans, in insertion order
    pub fn export_all(&self) -> AnnotationExport {
        let documents = self
            .order
            .iter()
            .map(|doc_id| {
                let spans = self
                    .list(doc_id)
                    .iter()
                    .map(|s| ExportedSpan::new(s.text(), s.behavior(), s.score()))
                    .collect();
                (doc_id.clone(), spans)
            })
            .collect();
        AnnotationExport::new(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_two_spans() -> (SpanStore, SpanId, SpanId) {
        let mut store = SpanStore::new();
        let a = store
            .add("trace_001", "capital", Behavior::LogicalReasoning, Score::One)
            .unwrap();
        let b = store
            .add("trace_001", "Paris", Behavior::MemoryRecall, Score::Two)
            .unwrap();
        (store, a, b)
    }

    #[test]
    fn test_add_preserves_order() {
        let (store, a, b) = store_with_two_spans();
        let spans = store.list("trace_001");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].id(), a);
        assert_eq!(spans[1].id(), b);
        assert_eq!(spans[0].text(), "capital");
        assert_eq!(spans[1].behavior(), Behavior::MemoryRecall);
    }

    #[test]
    fn test_ids_unique_across_documents() {
        let mut store = SpanStore::new();
        let a = store.add("a", "x", Behavior::default(), Score::One).unwrap();
        let b = store.add("b", "x", Behavior::default(), Score::One).unwrap();
        let c = store.add("a", "y", Behavior::default(), Score::One).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_add_empty_text_rejected() {
        let (mut store, _, _) = store_with_two_spans();
        let result = store.add("trace_001", "", Behavior::ErrorDetection, Score::One);
        assert!(matches!(result, Err(AnnotatorError::InvalidArgument(_))));
        assert_eq!(store.list("trace_001").len(), 2);
    }

    #[test]
    fn test_add_empty_text_does_not_create_document() {
        let mut store = SpanStore::new();
        assert!(store.add("fresh", "", Behavior::default(), Score::One).is_err());
        assert!(store.annotations("fresh").is_none());
        assert_eq!(store.document_count(), 0);
    }

    #[test]
    fn test_remove() {
        let (mut store, a, b) = store_with_two_spans();
        store.remove("trace_001", a);
        let spans = store.list("trace_001");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].id(), b);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = SpanStore::new();
        store.remove("trace_001", SpanId(9999));
        assert!(store.list("trace_001").is_empty());

        let (mut store, a, _) = store_with_two_spans();
        store.set_active("trace_001", Some(a));
        store.remove("trace_001", SpanId(9999));
        store.remove("other", a);
        assert_eq!(store.list("trace_001").len(), 2);
        assert_eq!(store.active("trace_001"), Some(a));
    }

    #[test]
    fn test_remove_active_clears_selection() {
        let (mut store, a, b) = store_with_two_spans();
        store.set_active("trace_001", Some(a));
        store.remove("trace_001", b);
        assert_eq!(store.active("trace_001"), Some(a));
        store.remove("trace_001", a);
        assert_eq!(store.active("trace_001"), None);
    }

    #[test]
    fn test_document_survives_emptying() {
        let (mut store, a, b) = store_with_two_spans();
        store.remove("trace_001", a);
        store.remove("trace_001", b);
        let annotations = store.annotations("trace_001").unwrap();
        assert!(annotations.is_empty());
        assert_eq!(store.document_count(), 1);
    }

    #[test]
    fn test_set_active_replaces() {
        let (mut store, a, b) = store_with_two_spans();
        store.set_active("trace_001", Some(a));
        store.set_active("trace_001", Some(b));
        assert_eq!(store.active("trace_001"), Some(b));
        store.clear_active("trace_001");
        assert_eq!(store.active("trace_001"), None);
    }

    #[test]
    fn test_active_is_per_document() {
        let (mut store, a, _) = store_with_two_spans();
        let c = store.add("trace_002", "speed", Behavior::Decomposition, Score::One).unwrap();
        store.set_active("trace_001", Some(a));
        store.set_active("trace_002", Some(c));
        assert_eq!(store.active("trace_001"), Some(a));
        assert_eq!(store.active("trace_002"), Some(c));
    }

    #[test]
    fn test_get_and_counts() {
        let (mut store, a, _) = store_with_two_spans();
        store.add("trace_003", "red", Behavior::MemoryRecall, Score::One).unwrap();
        assert_eq!(store.get("trace_001", a).map(|s| s.text()), Some("capital"));
        assert!(store.get("trace_003", a).is_none());
        assert_eq!(store.span_count(), 3);
        assert_eq!(store.document_count(), 2);
    }

    #[test]
    fn test_export_order_and_projection() {
        let mut store = SpanStore::new();
        store.add("trace_002", "120 ÷ 2", Behavior::Decomposition, Score::Two).unwrap();
        let first = store.add("trace_001", "capital", Behavior::LogicalReasoning, Score::One).unwrap();
        store.add("trace_001", "Paris", Behavior::MemoryRecall, Score::Two).unwrap();
        store.remove("trace_001", first);
        store.add("trace_001", "Europe", Behavior::CausalInference, Score::One).unwrap();

        let export = store.export_all();
        let ids: Vec<_> = export.document_ids().collect();
        assert_eq!(ids, vec!["trace_002", "trace_001"]);

        let spans = export.spans("trace_001").unwrap();
        assert_eq!(
            spans,
            &[
                ExportedSpan::new("Paris", Behavior::MemoryRecall, Score::Two),
                ExportedSpan::new("Europe", Behavior::CausalInference, Score::One),
            ]
        );
    }
}
