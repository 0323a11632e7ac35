//! Reasoning trace documents
//!
//! Traces are loaded from a JSON array:
//!
//! ```text
//! [
//!   { "id": "trace_001", "question": "...", "reasoning": "..." }
//! ]
//! ```
//!
//! With no file, a small built-in sample set is used.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AnnotatorError, Result};

/// A single trace; immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    /// Trace identifier, used as the export key
    pub id: String,
    /// The question the trace answers (display only)
    #[serde(default)]
    pub question: String,
    /// The trace text that spans are anchored to
    #[serde(alias = "reasoning")]
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, question: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            text: text.into(),
        }
    }
}

/// Ordered set of documents plus the index of the one being displayed
#[derive(Debug, Clone)]
pub struct DocumentSet {
    documents: Vec<Document>,
    current: usize,
}

impl DocumentSet {
    /// Build a set, rejecting empty input and duplicate ids
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        if documents.is_empty() {
            return Err(AnnotatorError::InvalidArgument(
                "no traces to annotate".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for doc in &documents {
            if !seen.insert(doc.id.as_str()) {
                return Err(AnnotatorError::InvalidArgument(format!(
                    "duplicate trace id: {}",
                    doc.id
                )));
            }
        }

        Ok(Self {
            documents,
            current: 0,
        })
    }

    /// Load traces from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let set = Self::from_json(&contents)?;
        tracing::info!(path = %path.display(), traces = set.len(), "traces loaded");
        Ok(set)
    }

    /// Parse traces from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let documents: Vec<Document> = serde_json::from_str(json)?;
        Self::new(documents)
    }

    /// The built-in sample traces
    pub fn samples() -> Self {
        Self {
            documents: sample_documents(),
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Index of the displayed document
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The displayed document
    pub fn current(&self) -> &Document {
        &self.documents[self.current]
    }

    pub fn get(&self, idx: usize) -> Option<&Document> {
        self.documents.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Move to the next document; returns false at the last one
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.documents.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous document; returns false at the first one
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}

fn sample_documents() -> Vec<Document> {
    vec![
        Document::new(
            "trace_001",
            "What is the capital of France?",
            "Let me think about this question. France is a country in Europe. \
             The capital city is where the government is located. Paris is the \
             largest city in France and serves as its capital. Therefore, the \
             answer is Paris.",
        ),
        Document::new(
            "trace_002",
            "If a train travels 120 miles in 2 hours, what is its average speed?",
            "To find average speed, I need to divide distance by time. The train \
             traveled 120 miles in 2 hours. So the calculation is 120 ÷ 2 = 60. \
             The average speed is 60 miles per hour.",
        ),
        Document::new(
            "trace_003",
            "What are the primary colors?",
            "Primary colors are the base colors that cannot be created by mixing \
             other colors. In traditional color theory, the primary colors are \
             red, yellow, and blue. These three colors can be mixed to create all \
             other colors on the color wheel.",
        ),
    ]
}
