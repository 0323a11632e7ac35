//! Behavior labels and scores attached to annotated spans
//!
//! The label set is fixed. Names are the strings written to exported
//! annotation files and accepted in the config file.

use serde::{Deserialize, Serialize};

use crate::error::{AnnotatorError, Result};

/// Cognitive behavior a span is labelled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Behavior {
    #[default]
    #[serde(rename = "Logical reasoning")]
    LogicalReasoning,
    #[serde(rename = "Pattern recognition")]
    PatternRecognition,
    #[serde(rename = "Memory recall")]
    MemoryRecall,
    #[serde(rename = "Causal inference")]
    CausalInference,
    #[serde(rename = "Hypothesis generation")]
    HypothesisGeneration,
    #[serde(rename = "Error detection")]
    ErrorDetection,
    #[serde(rename = "Analogical thinking")]
    AnalogicalThinking,
    #[serde(rename = "Decomposition")]
    Decomposition,
}

impl Behavior {
    /// All behaviors in menu order
    pub const ALL: [Behavior; 8] = [
        Behavior::LogicalReasoning,
        Behavior::PatternRecognition,
        Behavior::MemoryRecall,
        Behavior::CausalInference,
        Behavior::HypothesisGeneration,
        Behavior::ErrorDetection,
        Behavior::AnalogicalThinking,
        Behavior::Decomposition,
    ];

    /// Get the human-readable name for this behavior
    pub fn name(&self) -> &'static str {
        match self {
            Behavior::LogicalReasoning => "Logical reasoning",
            Behavior::PatternRecognition => "Pattern recognition",
            Behavior::MemoryRecall => "Memory recall",
            Behavior::CausalInference => "Causal inference",
            Behavior::HypothesisGeneration => "Hypothesis generation",
            Behavior::ErrorDetection => "Error detection",
            Behavior::AnalogicalThinking => "Analogical thinking",
            Behavior::Decomposition => "Decomposition",
        }
    }

    /// Parse a behavior from its name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }

    /// Next behavior in menu order, wrapping around
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous behavior in menu order, wrapping around
    pub fn previous(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&b| b == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Annotation score, either 1 or 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Score {
    #[default]
    One,
    Two,
}

impl Score {
    pub fn value(self) -> u8 {
        match self {
            Score::One => 1,
            Score::Two => 2,
        }
    }
}

impl TryFrom<u8> for Score {
    type Error = AnnotatorError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Score::One),
            2 => Ok(Score::Two),
            n => Err(AnnotatorError::InvalidArgument(format!(
                "score must be 1 or 2, got {}",
                n
            ))),
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.value()
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrip() {
        for behavior in Behavior::ALL {
            assert_eq!(Behavior::from_name(behavior.name()), Some(behavior));
        }
    }

    #[test]
    fn test_from_name_invalid() {
        assert_eq!(Behavior::from_name("Telepathy"), None);
        assert_eq!(Behavior::from_name("logical reasoning"), None);
        assert_eq!(Behavior::from_name(""), None);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Behavior::Decomposition.next(), Behavior::LogicalReasoning);
        assert_eq!(Behavior::LogicalReasoning.previous(), Behavior::Decomposition);
        assert_eq!(Behavior::MemoryRecall.next().previous(), Behavior::MemoryRecall);
    }

    #[test]
    fn test_score_conversion() {
        assert_eq!(Score::try_from(1).unwrap(), Score::One);
        assert_eq!(Score::try_from(2).unwrap(), Score::Two);
        assert!(matches!(
            Score::try_from(3),
            Err(AnnotatorError::InvalidArgument(_))
        ));
        assert!(Score::try_from(0).is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Behavior::CausalInference).unwrap();
        assert_eq!(json, "\"Causal inference\"");
        assert_eq!(serde_json::to_string(&Score::Two).unwrap(), "2");
        let score: Score = serde_json::from_str("1").unwrap();
        assert_eq!(score, Score::One);
        assert!(serde_json::from_str::<Score>("7").is_err());
    }
}
