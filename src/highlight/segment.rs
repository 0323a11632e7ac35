//! Render segments produced by the highlight resolver

/// Per-position highlight state, ordered by precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HighlightTag {
    /// Not covered by any span occurrence
    #[default]
    None,
    /// Covered by at least one span occurrence
    Highlighted,
    /// Covered by an occurrence of the active span
    Active,
}

/// A maximal run of document text sharing one highlight state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Slice of the document text
    pub text: &'a str,
    /// Covered by some span
    pub highlighted: bool,
    /// Covered by the active span (implies `highlighted`)
    pub active: bool,
}

impl<'a> Segment<'a> {
    /// Create a segment for a run with the given tag
    pub fn new(text: &'a str, tag: HighlightTag) -> Self {
        Self {
            text,
            highlighted: tag != HighlightTag::None,
            active: tag == HighlightTag::Active,
        }
    }

    /// Create an unhighlighted segment
    pub fn plain(text: &'a str) -> Self {
        Self::new(text, HighlightTag::None)
    }

    /// The tag this segment was built from
    pub fn tag(&self) -> HighlightTag {
        match (self.highlighted, self.active) {
            (_, true) => HighlightTag::Active,
            (true, false) => HighlightTag::Highlighted,
            (false, false) => HighlightTag::None,
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_precedence_order() {
        assert!(HighlightTag::None < HighlightTag::Highlighted);
        assert!(HighlightTag::Highlighted < HighlightTag::Active);
    }

    #[test]
    fn test_segment_flags() {
        let plain = Segment::plain("abc");
        assert!(!plain.highlighted && !plain.active);

        let active = Segment::new("abc", HighlightTag::Active);
        assert!(active.highlighted && active.active);
        assert_eq!(active.tag(), HighlightTag::Active);

        let highlighted = Segment::new("abc", HighlightTag::Highlighted);
        assert_eq!(highlighted.tag(), HighlightTag::Highlighted);
        assert_eq!(highlighted.len(), 3);
    }
}
