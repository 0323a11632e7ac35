//! Highlight resolution
//!
//! Maps a document's spans onto a non-overlapping partition of its text.
//! Every occurrence of every span's text is tagged, overlapping occurrences
//! included (after a match at `s` the search resumes at the next character
//! after `s`, not after the match). The active span is then tagged again
//! with higher precedence, so activation always wins over plain highlight.
//!
//! Positions are byte offsets. Matches start and end on char boundaries,
//! so every run boundary does too.

use std::ops::Range;

use super::segment::{HighlightTag, Segment};
use crate::annotation::{Span, SpanId};

/// Iterator over every occurrence of a needle, overlapping ones included
pub struct Occurrences<'h, 'n> {
    haystack: &'h str,
    needle: &'n str,
    /// Next search position, always a char boundary
    pos: usize,
    done: bool,
}

impl Iterator for Occurrences<'_, '_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        if self.done {
            return None;
        }

        let rest = match self.haystack.get(self.pos..) {
            Some(rest) => rest,
            None => {
                self.done = true;
                return None;
            }
        };

        match rest.find(self.needle) {
            Some(offset) => {
                let start = self.pos + offset;
                let step = self.haystack[start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.pos = start + step;
                Some(start..start + self.needle.len())
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Find every occurrence of `needle` in `haystack`
///
/// An empty needle has no occurrences.
pub fn occurrences<'h, 'n>(haystack: &'h str, needle: &'n str) -> Occurrences<'h, 'n> {
    Occurrences {
        haystack,
        needle,
        pos: 0,
        done: needle.is_empty(),
    }
}

/// Resolve spans into render segments
///
/// The segments concatenate back to `text` exactly. An empty text yields no
/// segments; no spans yields the whole text as one plain segment. Spans whose
/// text does not occur in `text` have no effect, and an `active` id that is
/// not among `spans` is ignored.
pub fn resolve<'a>(text: &'a str, spans: &[Span], active: Option<SpanId>) -> Vec<Segment<'a>> {
    if text.is_empty() {
        return Vec::new();
    }
    if spans.is_empty() {
        return vec![Segment::plain(text)];
    }

    let mut tags = vec![HighlightTag::None; text.len()];

    for span in spans {
        raise(&mut tags, text, span.text(), HighlightTag::Highlighted);
    }

    if let Some(span) = active.and_then(|id| spans.iter().find(|s| s.id() == id)) {
        raise(&mut tags, text, span.text(), HighlightTag::Active);
    }

    coalesce(text, &tags)
}

/// Ids of spans with an occurrence covering a byte offset, in span order
pub fn spans_at(text: &str, spans: &[Span], offset: usize) -> Vec<SpanId> {
    spans
        .iter()
        .filter(|span| occurrences(text, span.text()).any(|r| r.contains(&offset)))
        .map(|span| span.id())
        .collect()
}

/// Raise tags under every occurrence of `needle`; tags never go down
fn raise(tags: &mut [HighlightTag], text: &str, needle: &str, tag: HighlightTag) {
    for range in occurrences(text, needle) {
        for t in &mut tags[range] {
            *t = (*t).max(tag);
        }
    }
}

/// Merge runs of equal tags into segments
fn coalesce<'a>(text: &'a str, tags: &[HighlightTag]) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut start = 0;

    for i in 1..=tags.len() {
        if i == tags.len() || tags[i] != tags[start] {
            segments.push(Segment::new(&text[start..i], tags[start]));
            start = i;
        }
    }

    segments
}
