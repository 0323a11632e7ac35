//! View state - cursor, mark and annotation form for the displayed trace
//!
//! The selection is the region between mark and cursor, trimmed of
//! surrounding whitespace. It is transient: switching traces resets it.

use std::ops::Range;

use crate::annotation::{Behavior, Score};

/// Per-view state threaded through commands and rendering
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Cursor position (byte offset into the trace text)
    cursor: usize,
    /// Mark position, if set
    mark: Option<usize>,
    /// Goal column for vertical movement
    goal_col: Option<usize>,
    /// First visible row of the wrapped trace
    top_row: usize,
    /// Behavior chosen for the next annotation
    pub behavior: Behavior,
    /// Score chosen for the next annotation
    pub score: Score,
}

impl ViewState {
    pub fn new(behavior: Behavior, score: Score) -> Self {
        Self {
            cursor: 0,
            mark: None,
            goal_col: None,
            top_row: 0,
            behavior,
            score,
        }
    }

    /// Forget cursor, mark and scroll position; keeps the chosen label and score
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.mark = None;
        self.goal_col = None;
        self.top_row = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, snapping back to a char boundary
    pub fn set_cursor(&mut self, text: &str, offset: usize) {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        self.cursor = offset;
    }

    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    /// Set the mark at the cursor
    pub fn set_mark(&mut self) {
        self.mark = Some(self.cursor);
    }

    pub fn clear_mark(&mut self) {
        self.mark = None;
    }

    /// Swap cursor and mark; false when no mark is set
    pub fn exchange_point_and_mark(&mut self) -> bool {
        match self.mark {
            Some(mark) => {
                self.mark = Some(self.cursor);
                self.cursor = mark;
                true
            }
            None => false,
        }
    }

    pub fn goal_col(&self) -> Option<usize> {
        self.goal_col
    }

    pub fn set_goal_col(&mut self, col: Option<usize>) {
        self.goal_col = col;
    }

    pub fn top_row(&self) -> usize {
        self.top_row
    }

    /// Scroll so that `row` is visible in a window of `height` rows
    pub fn scroll_to(&mut self, row: usize, height: usize) {
        let height = height.max(1);
        if row < self.top_row {
            self.top_row = row;
        } else if row >= self.top_row + height {
            self.top_row = row + 1 - height;
        }
    }

    /// Region between mark and cursor (normalized so start <= end)
    pub fn region(&self) -> Option<Range<usize>> {
        let mark = self.mark?;
        if mark <= self.cursor {
            Some(mark..self.cursor)
        } else {
            Some(self.cursor..mark)
        }
    }

    /// Select a range: mark at its start, cursor at its end
    pub fn select(&mut self, text: &str, range: Range<usize>) {
        self.set_cursor(text, range.start);
        self.set_mark();
        self.set_cursor(text, range.end);
        self.goal_col = None;
    }

    /// The candidate span text: the region, trimmed; None if blank
    pub fn selection<'a>(&self, text: &'a str) -> Option<&'a str> {
        let region = self.region()?;
        let selected = text.get(region)?.trim();
        if selected.is_empty() {
            None
        } else {
            Some(selected)
        }
    }

    /// Move forward one character
    pub fn forward_char(&mut self, text: &str) -> bool {
        match text[self.cursor..].chars().next() {
            Some(ch) => {
                self.cursor += ch.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Move backward one character
    pub fn backward_char(&mut self, text: &str) -> bool {
        match text[..self.cursor].chars().next_back() {
            Some(ch) => {
                self.cursor -= ch.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Move to the end of the current or next word
    pub fn forward_word(&mut self, text: &str) -> bool {
        let start = self.cursor;
        let rest = &text[start..];
        let mut chars = rest.char_indices().skip_while(|(_, c)| !c.is_alphanumeric());
        let end = chars
            .find(|(_, c)| !c.is_alphanumeric())
            .map_or(text.len(), |(i, _)| start + i);
        self.cursor = end;
        end != start
    }

    /// Move to the start of the current or previous word
    pub fn backward_word(&mut self, text: &str) -> bool {
        let end = self.cursor;
        let before = &text[..end];
        let mut chars = before
            .char_indices()
            .rev()
            .skip_while(|(_, c)| !c.is_alphanumeric());
        let start = chars
            .find(|(_, c)| !c.is_alphanumeric())
            .map_or(0, |(i, c)| i + c.len_utf8());
        self.cursor = start;
        start != end
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Behavior::default(), Score::default())
    }
}
