//! Word wrapping and cursor positioning for the trace view
//!
//! A layout is a list of byte ranges, one per screen row, that together
//! cover the text exactly. Soft breaks happen after spaces; a word wider
//! than the view is split at the last character that fits. Spaces at a
//! soft break stay at the end of the row they follow. A `\n` ends a row and
//! belongs to it.

use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap `text` into rows no wider than `width` display columns
pub fn wrap(text: &str, width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut start = 0;
    let mut col = 0;
    let mut last_break: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        if ch == '\n' {
            lines.push(start..i + 1);
            start = i + 1;
            col = 0;
            last_break = None;
            continue;
        }

        let w = UnicodeWidthChar::width(ch).unwrap_or(0);

        if col + w > width && i > start {
            if ch == ' ' {
                // Let trailing spaces hang past the edge
                col += w;
                last_break = Some(i + 1);
                continue;
            }

            let brk = match last_break {
                Some(b) if b > start => b,
                _ => i,
            };
            lines.push(start..brk);
            start = brk;
            col = UnicodeWidthStr::width(&text[start..i]);
            last_break = None;
        }

        col += w;
        if ch == ' ' {
            last_break = Some(i + 1);
        }
    }

    lines.push(start..text.len());
    lines
}

/// Screen row and column of a byte offset
pub fn locate(lines: &[Range<usize>], text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let row = lines
        .iter()
        .rposition(|line| line.start <= offset)
        .unwrap_or(0);
    let col = lines
        .get(row)
        .and_then(|line| text.get(line.start..offset))
        .map_or(0, UnicodeWidthStr::width);
    (row, col)
}

/// Byte offset closest to a goal column on a row
///
/// The result always locates back onto `row`.
pub fn offset_at(lines: &[Range<usize>], text: &str, row: usize, goal_col: usize) -> usize {
    let Some(line) = lines.get(row) else {
        return text.len();
    };
    let is_last = row + 1 == lines.len();

    let mut col = 0;
    let mut last_char_start = None;
    for (i, ch) in text[line.clone()].char_indices() {
        let pos = line.start + i;
        if ch == '\n' {
            return pos;
        }
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if col + w > goal_col {
            return pos;
        }
        col += w;
        last_char_start = Some(pos);
    }

    if is_last {
        line.end
    } else {
        last_char_start.unwrap_or(line.start)
    }
}
