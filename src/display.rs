//! Display rendering
//!
//! Screen layout, top to bottom: a header with the trace position and id,
//! the question, the wrapped trace text with highlights, the annotation
//! panel, and the minibuffer on the last row.

use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::Result;
use crate::highlight::{HighlightTag, Segment, Style};
use crate::layout;
use crate::session::Session;
use crate::terminal::Terminal;

/// Rows above the trace text
const HEADER_ROWS: usize = 2;
/// Most annotation rows shown in the panel
const LIST_ROWS: usize = 5;

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Key binding list, one line per command
    help: Vec<String>,
}

impl Display {
    pub fn new(help: Vec<String>) -> Self {
        Self {
            needs_redraw: true,
            help,
        }
    }

    /// Mark that a full redraw is needed
    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Rows in the panel body (annotation list or key bindings)
    fn body_rows(&self, session: &Session, rows: usize) -> usize {
        if session.show_help {
            self.help.len().min(rows / 2).max(1)
        } else {
            session.spans().len().clamp(1, LIST_ROWS)
        }
    }

    /// Rows below the trace text, minibuffer included
    fn footer_rows(&self, session: &Session, rows: usize) -> usize {
        // mode line, selection, body, active details, minibuffer
        self.body_rows(session, rows) + 4
    }

    /// Rows available for the trace text
    pub fn text_height(&self, session: &Session, rows: usize) -> usize {
        rows.saturating_sub(HEADER_ROWS + self.footer_rows(session, rows))
            .max(1)
    }

    /// Render the whole screen
    pub fn render(&mut self, terminal: &mut Terminal, session: &Session) -> Result<()> {
        let cols = terminal.cols() as usize;
        let rows = terminal.rows() as usize;

        if self.needs_redraw {
            terminal.clear_screen()?;
        }
        terminal.set_cursor_visible(false)?;

        self.render_header(terminal, session, cols)?;

        let height = self.text_height(session, rows);
        let lines = session.layout();
        self.render_trace(terminal, session, &lines, height, cols)?;

        let mut row = HEADER_ROWS + height;
        row = self.render_panel(terminal, session, row, rows, cols)?;
        self.render_minibuffer(terminal, session, row.min(rows.saturating_sub(1)), cols)?;

        if session.prompt.active {
            let col = session.message().map_or(0, UnicodeWidthStr::width);
            terminal.move_cursor(rows.saturating_sub(1) as u16, col.min(cols.saturating_sub(1)) as u16)?;
        } else {
            let (line, col) = layout::locate(&lines, session.text(), session.view.cursor());
            let screen_row = HEADER_ROWS + line.saturating_sub(session.view.top_row());
            terminal.move_cursor(screen_row as u16, col.min(cols.saturating_sub(1)) as u16)?;
        }

        terminal.set_cursor_visible(true)?;
        terminal.flush()?;

        self.needs_redraw = false;
        Ok(())
    }

    /// Render the position bar and the question
    fn render_header(&self, terminal: &mut Terminal, session: &Session, cols: usize) -> Result<()> {
        let doc = session.document();
        let bar = format!(
            "-- Question {} of {}: {} ",
            session.documents.current_index() + 1,
            session.documents.len(),
            doc.id
        );

        terminal.move_cursor(0, 0)?;
        terminal.set_reverse(true)?;
        terminal.write_str(&pad_to_width(&bar, cols, '-'))?;
        terminal.set_reverse(false)?;

        terminal.move_cursor(1, 0)?;
        terminal.set_bold(true)?;
        terminal.write_str(&truncate_to_width(&doc.question, cols))?;
        terminal.set_bold(false)?;
        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Render the visible rows of the wrapped trace text
    fn render_trace(
        &self,
        terminal: &mut Terminal,
        session: &Session,
        lines: &[Range<usize>],
        height: usize,
        cols: usize,
    ) -> Result<()> {
        let text = session.text();
        let segments = session.segments();
        let region = session.view.region();
        let top = session.view.top_row();

        for offset in 0..height {
            terminal.move_cursor((HEADER_ROWS + offset) as u16, 0)?;

            if let Some(line) = lines.get(top + offset) {
                let mut used = 0;
                for (range, style) in styled_runs(line.clone(), &segments, region.clone()) {
                    let piece = text[range].trim_end_matches('\n');
                    let shown = truncate_to_width(piece, cols.saturating_sub(used));
                    if shown.is_empty() {
                        continue;
                    }
                    used += UnicodeWidthStr::width(shown.as_str());
                    if style.is_default() {
                        terminal.write_str(&shown)?;
                    } else {
                        terminal.apply_style(&style)?;
                        terminal.write_str(&shown)?;
                        terminal.reset_attributes()?;
                    }
                }
            }

            terminal.clear_to_eol()?;
        }

        Ok(())
    }

    /// Render the annotation panel starting at `row`; returns the next free row
    fn render_panel(
        &self,
        terminal: &mut Terminal,
        session: &Session,
        mut row: usize,
        rows: usize,
        cols: usize,
    ) -> Result<usize> {
        let spans = session.spans();

        // Mode line
        let modified = if session.is_modified() { "**" } else { "--" };
        let mode_line = format!(
            "{} {} annotations -- Behavior: {} -- Score: {} ",
            modified,
            spans.len(),
            session.view.behavior,
            session.view.score
        );
        terminal.move_cursor(row as u16, 0)?;
        terminal.set_reverse(true)?;
        terminal.write_str(&pad_to_width(&mode_line, cols, '-'))?;
        terminal.set_reverse(false)?;
        row += 1;

        // Pending selection
        terminal.move_cursor(row as u16, 0)?;
        match session.view.selection(session.text()) {
            Some(selected) => {
                let line = format!("Selected: \"{}\"  (RET to annotate)", selected);
                terminal.write_str(&truncate_to_width(&line, cols))?;
            }
            None => {
                terminal.set_dim(true)?;
                terminal.write_str(&truncate_to_width(
                    "No selection: C-SPC sets the mark, / selects a pattern",
                    cols,
                ))?;
                terminal.set_dim(false)?;
            }
        }
        terminal.clear_to_eol()?;
        row += 1;

        // Body
        let body_rows = self.body_rows(session, rows);
        let body: Vec<(String, bool)> = if session.show_help {
            self.help.iter().take(body_rows).map(|l| (l.clone(), false)).collect()
        } else {
            annotation_rows(session, body_rows)
        };
        for i in 0..body_rows {
            terminal.move_cursor((row + i) as u16, 0)?;
            match body.get(i) {
                Some((line, true)) => {
                    terminal.apply_style(&Style::for_text(HighlightTag::Active, false))?;
                    terminal.write_str(&truncate_to_width(line, cols))?;
                    terminal.reset_attributes()?;
                }
                Some((line, false)) => terminal.write_str(&truncate_to_width(line, cols))?,
                None => {
                    terminal.set_dim(true)?;
                    terminal.write_str(&truncate_to_width("No annotations for this trace", cols))?;
                    terminal.set_dim(false)?;
                }
            }
            terminal.clear_to_eol()?;
        }
        row += body_rows;

        // Active span details
        terminal.move_cursor(row as u16, 0)?;
        match session.active_span() {
            Some(span) => {
                let line = format!(
                    "Active {}: Behavior: {}  Score: {}",
                    span.id(),
                    span.behavior(),
                    span.score()
                );
                terminal.write_str(&truncate_to_width(&line, cols))?;
            }
            None => {
                terminal.set_dim(true)?;
                terminal.write_str(&truncate_to_width(
                    "No active annotation: TAB cycles, a activates at point, ? for help",
                    cols,
                ))?;
                terminal.set_dim(false)?;
            }
        }
        terminal.clear_to_eol()?;

        Ok(row + 1)
    }

    /// Render the minibuffer (message area)
    fn render_minibuffer(
        &self,
        terminal: &mut Terminal,
        session: &Session,
        row: usize,
        cols: usize,
    ) -> Result<()> {
        terminal.move_cursor(row as u16, 0)?;

        if let Some(msg) = session.message() {
            terminal.write_str(&truncate_to_width(msg, cols))?;
        }

        terminal.clear_to_eol()?;
        Ok(())
    }
}

/// Annotation list rows as (line, is_active), scrolled to keep the active one visible
fn annotation_rows(session: &Session, max_rows: usize) -> Vec<(String, bool)> {
    let spans = session.spans();
    let active = session.active();
    let active_idx = active.and_then(|a| spans.iter().position(|s| s.id() == a));
    let first = active_idx.map_or(0, |i| (i + 1).saturating_sub(max_rows));

    spans
        .iter()
        .enumerate()
        .skip(first)
        .take(max_rows)
        .map(|(i, span)| {
            let is_active = Some(span.id()) == active;
            let marker = if is_active { '>' } else { ' ' };
            let line = format!(
                "{}{:>3}. \"{}\"  {} ({})",
                marker,
                i + 1,
                span.text(),
                span.behavior(),
                span.score()
            );
            (line, is_active)
        })
        .collect()
}

/// Split one wrapped row into runs of uniform style
///
/// `line` is a byte range of the text the segments were resolved from.
/// Runs cover `line` exactly and are split wherever the highlight tag or
/// membership in the selection region changes.
pub(crate) fn styled_runs(
    line: Range<usize>,
    segments: &[Segment<'_>],
    region: Option<Range<usize>>,
) -> Vec<(Range<usize>, Style)> {
    let mut runs = Vec::new();
    let mut seg_start = 0;

    for segment in segments {
        let seg = seg_start..seg_start + segment.len();
        seg_start = seg.end;

        let start = seg.start.max(line.start);
        let end = seg.end.min(line.end);
        if start >= end {
            continue;
        }

        let mut cuts = vec![start, end];
        if let Some(r) = &region {
            for edge in [r.start, r.end] {
                if edge > start && edge < end {
                    cuts.push(edge);
                }
            }
        }
        cuts.sort_unstable();
        cuts.dedup();

        for pair in cuts.windows(2) {
            let in_region = region
                .as_ref()
                .is_some_and(|r| r.start <= pair[0] && pair[1] <= r.end && r.start < r.end);
            runs.push((pair[0]..pair[1], Style::for_text(segment.tag(), in_region)));
        }
    }

    runs
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result
}

/// Pad with `fill` (or truncate) to exactly `width` columns
fn pad_to_width(s: &str, width: usize, fill: char) -> String {
    let mut result = truncate_to_width(s, width);
    let used = UnicodeWidthStr::width(result.as_str());
    result.extend(std::iter::repeat(fill).take(width.saturating_sub(used)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Score;
    use crate::config::Config;
    use crate::document::DocumentSet;
    use crate::highlight;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("hi", 10), "hi");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("ab", 5, '-'), "ab---");
        assert_eq!(pad_to_width("abcdef", 3, '-'), "abc");
    }

    #[test]
    fn test_styled_runs_cover_line() {
        let text = "France is in Europe. Paris is in France.";
        let spans = vec![crate::annotation::Span::new(
            crate::annotation::SpanId(1),
            "France".to_string(),
            Default::default(),
            Score::One,
        )];
        let segments = highlight::resolve(text, &spans, None);

        let runs = styled_runs(3..25, &segments, Some(10..15));
        assert_eq!(runs.first().unwrap().0.start, 3);
        assert_eq!(runs.last().unwrap().0.end, 25);
        for pair in runs.windows(2) {
            assert_eq!(pair[0].0.end, pair[1].0.start);
        }

        // Highlight tail of the first "France"
        assert_eq!(runs[0].0, 3..6);
        assert_eq!(runs[0].1, Style::for_text(HighlightTag::Highlighted, false));
        // Region boundaries split the plain stretch
        let region_run = runs.iter().find(|(r, _)| *r == (10..15)).unwrap();
        assert_eq!(region_run.1, Style::for_text(HighlightTag::None, true));
    }

    #[test]
    fn test_styled_runs_active() {
        let text = "abc abc";
        let spans = vec![crate::annotation::Span::new(
            crate::annotation::SpanId(7),
            "abc".to_string(),
            Default::default(),
            Score::Two,
        )];
        let segments = highlight::resolve(text, &spans, Some(crate::annotation::SpanId(7)));
        let runs = styled_runs(0..text.len(), &segments, None);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].1, Style::for_text(HighlightTag::Active, false));
        assert!(runs[1].1.is_default());
        assert_eq!(runs[2].1, Style::for_text(HighlightTag::Active, false));
    }

    #[test]
    fn test_text_height_leaves_room_for_panel() {
        let session = Session::new(DocumentSet::samples(), Config::default());
        let display = Display::new(vec!["a".into(), "b".into()]);
        // 2 header + 5 footer (one empty-list row)
        assert_eq!(display.text_height(&session, 24), 17);
        assert_eq!(display.text_height(&session, 3), 1);
    }

    #[test]
    fn test_annotation_rows_follow_active() {
        let mut session = Session::new(DocumentSet::samples(), Config::default());
        for word in ["Let", "me", "think", "about", "this", "question", "France"] {
            session.select_pattern(word).unwrap();
            session.submit_selection().unwrap();
        }
        let rows = annotation_rows(&session, LIST_ROWS);
        assert_eq!(rows.len(), LIST_ROWS);
        assert!(rows[0].0.contains("\"Let\""));

        session.cycle_active(false);
        let rows = annotation_rows(&session, LIST_ROWS);
        assert!(rows.last().unwrap().1);
        assert!(rows.last().unwrap().0.starts_with(">  7."));
    }
}
