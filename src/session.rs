//! Annotation session state
//!
//! Everything the commands operate on, minus the terminal: the traces, the
//! span store, the view of the displayed trace and the minibuffer. The
//! terminal front end owns a `Session` and renders it after every key.

use std::ops::Range;

use regex::Regex;

use crate::annotation::{Span, SpanId, SpanStore};
use crate::command::{CommandStatus, KeyTable};
use crate::config::Config;
use crate::document::{Document, DocumentSet};
use crate::error::{AnnotatorError, Result};
use crate::highlight::{self, Segment};
use crate::input::Key;
use crate::layout;
use crate::view::ViewState;

/// What to do when the prompt completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptAction {
    #[default]
    None,
    /// Select the next match of a regular expression
    SelectPattern,
    /// Single-key y/n answer to quit with unexported annotations
    ConfirmQuit,
}

/// Minibuffer prompt state
#[derive(Debug, Clone, Default)]
pub struct PromptState {
    /// Whether prompt is active
    pub active: bool,
    /// The prompt string (e.g., "Select pattern")
    pub prompt: String,
    /// Current input
    pub input: String,
    /// What to do when complete
    pub action: PromptAction,
    /// Value used when the input is left empty
    pub default: Option<String>,
}

/// Session state shared by commands and the renderer
pub struct Session {
    pub documents: DocumentSet,
    pub store: SpanStore,
    pub view: ViewState,
    pub config: Config,
    pub prompt: PromptState,
    /// Message shown on the bottom line
    message: Option<String>,
    /// Width the trace text is wrapped to
    text_width: usize,
    /// Last pattern used for selection (prompt default)
    last_pattern: Option<String>,
    /// Annotations changed since the last export
    modified: bool,
    /// Full screen redraw requested
    redraw: bool,
    /// Whether the key binding list is shown
    pub show_help: bool,
    /// Cleared by the quit command
    pub running: bool,
}

impl Session {
    pub fn new(documents: DocumentSet, config: Config) -> Self {
        let view = ViewState::new(config.default_behavior, config.default_score);
        Self {
            documents,
            store: SpanStore::new(),
            view,
            config,
            prompt: PromptState::default(),
            message: None,
            text_width: 80,
            last_pattern: None,
            modified: false,
            redraw: false,
            show_help: false,
            running: true,
        }
    }

    /// The displayed trace
    pub fn document(&self) -> &Document {
        self.documents.current()
    }

    /// Text of the displayed trace
    pub fn text(&self) -> &str {
        &self.documents.current().text
    }

    /// Spans of the displayed trace
    pub fn spans(&self) -> &[Span] {
        self.store.list(&self.documents.current().id)
    }

    /// Active span of the displayed trace
    pub fn active(&self) -> Option<SpanId> {
        self.store.active(&self.documents.current().id)
    }

    /// The active span itself
    pub fn active_span(&self) -> Option<&Span> {
        let id = self.active()?;
        self.store.get(&self.document().id, id)
    }

    /// Render segments for the displayed trace
    pub fn segments(&self) -> Vec<Segment<'_>> {
        highlight::resolve(self.text(), self.spans(), self.active())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Whether a full redraw was requested since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Stop the main loop, asking first if annotations were not exported
    pub fn request_quit(&mut self) {
        if self.modified && self.store.span_count() > 0 {
            self.start_prompt("Annotations not exported; really quit? (y/n)", PromptAction::ConfirmQuit);
        } else {
            self.running = false;
        }
    }

    pub fn text_width(&self) -> usize {
        self.text_width
    }

    /// Set the wrap width, capped by the configured maximum
    pub fn set_text_width(&mut self, cols: usize) {
        let width = match self.config.wrap_width {
            Some(max) => cols.min(max),
            None => cols,
        };
        self.text_width = width.max(1);
    }

    /// Wrapped rows of the displayed trace
    pub fn layout(&self) -> Vec<Range<usize>> {
        layout::wrap(self.text(), self.text_width)
    }

    /// Scroll so the cursor row is within `height` rows
    pub fn ensure_cursor_visible(&mut self, height: usize) {
        let lines = self.layout();
        let (row, _) = layout::locate(&lines, self.text(), self.view.cursor());
        self.view.scroll_to(row, height);
    }

    /// Handle a key: prompt input first, then the binding table
    pub fn handle_key(&mut self, keytab: &KeyTable, key: Key) -> Result<CommandStatus> {
        if self.prompt.active {
            return self.handle_prompt_key(key);
        }

        self.clear_message();

        if let Some(cmd) = keytab.lookup(key) {
            cmd(self)
        } else {
            self.set_message(format!("{} is not bound", key.display_name()));
            Ok(CommandStatus::Failure)
        }
    }

    /// Switch to the next (or previous) trace
    ///
    /// The active span of the trace being left is cleared and the view is
    /// reset, so no transient selection survives the switch.
    pub fn switch_document(&mut self, forward: bool) -> bool {
        let leaving = self.document().id.clone();
        let moved = if forward {
            self.documents.next()
        } else {
            self.documents.previous()
        };
        if !moved {
            return false;
        }

        self.store.clear_active(&leaving);
        self.view.reset();
        self.cancel_prompt();
        tracing::debug!(from = %leaving, to = %self.document().id, "switched trace");
        true
    }

    /// Add the current selection as a span
    pub fn submit_selection(&mut self) -> Result<CommandStatus> {
        let text = match self.view.selection(self.text()) {
            Some(text) => text.to_string(),
            None => {
                self.set_message("No text selected");
                return Ok(CommandStatus::Failure);
            }
        };

        let doc_id = self.document().id.clone();
        let (behavior, score) = (self.view.behavior, self.view.score);
        match self.store.add(&doc_id, text.as_str(), behavior, score) {
            Ok(_) => {
                self.modified = true;
                self.view.clear_mark();
                self.set_message(format!("Annotated \"{}\" as {} ({})", text, behavior, score));
                Ok(CommandStatus::Success)
            }
            Err(AnnotatorError::InvalidArgument(msg)) => {
                self.set_message(msg);
                Ok(CommandStatus::Failure)
            }
            Err(e) => Err(e),
        }
    }

    /// Toggle activation of the span under the cursor
    ///
    /// With several spans stacked at the cursor, repeated calls step through
    /// them and then clear the activation.
    pub fn activate_at_cursor(&mut self) -> CommandStatus {
        let ids = highlight::spans_at(self.text(), self.spans(), self.view.cursor());
        if ids.is_empty() {
            self.set_message("No annotation at cursor");
            return CommandStatus::Failure;
        }

        let next = match self.active().and_then(|a| ids.iter().position(|&id| id == a)) {
            Some(idx) => ids.get(idx + 1).copied(),
            None => ids.first().copied(),
        };
        self.set_active(next);
        CommandStatus::Success
    }

    /// Step the active span through the annotation list
    pub fn cycle_active(&mut self, forward: bool) -> CommandStatus {
        let spans = self.spans();
        if spans.is_empty() {
            self.set_message("No annotations for this trace");
            return CommandStatus::Failure;
        }

        let current = self
            .active()
            .and_then(|a| spans.iter().position(|s| s.id() == a));
        let next = match (current, forward) {
            (None, true) => spans.first(),
            (None, false) => spans.last(),
            (Some(idx), true) => spans.get(idx + 1),
            (Some(idx), false) => idx.checked_sub(1).and_then(|i| spans.get(i)),
        }
        .map(|s| s.id());

        self.set_active(next);
        CommandStatus::Success
    }

    fn set_active(&mut self, id: Option<SpanId>) {
        let doc_id = self.document().id.clone();
        self.store.set_active(&doc_id, id);
        match self.active_span() {
            Some(span) => {
                let msg = format!("{}: {} (score {})", span.text(), span.behavior(), span.score());
                self.set_message(msg);
            }
            None => self.clear_message(),
        }
    }

    /// Delete the active span
    pub fn delete_active(&mut self) -> CommandStatus {
        let Some(id) = self.active() else {
            self.set_message("No active annotation");
            return CommandStatus::Failure;
        };

        let doc_id = self.document().id.clone();
        self.store.remove(&doc_id, id);
        self.modified = true;
        self.set_message("Annotation deleted");
        CommandStatus::Success
    }

    /// Write all annotations to the configured export path
    pub fn export(&mut self) -> CommandStatus {
        let export = self.store.export_all();
        let path = self.config.export_path.clone();
        match export.write_to(&path) {
            Ok(()) => {
                self.modified = false;
                self.set_message(format!(
                    "Wrote {} annotations to {}",
                    export.span_count(),
                    path.display()
                ));
                CommandStatus::Success
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "export failed");
                self.set_message(format!("Export failed: {}", e));
                CommandStatus::Failure
            }
        }
    }

    /// Select the next match of a pattern at or after the cursor, wrapping
    pub fn select_pattern(&mut self, pattern: &str) -> Result<CommandStatus> {
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                self.set_message(AnnotatorError::from(e).to_string());
                return Ok(CommandStatus::Failure);
            }
        };
        self.last_pattern = Some(pattern.to_string());

        let text = self.text();
        let cursor = self.view.cursor();
        let found = {
            let mut matches = regex.find_iter(text).filter(|m| !m.as_str().trim().is_empty());
            let first = matches.next();
            let after = first
                .filter(|m| m.start() >= cursor)
                .or_else(|| matches.find(|m| m.start() >= cursor));
            after.or(first).map(|m| m.range())
        };

        match found {
            Some(range) => {
                self.view.select(&self.documents.current().text, range);
                Ok(CommandStatus::Success)
            }
            None => {
                self.set_message(format!("No match for {}", pattern));
                Ok(CommandStatus::Failure)
            }
        }
    }

    /// Move the cursor one row up or down, keeping the goal column
    pub fn move_vertical(&mut self, down: bool) -> bool {
        let lines = self.layout();
        let text = &self.documents.current().text;
        let (row, col) = layout::locate(&lines, text, self.view.cursor());
        let target = if down {
            if row + 1 >= lines.len() {
                return false;
            }
            row + 1
        } else {
            match row.checked_sub(1) {
                Some(r) => r,
                None => return false,
            }
        };

        let goal = self.view.goal_col().unwrap_or(col);
        let offset = layout::offset_at(&lines, text, target, goal);
        self.view.set_cursor(text, offset);
        self.view.set_goal_col(Some(goal));
        true
    }

    /// Move to the start or end of the cursor's row
    pub fn move_to_row_edge(&mut self, end: bool) {
        let lines = self.layout();
        let text = &self.documents.current().text;
        let (row, _) = layout::locate(&lines, text, self.view.cursor());
        let offset = if end {
            layout::offset_at(&lines, text, row, usize::MAX)
        } else {
            lines[row].start
        };
        self.view.set_cursor(text, offset);
    }

    /// Start a minibuffer prompt
    pub fn start_prompt(&mut self, prompt: &str, action: PromptAction) {
        self.prompt = PromptState {
            active: true,
            prompt: prompt.to_string(),
            input: String::new(),
            action,
            default: self.last_pattern.clone(),
        };
        self.update_prompt_display();
    }

    fn cancel_prompt(&mut self) {
        self.prompt = PromptState::default();
    }

    fn update_prompt_display(&mut self) {
        if self.prompt.action == PromptAction::ConfirmQuit {
            let display = self.prompt.prompt.clone();
            self.set_message(display);
            return;
        }
        let display = match &self.prompt.default {
            Some(def) if self.prompt.input.is_empty() => {
                format!("{} (default {}): ", self.prompt.prompt, def)
            }
            _ => format!("{}: {}", self.prompt.prompt, self.prompt.input),
        };
        self.set_message(display);
    }

    /// Handle key press during prompt mode
    fn handle_prompt_key(&mut self, key: Key) -> Result<CommandStatus> {
        // C-g aborts
        if key == Key::ctrl('g') || key == Key::ctrl('[') {
            self.cancel_prompt();
            self.set_message("Quit");
            return Ok(CommandStatus::Abort);
        }

        if self.prompt.action == PromptAction::ConfirmQuit {
            self.cancel_prompt();
            if key == Key::char('y') || key == Key::char('Y') {
                self.running = false;
                return Ok(CommandStatus::Success);
            }
            self.clear_message();
            return Ok(CommandStatus::Abort);
        }

        // Enter completes
        if key == Key::ctrl('m') {
            let input = if self.prompt.input.is_empty() {
                self.prompt.default.clone().unwrap_or_default()
            } else {
                self.prompt.input.clone()
            };
            let action = self.prompt.action;
            self.cancel_prompt();
            self.clear_message();
            return self.complete_prompt(action, &input);
        }

        // Backspace
        if key == Key(0x7f) || key == Key::ctrl('h') {
            self.prompt.input.pop();
            self.update_prompt_display();
            return Ok(CommandStatus::Success);
        }

        if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.prompt.input.push(ch);
                self.update_prompt_display();
            }
            return Ok(CommandStatus::Success);
        }

        Ok(CommandStatus::Failure)
    }

    fn complete_prompt(&mut self, action: PromptAction, input: &str) -> Result<CommandStatus> {
        match action {
            PromptAction::ConfirmQuit => Ok(CommandStatus::Success),
            PromptAction::SelectPattern => {
                if input.is_empty() {
                    self.set_message("No pattern");
                    return Ok(CommandStatus::Failure);
                }
                self.select_pattern(input)
            }
            PromptAction::None => Ok(CommandStatus::Success),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Behavior, Score};

    fn session() -> Session {
        Session::new(DocumentSet::samples(), Config::default())
    }

    fn select(session: &mut Session, needle: &str) {
        let start = session.text().find(needle).unwrap();
        let text = session.text().to_string();
        session.view.select(&text, start..start + needle.len());
    }

    #[test]
    fn test_submit_selection() {
        let mut s = session();
        select(&mut s, "Paris is the largest city");
        s.view.behavior = Behavior::MemoryRecall;
        s.view.score = Score::Two;

        assert_eq!(s.submit_selection().unwrap(), CommandStatus::Success);
        let spans = s.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "Paris is the largest city");
        assert_eq!(spans[0].behavior(), Behavior::MemoryRecall);
        assert_eq!(spans[0].score(), Score::Two);
        assert_eq!(s.view.mark(), None);
    }

    #[test]
    fn test_submit_without_selection_fails() {
        let mut s = session();
        assert_eq!(s.submit_selection().unwrap(), CommandStatus::Failure);
        assert!(s.spans().is_empty());
        assert_eq!(s.message(), Some("No text selected"));
    }

    #[test]
    fn test_switch_document_clears_transient_state() {
        let mut s = session();
        select(&mut s, "Europe");
        s.submit_selection().unwrap();
        assert_eq!(s.cycle_active(true), CommandStatus::Success);
        assert!(s.active().is_some());
        select(&mut s, "capital");

        assert!(s.switch_document(true));
        assert_eq!(s.document().id, "trace_002");
        assert_eq!(s.view.mark(), None);
        assert_eq!(s.view.cursor(), 0);

        assert!(s.switch_document(false));
        assert_eq!(s.active(), None);
        assert_eq!(s.spans().len(), 1);

        assert!(!s.switch_document(false));
    }

    #[test]
    fn test_cycle_active() {
        let mut s = session();
        for needle in ["France", "Europe", "Paris"] {
            select(&mut s, needle);
            s.submit_selection().unwrap();
        }
        let ids: Vec<_> = s.spans().iter().map(|sp| sp.id()).collect();

        s.cycle_active(true);
        assert_eq!(s.active(), Some(ids[0]));
        s.cycle_active(true);
        s.cycle_active(true);
        assert_eq!(s.active(), Some(ids[2]));
        s.cycle_active(true);
        assert_eq!(s.active(), None);
        s.cycle_active(false);
        assert_eq!(s.active(), Some(ids[2]));
    }

    #[test]
    fn test_activate_at_cursor_toggles() {
        let mut s = session();
        select(&mut s, "capital city");
        s.submit_selection().unwrap();
        select(&mut s, "capital");
        s.submit_selection().unwrap();
        let ids: Vec<_> = s.spans().iter().map(|sp| sp.id()).collect();

        let text = s.text().to_string();
        let at = text.find("capital city").unwrap() + 2;
        s.view.set_cursor(&text, at);

        assert_eq!(s.activate_at_cursor(), CommandStatus::Success);
        assert_eq!(s.active(), Some(ids[0]));
        s.activate_at_cursor();
        assert_eq!(s.active(), Some(ids[1]));
        s.activate_at_cursor();
        assert_eq!(s.active(), None);

        s.view.set_cursor(&text, 0);
        assert_eq!(s.activate_at_cursor(), CommandStatus::Failure);
    }

    #[test]
    fn test_delete_active() {
        let mut s = session();
        assert_eq!(s.delete_active(), CommandStatus::Failure);

        select(&mut s, "Europe");
        s.submit_selection().unwrap();
        s.cycle_active(true);
        assert_eq!(s.delete_active(), CommandStatus::Success);
        assert!(s.spans().is_empty());
        assert_eq!(s.active(), None);
    }

    #[test]
    fn test_active_segments() {
        let mut s = session();
        select(&mut s, "Paris");
        s.submit_selection().unwrap();
        s.cycle_active(true);

        let segments = s.segments();
        let active: Vec<_> = segments.iter().filter(|seg| seg.active).map(|seg| seg.text).collect();
        assert_eq!(active, vec!["Paris", "Paris"]);
        let joined: String = segments.iter().map(|seg| seg.text).collect();
        assert_eq!(joined, s.text());
    }

    #[test]
    fn test_select_pattern_wraps() {
        let mut s = session();
        assert_eq!(s.select_pattern(r"Paris").unwrap(), CommandStatus::Success);
        let first = s.view.region().unwrap();
        assert_eq!(s.view.selection(s.text()), Some("Paris"));

        s.select_pattern(r"Paris").unwrap();
        let second = s.view.region().unwrap();
        assert!(second.start > first.start);

        s.select_pattern(r"Paris").unwrap();
        assert_eq!(s.view.region().unwrap(), first);
    }

    #[test]
    fn test_select_pattern_errors() {
        let mut s = session();
        assert_eq!(s.select_pattern("(unclosed").unwrap(), CommandStatus::Failure);
        assert!(s.message().unwrap().starts_with("Bad pattern"));
        assert_eq!(s.select_pattern("Berlin").unwrap(), CommandStatus::Failure);
        assert_eq!(s.select_pattern(r"\s*").unwrap(), CommandStatus::Failure);
    }

    #[test]
    fn test_prompt_flow() {
        let mut s = session();
        let keytab = KeyTable::with_defaults();
        s.start_prompt("Select pattern", PromptAction::SelectPattern);
        for ch in "capital".chars() {
            s.handle_key(&keytab, Key::char(ch)).unwrap();
        }
        assert_eq!(s.message(), Some("Select pattern: capital"));
        s.handle_key(&keytab, Key::ctrl('m')).unwrap();
        assert!(!s.prompt.active);
        assert_eq!(s.view.selection(s.text()), Some("capital"));

        // Empty input falls back to the last pattern
        s.start_prompt("Select pattern", PromptAction::SelectPattern);
        assert_eq!(s.prompt.default.as_deref(), Some("capital"));
        assert_eq!(s.handle_key(&keytab, Key::ctrl('g')).unwrap(), CommandStatus::Abort);
    }

    #[test]
    fn test_vertical_movement() {
        let mut s = session();
        s.set_text_width(20);
        assert!(!s.move_vertical(false));
        assert!(s.move_vertical(true));
        let lines = s.layout();
        let (row, _) = layout::locate(&lines, s.text(), s.view.cursor());
        assert_eq!(row, 1);

        s.move_to_row_edge(true);
        let (row, _) = layout::locate(&lines, s.text(), s.view.cursor());
        assert_eq!(row, 1);
        s.move_to_row_edge(false);
        assert_eq!(s.view.cursor(), lines[1].start);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.export_path = dir.path().join("out.json");
        let mut s = Session::new(DocumentSet::samples(), config);

        select(&mut s, "capital");
        s.submit_selection().unwrap();
        assert_eq!(s.export(), CommandStatus::Success);

        let json = std::fs::read_to_string(dir.path().join("out.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["trace_001"]["spans"][0],
            serde_json::json!(["capital", "Logical reasoning", 1])
        );

        s.config.export_path = dir.path().join("missing-dir").join("out.json");
        assert_eq!(s.export(), CommandStatus::Failure);
    }

    #[test]
    fn test_quit_confirms_unexported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.export_path = dir.path().join("out.json");
        let mut s = Session::new(DocumentSet::samples(), config);
        let keytab = KeyTable::with_defaults();

        s.request_quit();
        assert!(!s.running);

        let mut s = Session::new(DocumentSet::samples(), s.config.clone());
        select(&mut s, "Europe");
        s.submit_selection().unwrap();
        assert!(s.is_modified());

        s.request_quit();
        assert!(s.running);
        assert!(s.prompt.active);
        s.handle_key(&keytab, Key::char('n')).unwrap();
        assert!(s.running);
        assert!(!s.prompt.active);

        s.export();
        assert!(!s.is_modified());
        s.request_quit();
        assert!(!s.running);
    }

    #[test]
    fn test_quit_confirm_yes() {
        let mut s = session();
        let keytab = KeyTable::with_defaults();
        select(&mut s, "Europe");
        s.submit_selection().unwrap();
        s.request_quit();
        s.handle_key(&keytab, Key::char('y')).unwrap();
        assert!(!s.running);
    }

    #[test]
    fn test_unbound_key() {
        let mut s = session();
        let keytab = KeyTable::with_defaults();
        let status = s.handle_key(&keytab, Key::ctrl('z')).unwrap();
        assert_eq!(status, CommandStatus::Failure);
    }
}
