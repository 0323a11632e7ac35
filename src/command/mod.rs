//! Command dispatch system
//!
//! This module provides the key binding table and command implementations.
//! Commands are organized into submodules by category.

mod files;
mod misc;
mod navigation;
mod selection;
mod spans;

use std::collections::HashMap;

use crate::error::Result;
use crate::input::{special, Key};
use crate::session::Session;

/// Command result status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    Abort,
}

/// Command function signature
pub type CommandFn = fn(&mut Session) -> Result<CommandStatus>;

/// Key binding entry with command function and name
struct BindingEntry {
    function: CommandFn,
    name: &'static str,
}

/// Key binding table
pub struct KeyTable {
    bindings: HashMap<u32, BindingEntry>,
}

impl KeyTable {
    /// Create an empty key table
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create key table with default bindings
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.setup_defaults();
        table
    }

    /// Add a key binding with command name
    pub fn bind_named(&mut self, key: Key, cmd: CommandFn, name: &'static str) {
        self.bindings.insert(key.code(), BindingEntry { function: cmd, name });
    }

    /// Remove a key binding
    pub fn unbind(&mut self, key: Key) {
        self.bindings.remove(&key.code());
    }

    /// Look up a command for a key
    pub fn lookup(&self, key: Key) -> Option<CommandFn> {
        self.bindings.get(&key.code()).map(|e| e.function)
    }

    /// Look up a command name for a key
    pub fn lookup_name(&self, key: Key) -> Option<&'static str> {
        self.bindings.get(&key.code()).map(|e| e.name)
    }

    /// All bindings as (key, command name), sorted by name then key
    pub fn all_bindings(&self) -> Vec<(Key, &'static str)> {
        let mut bindings: Vec<_> = self
            .bindings
            .iter()
            .map(|(&code, entry)| (Key(code), entry.name))
            .collect();
        bindings.sort_by(|a, b| a.1.cmp(b.1).then(a.0.code().cmp(&b.0.code())));
        bindings
    }

    /// Keys bound to each command, one line per command
    pub fn describe(&self) -> Vec<String> {
        let mut lines: Vec<(&'static str, Vec<String>)> = Vec::new();
        for (key, name) in self.all_bindings() {
            match lines.last_mut() {
                Some((last, keys)) if *last == name => keys.push(key.display_name()),
                _ => lines.push((name, vec![key.display_name()])),
            }
        }
        lines
            .into_iter()
            .map(|(name, keys)| format!("{:<24} {}", name, keys.join(", ")))
            .collect()
    }

    /// Set up default key bindings
    fn setup_defaults(&mut self) {
        use files::*;
        use misc::*;
        use navigation::*;
        use selection::*;
        use spans::*;

        // Basic cursor movement
        self.bind_named(Key::ctrl('f'), forward_char, "forward-char");
        self.bind_named(Key::ctrl('b'), backward_char, "backward-char");
        self.bind_named(Key::ctrl('n'), next_line, "next-line");
        self.bind_named(Key::ctrl('p'), previous_line, "previous-line");
        self.bind_named(Key::ctrl('a'), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::ctrl('e'), end_of_line, "end-of-line");
        self.bind_named(Key::meta('f'), forward_word, "forward-word");
        self.bind_named(Key::meta('b'), backward_word, "backward-word");
        self.bind_named(Key::meta('<'), beginning_of_trace, "beginning-of-trace");
        self.bind_named(Key::meta('>'), end_of_trace, "end-of-trace");

        // Arrow keys (special keys)
        self.bind_named(Key::special(special::RIGHT), forward_char, "forward-char");
        self.bind_named(Key::special(special::LEFT), backward_char, "backward-char");
        self.bind_named(Key::special(special::DOWN), next_line, "next-line");
        self.bind_named(Key::special(special::UP), previous_line, "previous-line");
        self.bind_named(Key::special(special::HOME), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::special(special::END), end_of_line, "end-of-line");

        // Trace navigation
        self.bind_named(Key::special(special::PAGE_DOWN), next_trace, "next-trace");
        self.bind_named(Key::special(special::PAGE_UP), previous_trace, "previous-trace");
        self.bind_named(Key::char('n'), next_trace, "next-trace");
        self.bind_named(Key::char('p'), previous_trace, "previous-trace");

        // Selection
        self.bind_named(Key::ctrl(' '), set_mark, "set-mark-command");
        self.bind_named(Key::char('m'), set_mark, "set-mark-command");
        self.bind_named(Key::ctlx_ctrl('x'), exchange_point_and_mark, "exchange-point-and-mark");
        self.bind_named(Key::ctlx('h'), mark_whole_trace, "mark-whole-trace");
        self.bind_named(Key::meta('s'), select_pattern, "select-pattern");
        self.bind_named(Key::char('/'), select_pattern, "select-pattern");
        self.bind_named(Key::ctrl('m'), submit_annotation, "submit-annotation");

        // Annotation form
        self.bind_named(Key::char('b'), next_behavior, "next-behavior");
        self.bind_named(Key::char('B'), previous_behavior, "previous-behavior");
        self.bind_named(Key::char('1'), score_one, "score-one");
        self.bind_named(Key::char('2'), score_two, "score-two");

        // Annotations
        self.bind_named(Key::char('a'), activate_at_point, "activate-at-point");
        self.bind_named(Key::ctrl('i'), next_annotation, "next-annotation");
        self.bind_named(Key::special(special::BACKTAB), previous_annotation, "previous-annotation");
        self.bind_named(Key::char('d'), delete_annotation, "delete-annotation");
        self.bind_named(Key::special(special::DELETE), delete_annotation, "delete-annotation");

        // Export
        self.bind_named(Key::ctlx_ctrl('s'), export_annotations, "export-annotations");
        self.bind_named(Key::char('e'), export_annotations, "export-annotations");

        // Screen refresh
        self.bind_named(Key::ctrl('l'), redraw_display, "redraw-display");

        // Quit
        self.bind_named(Key::ctlx_ctrl('c'), quit, "quit");
        self.bind_named(Key::char('q'), quit, "quit");

        // Abort
        self.bind_named(Key::ctrl('g'), abort, "keyboard-quit");

        // Help
        self.bind_named(Key::special(special::F1), describe_bindings, "describe-bindings");
        self.bind_named(Key::char('?'), describe_bindings, "describe-bindings");
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let table = KeyTable::with_defaults();
        assert_eq!(table.lookup_name(Key::ctrl('m')), Some("submit-annotation"));
        assert_eq!(table.lookup_name(Key::ctrl(' ')), Some("set-mark-command"));
        assert_eq!(table.lookup_name(Key::ctlx_ctrl('s')), Some("export-annotations"));
        assert_eq!(table.lookup_name(Key::char('e')), Some("export-annotations"));
        assert_eq!(table.lookup_name(Key::special(special::BACKTAB)), Some("previous-annotation"));
        assert!(table.lookup(Key::ctrl('z')).is_none());
    }

    #[test]
    fn test_unbind() {
        let mut table = KeyTable::with_defaults();
        table.unbind(Key::char('q'));
        assert!(table.lookup(Key::char('q')).is_none());
        assert!(table.lookup(Key::ctlx_ctrl('c')).is_some());
    }

    #[test]
    fn test_describe_groups_keys() {
        let table = KeyTable::with_defaults();
        let lines = table.describe();
        let quit = lines.iter().find(|l| l.starts_with("quit ")).unwrap();
        assert!(quit.contains("q"));
        assert!(quit.contains("C-x C-c"));
        let names: Vec<_> = lines.iter().map(|l| l.split_whitespace().next().unwrap()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
