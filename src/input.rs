//! Input handling - key reading and translation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key modifier flags
pub mod key_flags {
    pub const CONTROL: u32 = 0x1000_0000;
    pub const META: u32 = 0x2000_0000;
    pub const CTLX: u32 = 0x4000_0000;
    pub const SPEC: u32 = 0x8000_0000;
}

/// Codes for special (non-character) keys
pub mod special {
    pub const BACKTAB: u32 = 0x0f;
    pub const F1: u32 = 0x3b;
    pub const HOME: u32 = 0x47;
    pub const UP: u32 = 0x48;
    pub const PAGE_UP: u32 = 0x49;
    pub const LEFT: u32 = 0x4b;
    pub const RIGHT: u32 = 0x4d;
    pub const END: u32 = 0x4f;
    pub const DOWN: u32 = 0x50;
    pub const PAGE_DOWN: u32 = 0x51;
    pub const DELETE: u32 = 0x53;
}

/// Represents a key input with modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(pub u32);

impl Key {
    /// Create a key from a character
    pub fn char(ch: char) -> Self {
        Key(ch as u32)
    }

    /// Create a control key (C-x)
    pub fn ctrl(ch: char) -> Self {
        Key(key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// Create a meta key (M-x or ESC x)
    pub fn meta(ch: char) -> Self {
        Key(key_flags::META | ch as u32)
    }

    /// Create a C-x prefixed key (C-x x)
    pub fn ctlx(ch: char) -> Self {
        Key(key_flags::CTLX | ch.to_ascii_lowercase() as u32)
    }

    /// Create a C-x C-x key (C-x C-x)
    pub fn ctlx_ctrl(ch: char) -> Self {
        Key(key_flags::CTLX | key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// Create a special key (function keys, arrows, etc.)
    pub fn special(code: u32) -> Self {
        Key(key_flags::SPEC | code)
    }

    /// Get the raw key code
    pub fn code(&self) -> u32 {
        self.0
    }

    /// Check if this is a control key
    pub fn is_ctrl(&self) -> bool {
        self.0 & key_flags::CONTROL != 0
    }

    /// Check if this is a meta key
    pub fn is_meta(&self) -> bool {
        self.0 & key_flags::META != 0
    }

    /// Check if this is a C-x prefixed key
    pub fn is_ctlx(&self) -> bool {
        self.0 & key_flags::CTLX != 0
    }

    /// Check if this is a special key
    pub fn is_special(&self) -> bool {
        self.0 & key_flags::SPEC != 0
    }

    /// Get the base character (without modifiers)
    pub fn base_char(&self) -> Option<char> {
        let code = self.0 & 0x00FF_FFFF;
        if code <= 0x10FFFF {
            char::from_u32(code)
        } else {
            None
        }
    }

    /// Check if this is a printable character with no modifiers
    pub fn is_self_insert(&self) -> bool {
        if self.0 & 0xF000_0000 != 0 {
            return false;
        }
        if let Some(ch) = char::from_u32(self.0) {
            ch >= ' ' && ch != '\x7f'
        } else {
            false
        }
    }

    /// Convert key to a human-readable string (e.g., "C-f", "M-s", "C-x C-s")
    pub fn display_name(&self) -> String {
        let mut result = String::new();

        if self.is_ctlx() {
            result.push_str("C-x ");
        }
        if self.is_meta() {
            result.push_str("M-");
        }
        if self.is_ctrl() {
            result.push_str("C-");
        }

        if self.is_special() {
            let name = match self.0 & 0xFF {
                special::BACKTAB => "S-TAB",
                special::F1 => "F1",
                special::HOME => "Home",
                special::UP => "Up",
                special::PAGE_UP => "PageUp",
                special::LEFT => "Left",
                special::RIGHT => "Right",
                special::END => "End",
                special::DOWN => "Down",
                special::PAGE_DOWN => "PageDown",
                special::DELETE => "Delete",
                code => return format!("{}special-0x{:02x}", result, code),
            };
            result.push_str(name);
            return result;
        }

        let base = self.0 & 0x00FF_FFFF;
        match base {
            0x7f => result.push_str("Backspace"),
            0x20 => result.push_str("SPC"),
            _ if *self == Key::ctrl('m') => return "RET".to_string(),
            _ if *self == Key::ctrl('i') => return "TAB".to_string(),
            _ => match char::from_u32(base) {
                Some(ch) => result.push(ch),
                None => result.push_str(&format!("0x{:x}", base)),
            },
        }

        result
    }
}

/// Input state for handling multi-key sequences
#[derive(Debug, Default)]
pub struct InputState {
    /// Waiting for C-x continuation
    ctlx_pending: bool,
    /// Waiting for Meta continuation (after ESC)
    meta_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset input state
    pub fn reset(&mut self) {
        self.ctlx_pending = false;
        self.meta_pending = false;
    }

    /// Check if waiting for continuation key
    pub fn is_pending(&self) -> bool {
        self.ctlx_pending || self.meta_pending
    }

    /// Check if waiting for C-x continuation
    pub fn is_ctlx_pending(&self) -> bool {
        self.ctlx_pending
    }

    /// Check if waiting for Meta/ESC continuation
    pub fn is_meta_pending(&self) -> bool {
        self.meta_pending
    }

    /// Translate a crossterm KeyEvent to our Key representation
    pub fn translate_key(&mut self, event: KeyEvent) -> Option<Key> {
        let KeyEvent {
            code, modifiers, kind, ..
        } = event;

        // Only process key press events (Windows also reports releases)
        if kind != KeyEventKind::Press {
            return None;
        }

        if self.meta_pending {
            self.meta_pending = false;
            return self.translate_normal(code, modifiers).map(|k| Key(k.0 | key_flags::META));
        }

        if self.ctlx_pending {
            self.ctlx_pending = false;
            return self.translate_with_ctlx(code, modifiers);
        }

        if code == KeyCode::Esc {
            self.meta_pending = true;
            return None;
        }

        if code == KeyCode::Char('x') && modifiers.contains(KeyModifiers::CONTROL) {
            self.ctlx_pending = true;
            return None;
        }

        self.translate_normal(code, modifiers)
    }

    fn translate_normal(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let alt = modifiers.contains(KeyModifiers::ALT);

        match code {
            KeyCode::Char(ch) => {
                if ctrl && alt {
                    Some(Key(key_flags::META | key_flags::CONTROL | ch.to_ascii_lowercase() as u32))
                } else if ctrl {
                    Some(Key::ctrl(ch))
                } else if alt {
                    Some(Key::meta(ch))
                } else {
                    Some(Key::char(ch))
                }
            }
            KeyCode::Enter => Some(Key::ctrl('m')),
            KeyCode::Tab => Some(Key::ctrl('i')),
            KeyCode::BackTab => Some(Key::special(special::BACKTAB)),
            KeyCode::Backspace => Some(Key(0x7f)),
            KeyCode::Delete => Some(Key::special(special::DELETE)),
            KeyCode::Home => Some(Key::special(special::HOME)),
            KeyCode::End => Some(Key::special(special::END)),
            KeyCode::PageUp => Some(Key::special(special::PAGE_UP)),
            KeyCode::PageDown => Some(Key::special(special::PAGE_DOWN)),
            KeyCode::Up => Some(Key::special(special::UP)),
            KeyCode::Down => Some(Key::special(special::DOWN)),
            KeyCode::Left => Some(Key::special(special::LEFT)),
            KeyCode::Right => Some(Key::special(special::RIGHT)),
            KeyCode::F(n) => Some(Key::special(special::F1 - 1 + n as u32)),
            KeyCode::Esc => Some(Key::ctrl('[')),
            _ => None,
        }
    }

    fn translate_with_ctlx(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Char(ch) => {
                let mut key_code = key_flags::CTLX | ch.to_ascii_lowercase() as u32;
                if ctrl {
                    key_code |= key_flags::CONTROL;
                }
                Some(Key(key_code))
            }
            _ => self.translate_normal(code, modifiers).map(|k| Key(k.0 | key_flags::CTLX)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_and_ctrl() {
        let mut input = InputState::new();
        assert_eq!(
            input.translate_key(press(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(Key::char('a'))
        );
        assert_eq!(
            input.translate_key(press(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            Some(Key::ctrl('f'))
        );
        assert_eq!(
            input.translate_key(press(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Key::ctrl('m'))
        );
    }

    #[test]
    fn test_ctlx_sequence() {
        let mut input = InputState::new();
        assert_eq!(
            input.translate_key(press(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
        assert!(input.is_ctlx_pending());
        assert_eq!(
            input.translate_key(press(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Key::ctlx_ctrl('s'))
        );
        assert!(!input.is_pending());
    }

    #[test]
    fn test_escape_is_meta_prefix() {
        let mut input = InputState::new();
        assert_eq!(input.translate_key(press(KeyCode::Esc, KeyModifiers::NONE)), None);
        assert!(input.is_meta_pending());
        assert_eq!(
            input.translate_key(press(KeyCode::Char('s'), KeyModifiers::NONE)),
            Some(Key::meta('s'))
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Key::ctrl('f').display_name(), "C-f");
        assert_eq!(Key::meta('s').display_name(), "M-s");
        assert_eq!(Key::ctlx_ctrl('c').display_name(), "C-x C-c");
        assert_eq!(Key::ctrl(' ').display_name(), "C-SPC");
        assert_eq!(Key::ctrl('m').display_name(), "RET");
        assert_eq!(Key::special(special::PAGE_DOWN).display_name(), "PageDown");
        assert_eq!(Key::special(special::BACKTAB).display_name(), "S-TAB");
        assert_eq!(Key::char('/').display_name(), "/");
    }

    #[test]
    fn test_self_insert() {
        assert!(Key::char('a').is_self_insert());
        assert!(Key::char(' ').is_self_insert());
        assert!(!Key::ctrl('a').is_self_insert());
        assert!(!Key(0x7f).is_self_insert());
        assert!(!Key::special(special::LEFT).is_self_insert());
    }
}
