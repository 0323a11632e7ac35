//! Style types for text rendering
//!
//! Maps highlight tags (and the selection region) to terminal styles.

use super::segment::HighlightTag;

/// Terminal colors (ANSI 16-color palette for compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Underlined text
    pub underline: bool,
    /// Reverse video (swap fg/bg)
    pub reverse: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Create a style with just background color
    pub fn bg(color: Color) -> Self {
        Self {
            bg: color,
            ..Default::default()
        }
    }

    /// Builder: set foreground color
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set underline
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Builder: set reverse
    pub fn with_reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Style for a run of trace text
    ///
    /// Highlighted text gets a light yellow background, the active span a
    /// darker yellow (orange on most palettes). Text inside the pending
    /// selection region is shown in reverse video on top of that.
    pub fn for_text(tag: HighlightTag, in_region: bool) -> Self {
        let style = match tag {
            HighlightTag::None => Style::default(),
            HighlightTag::Highlighted => Style::bg(Color::BrightYellow).with_fg(Color::Black),
            HighlightTag::Active => Style::bg(Color::Yellow).with_fg(Color::Black).with_bold(),
        };
        if in_region {
            style.with_reverse()
        } else {
            style
        }
    }
}
