//! Terminal-independent key events.
//!
//! The TUI converts crossterm key events into [`InputKey`] at its boundary, so
//! the key handlers and their tests never touch crossterm types.

/// A key press as the handlers see it. Modifiers other than Ctrl and Shift+Tab
/// are dropped at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Char(char),
    /// Ctrl+letter, always lowercase
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// Pages through the result view
    PageUp,
    PageDown,

    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
}

impl InputKey {
    /// Keys that insert text in an input field
    pub fn is_printable(self) -> bool {
        matches!(self, InputKey::Char(c) if !c.is_control())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_and_plain_chars_differ() {
        assert_ne!(InputKey::CharCtrl('c'), InputKey::Char('c'));
    }

    #[test]
    fn test_is_printable() {
        assert!(InputKey::Char('x').is_printable());
        assert!(InputKey::Char(' ').is_printable());
        assert!(!InputKey::Char('\u{7}').is_printable());
        assert!(!InputKey::CharCtrl('a').is_printable());
        assert!(!InputKey::Enter.is_printable());
    }
}
