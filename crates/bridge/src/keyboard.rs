//! Keyboard events to stdin keystrokes
//!
//! Printable keys arrive through `keypress`; backspace never produces a
//! `keypress` in browsers, so `keydown` forwards it and swallows the event
//! before the page navigates back.

use naclfs_protocol::OutboundMessage;

pub const BACKSPACE: u32 = 8;

/// Whether the browser should continue with its default handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Default,
    Suppress,
}

impl KeyDisposition {
    /// The value a DOM event handler returns (`false` cancels the event)
    pub const fn allows_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

/// Keystroke for a `keypress` character code
///
/// Codes that are not Unicode scalar values produce nothing.
pub fn key_press(code: u32) -> Option<OutboundMessage> {
    char::from_u32(code).map(OutboundMessage::Key)
}

/// Keystroke and disposition for a `keydown` key code
pub fn key_down(code: u32) -> (Option<OutboundMessage>, KeyDisposition) {
    if code == BACKSPACE {
        (key_press(code), KeyDisposition::Suppress)
    } else {
        (None, KeyDisposition::Default)
    }
}

pub const fn key_up() -> KeyDisposition {
    KeyDisposition::Suppress
}
