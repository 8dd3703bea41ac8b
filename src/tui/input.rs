//! Input dispatch layer for Elm Architecture (TEA) pattern.
//!
//! The focused window gets the first look at a key; whatever it does not
//! recognise falls through to the global bindings.

use super::app::{App, Focus};
use super::window::Window;
use super::Message;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key event to a message.
pub fn dispatch(app: &App, key: KeyEvent) -> Message {
    if is_quit(&key) {
        return Message::Quit;
    }
    Window::focused(app.ui.focus)
        .handle_key(app, key)
        .or_else(|| global_key(key))
        .unwrap_or(Message::None)
}

/// Bindings that apply whenever the focused window passes on a key.
pub fn global_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::ResetView),
        _ => match typed_char(&key)? {
            '/' => Some(Message::Focus(Focus::Filter)),
            's' => Some(Message::Focus(Focus::Sort)),
            '?' => Some(Message::Focus(Focus::Help)),
            ':' => Some(Message::Focus(Focus::Status)),
            _ => None,
        },
    }
}

/// Ctrl-C quits from anywhere.
pub fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// A printable character typed without Ctrl or Alt.
pub fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

/// Decimal digit typed as a plain key.
pub fn digit(key: &KeyEvent) -> Option<usize> {
    typed_char(key)?.to_digit(10).map(|d| d as usize)
}
