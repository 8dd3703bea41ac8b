//! The window tree.
//!
//! Each window draws into its own region and turns key events into
//! [`Message`]s. Windows own no state; everything they read or change lives
//! in [`App`] and its [`UiState`](super::app::UiState).

use super::app::{App, ContextMenu, Focus};
use super::input::typed_char;
use super::menus;
use super::ui::{self, Regions};
use super::Message;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Header,
    SortBox,
    FilterBox,
    ContextMenu,
    List,
    StatusLine,
    Help,
    Alert,
}

impl Window {
    /// Every window, in paint order: overlays come last so they cover the rest.
    pub const ALL: [Window; 8] = [
        Window::Header,
        Window::SortBox,
        Window::FilterBox,
        Window::ContextMenu,
        Window::List,
        Window::StatusLine,
        Window::Help,
        Window::Alert,
    ];

    /// Window that receives keys for a focus value.
    pub fn focused(focus: Focus) -> Self {
        match focus {
            Focus::List => Window::List,
            Focus::Filter => Window::FilterBox,
            Focus::Sort => Window::SortBox,
            Focus::Status => Window::StatusLine,
            Focus::Help => Window::Help,
            Focus::Alert => Window::Alert,
        }
    }

    pub fn init(self, app: &mut App) -> Result<()> {
        match self {
            Window::SortBox => app.ui.sort.reset(),
            Window::List => app.start_refresh(),
            _ => {}
        }
        Ok(())
    }

    pub fn render(self, f: &mut Frame, app: &App, regions: &Regions) {
        match self {
            Window::Header => ui::status::draw_header(f, app, regions.header),
            Window::SortBox => ui::status::draw_sort_box(f, app, regions.sort),
            Window::FilterBox => ui::status::draw_filter_box(f, app, regions.filter),
            Window::ContextMenu => ui::status::draw_context_menu(f, app, regions.menu),
            Window::List => ui::table::draw_list(f, app, regions.list),
            Window::StatusLine => ui::status::draw_status_line(f, app, regions.status),
            Window::Help => ui::modals::draw_help(f, app),
            Window::Alert => ui::modals::draw_alert(f, app),
        }
    }

    /// `None` means the window did not recognise the key.
    pub fn handle_key(self, app: &App, key: KeyEvent) -> Option<Message> {
        match self {
            Window::Header => None,
            Window::SortBox => sort_box_key(key),
            Window::FilterBox => filter_box_key(key),
            Window::ContextMenu => app
                .ui
                .context_menu
                .and_then(|menu| menus::handle_key(app, menu, key)),
            Window::List => list_key(app, key),
            Window::StatusLine => status_line_key(app, key),
            Window::Help | Window::Alert => Some(Message::DismissOverlay),
        }
    }
}

fn filter_box_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Up => Some(Message::Focus(Focus::Sort)),
        KeyCode::Down | KeyCode::Esc | KeyCode::Enter => Some(Message::FocusList),
        KeyCode::Backspace => Some(Message::FilterBackspace),
        _ => typed_char(&key).map(Message::FilterInput),
    }
}

fn sort_box_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Up | KeyCode::Down => Some(Message::Focus(Focus::Filter)),
        KeyCode::Esc | KeyCode::Enter => Some(Message::FocusList),
        KeyCode::Backspace => Some(Message::SortBackspace),
        _ => typed_char(&key).map(Message::SortInput),
    }
}

fn status_line_key(app: &App, key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::FocusList),
        KeyCode::Backspace if app.ui.command.is_empty() => Some(Message::FocusList),
        KeyCode::Backspace => Some(Message::CommandBackspace),
        KeyCode::Enter => Some(Message::ExecuteCommand),
        _ => typed_char(&key).map(Message::CommandInput),
    }
}

fn list_key(app: &App, key: KeyEvent) -> Option<Message> {
    // The context menu sees keys first.
    if let Some(msg) = Window::ContextMenu.handle_key(app, key) {
        return Some(msg);
    }
    match key.code {
        KeyCode::Esc => match app.ui.context_menu {
            Some(ContextMenu::List) | None => None,
            Some(_) => Some(Message::OpenMenu(ContextMenu::List)),
        },
        KeyCode::PageDown => Some(Message::PageDown),
        KeyCode::PageUp => Some(Message::PageUp),
        KeyCode::Down => Some(Message::MoveDown),
        KeyCode::Up => Some(Message::MoveUp),
        _ => None,
    }
}
