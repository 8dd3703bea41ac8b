//! TUI rendering module.
//!
//! - `layout` - Region split and text/cell utilities
//! - `status` - Header, sort/filter boxes, context menu line and status line
//! - `table` - The issue list
//! - `modals` - Help and alert overlays

pub mod layout;
pub mod modals;
pub mod status;
pub mod table;

use crate::tui::window::Window;
use crate::tui::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Screen regions, one per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub full: Rect,
    pub header: Rect,
    pub sort: Rect,
    pub filter: Rect,
    pub menu: Rect,
    pub list: Rect,
    pub status: Rect,
}

impl Regions {
    pub fn split(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(1), // Sort box
                Constraint::Length(1), // Filter box
                Constraint::Length(1), // Context menu
                Constraint::Min(0),    // Issue list
                Constraint::Length(1), // Status line
            ])
            .split(area);

        Self {
            full: area,
            header: chunks[0],
            sort: chunks[1],
            filter: chunks[2],
            menu: chunks[3],
            list: chunks[4],
            status: chunks[5],
        }
    }

    /// Issue rows that fit below the list's column header.
    pub fn list_rows(&self) -> usize {
        self.list.height.saturating_sub(1) as usize
    }
}

/// Main draw function - renders every window in paint order.
pub fn draw(f: &mut Frame, app: &App) {
    let regions = Regions::split(f.area());
    for window in Window::ALL {
        window.render(f, app, &regions);
    }
}
