//! Full-screen overlays. Both dim everything already drawn and paint on top.

use super::layout::{dim_area, display_width, paint_overlay, OVERLAY_FG};
use crate::tui::app::Focus;
use crate::tui::App;
use ratatui::{layout::Rect, style::Style, Frame};

/// Annotated legend laid over the live screen. `*` underlines the cell
/// beneath it, spaces let it show through.
const HELP_ART: &str = "         ***********************************************************
            ******************            ↳what is being listed
              ↳sort by a column, prefix + or - for direction
   ↙  ↙  ↙   ↙
  *** ****  ***  *****

  ↙milestone: 0 none, 1 current, 2 next, 3 someday
  *
   ↙priority, in configured order (0 means unset)
   *
    ↙type, in configured order (0 means unset)
    *
  *** ←read together as one number, the triage index; lowest first
";

pub fn draw_help(f: &mut Frame, app: &App) {
    if app.ui.focus != Focus::Help {
        return;
    }
    let area = f.area();
    let buf = f.buffer_mut();
    dim_area(buf, area);
    paint_overlay(buf, area, HELP_ART);
}

pub fn draw_alert(f: &mut Frame, app: &App) {
    if app.ui.alert.is_empty() {
        return;
    }
    let area = f.area();
    let buf = f.buffer_mut();
    dim_area(buf, area);

    let rect = alert_rect(area, &app.ui.alert);
    let style = Style::default().fg(OVERLAY_FG);
    for (dy, line) in app.ui.alert.lines().enumerate() {
        let y = rect.y + dy as u16;
        if y >= area.bottom() {
            break;
        }
        let width = area.right().saturating_sub(rect.x) as usize;
        buf.set_stringn(rect.x, y, line, width, style);
    }
}

/// Where the alert text goes: centered on the screen.
pub fn alert_rect(area: Rect, alert: &str) -> Rect {
    let lines: Vec<&str> = alert.lines().collect();
    let max_width = lines.iter().map(|l| display_width(l)).max().unwrap_or(1).max(1) as u16;
    let height = lines.len() as u16;
    Rect {
        x: area.x + (area.width / 2).saturating_sub(max_width / 2),
        y: area.y + (area.height / 2).saturating_sub(height / 2),
        width: max_width.min(area.width),
        height: height.min(area.height),
    }
}
