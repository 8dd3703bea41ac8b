//! Text and cell utilities for the TUI.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Foreground used for dimmed cells beneath an overlay.
pub const DIM: Color = Color::Indexed(235);
/// Foreground of overlay text.
pub const OVERLAY_FG: Color = Color::Magenta;

/// Calculate the display width of text (accounting for Unicode).
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncate text to a maximum display width.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > max_width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

/// Pad text with trailing spaces up to `width` columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(pad))
}

/// Parse a `rrggbb` label color.
pub fn label_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Grey out every cell in `area`, keeping its symbol.
pub fn dim_area(buf: &mut Buffer, area: Rect) {
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_fg(DIM);
            }
        }
    }
}

/// Paint overlay art on top of `area`.
///
/// Spaces are transparent and `*` underlines whatever is beneath it; every
/// other character is drawn in the overlay color.
pub fn paint_overlay(buf: &mut Buffer, area: Rect, art: &str) {
    for (dy, line) in art.lines().enumerate() {
        let y = area.y + dy as u16;
        if y >= area.bottom() {
            break;
        }
        let mut x = area.x;
        for ch in line.chars() {
            if x >= area.right() {
                break;
            }
            if let Some(cell) = buf.cell_mut((x, y)) {
                match ch {
                    ' ' => {}
                    '*' => {
                        cell.set_style(Style::default().add_modifier(Modifier::UNDERLINED));
                    }
                    _ => {
                        cell.set_char(ch).set_fg(OVERLAY_FG);
                    }
                }
            }
            x += UnicodeWidthChar::width(ch).unwrap_or(1).max(1) as u16;
        }
    }
}
