//! Single-line windows: header, sort and filter boxes, context menu and status line.

use super::layout::{display_width, pad_right};
use crate::tui::app::Focus;
use crate::tui::menus::menu_line;
use crate::tui::App;
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Column where the sort box legend starts.
const SORT_LEGEND_COL: usize = 30;
/// Column up to which the focused filter box is highlighted.
const FILTER_BOX_END: usize = 60;

fn editing_style() -> Style {
    Style::default()
        .fg(Color::Indexed(0xe9))
        .bg(Color::Indexed(0xfa))
}

pub fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled("*triage*", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {}", app.mode.title())),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Draw an editable `[key] name: text` box. When focused the text is
/// highlighted up to `end_col` and the cursor is placed after it.
fn draw_input_box(
    f: &mut Frame,
    area: Rect,
    prefix: &str,
    text: &str,
    focused: bool,
    text_style: Style,
    end_col: usize,
) -> usize {
    let cursor = if focused { ">" } else { " " };
    let pre = format!(" {}{}", cursor, prefix);
    let pre_width = display_width(&pre);

    let mut spans = vec![Span::raw(pre)];
    let used = if focused {
        let fill = end_col.saturating_sub(pre_width);
        spans.push(Span::styled(pad_right(text, fill), text_style));
        let cursor_x = area.x + (pre_width + display_width(text)) as u16;
        if cursor_x < area.right() {
            f.set_cursor_position(Position::new(cursor_x, area.y));
        }
        pre_width + display_width(text).max(fill)
    } else {
        spans.push(Span::raw(text.to_string()));
        pre_width + display_width(text)
    };

    f.render_widget(Paragraph::new(Line::from(spans)), area);
    used
}

pub fn draw_sort_box(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.ui.focus == Focus::Sort;
    let style = if app.ui.sort.is_valid() {
        editing_style()
    } else {
        editing_style().fg(Color::Red)
    };

    let used = draw_input_box(
        f,
        area,
        "[s] sort: ",
        app.ui.sort.text(),
        focused,
        style,
        SORT_LEGEND_COL,
    );

    let legend_x = SORT_LEGEND_COL.max(used);
    if legend_x < area.width as usize {
        let legend_area = Rect {
            x: area.x + legend_x as u16,
            width: area.width - legend_x as u16,
            ..area
        };
        f.render_widget(Paragraph::new(" [?] help [^C] exit"), legend_area);
    }
}

pub fn draw_filter_box(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.ui.focus == Focus::Filter;
    draw_input_box(
        f,
        area,
        "[/] filter: ",
        &app.ui.filter,
        focused,
        editing_style(),
        FILTER_BOX_END,
    );
}

/// The active menu's legend, shown only while the list has focus.
pub fn draw_context_menu(f: &mut Frame, app: &App, area: Rect) {
    if app.ui.focus != Focus::List {
        return;
    }
    let Some(menu) = app.ui.context_menu else {
        return;
    };
    f.render_widget(
        Paragraph::new(format!("  {}", menu_line(app, menu))),
        area,
    );
}

pub fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    if app.ui.focus == Focus::Status {
        let text = format!(":{}", app.ui.command);
        let cursor_x = area.x + display_width(&text) as u16;
        f.render_widget(Paragraph::new(text), area);
        if cursor_x < area.right() {
            f.set_cursor_position(Position::new(cursor_x, area.y));
        }
        return;
    }
    f.render_widget(
        Paragraph::new(format!("[:] {}", app.status_text())),
        area,
    );
}
