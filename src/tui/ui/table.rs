//! Issue list rendering.

use super::layout::{label_color, truncate_to_width};
use crate::data::Issue;
use crate::tui::app::Focus;
use crate::tui::list::detail_lines;
use crate::tui::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub const COLUMN_HEADER: &str = " idx repo  num  title";
const REPO_WIDTH: usize = 5;

/// Column header with each word underlined but not the gaps.
fn header_line() -> Line<'static> {
    let underlined = Style::default().add_modifier(Modifier::UNDERLINED);
    let mut spans = Vec::new();
    let mut word = String::new();
    for ch in COLUMN_HEADER.chars() {
        if ch == ' ' {
            if !word.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut word), underlined));
            }
            spans.push(Span::raw(" "));
        } else {
            word.push(ch);
        }
    }
    if !word.is_empty() {
        spans.push(Span::styled(word, underlined));
    }
    Line::from(spans)
}

/// `<cursor><m><p><t> <repo>/<num> <title>`; the priority digit takes the
/// priority label's color.
fn issue_line(issue: &Issue, highlighted: bool) -> Line<'static> {
    let cursor = if highlighted { ">" } else { " " };
    let priority_style = issue
        .priority
        .value
        .as_ref()
        .and_then(|def| label_color(&def.color))
        .map(|c| Style::default().fg(c))
        .unwrap_or_default();

    let repo = truncate_to_width(&issue.repo, REPO_WIDTH);
    let mut line = Line::from(vec![
        Span::raw(format!("{}{}", cursor, issue.milestone.index)),
        Span::styled(issue.priority.index.to_string(), priority_style),
        Span::raw(format!(
            "{} {:>5}/{:<4} {}",
            issue.issue_type.index, repo, issue.number, issue.title
        )),
    ]);
    if highlighted {
        line = line.style(Style::default().add_modifier(Modifier::BOLD));
    }
    line
}

pub fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 || area.width < 2 {
        return;
    }
    let height = area.height as usize;
    let list = &app.list;
    let list_focused = app.ui.focus == Focus::List;

    let mut lines = vec![header_line()];
    let mut more_below = false;

    for (pos, issue) in list.view().enumerate().skip(list.scroll()) {
        if lines.len() >= height {
            more_below = true;
            break;
        }
        let highlighted = pos == list.selected() && list_focused;
        lines.push(issue_line(issue, highlighted));

        if pos == list.selected() && list.expanded {
            lines.extend(detail_lines(issue, area.width as usize).into_iter().map(Line::from));
        }
    }
    if lines.len() > height {
        lines.truncate(height);
        more_below = true;
    }

    // Rows start one column in; column 0 holds the scroll markers.
    let rows_area = Rect {
        x: area.x + 1,
        width: area.width - 1,
        ..area
    };
    f.render_widget(Paragraph::new(lines), rows_area);

    let buf = f.buffer_mut();
    if list.scroll() > 0 && height > 1 {
        buf.set_string(area.x, area.y + 1, "↑", Style::default());
    }
    if more_below {
        buf.set_string(area.x, area.bottom() - 1, "↓", Style::default());
    }
}
