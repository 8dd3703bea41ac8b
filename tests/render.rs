//! Rendering the window tree into a test backend.

mod test_utils;

use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::style::{Color, Modifier};
use ratatui::Terminal;
use std::sync::Arc;
use test_utils::*;
use triage::tui::ui::layout::{DIM, OVERLAY_FG};
use triage::tui::{App, Renderer};

const WIDTH: u16 = 80;
const HEIGHT: u16 = 10;

async fn app() -> App {
    let tracker = FakeTracker::with_pages(vec![Ok(vec![
        raw_issue("acme/api", 12, "Login fails", &["critical", "bug"], Some(11)),
        raw_issue("acme/web", 7, "Footer overlaps", &[], None),
    ])])
    .with_milestones("acme/api", triplet());
    loaded_app(Arc::new(tracker), config_for(&["acme/api", "acme/web"])).await
}

struct Frame {
    buffer: Buffer,
    cursor: Position,
}

impl Frame {
    fn row(&self, y: u16) -> String {
        let text: String = (0..self.buffer.area.width)
            .map(|x| self.buffer[(x, y)].symbol())
            .collect();
        text.trim_end().to_string()
    }
}

fn draw(app: &mut App) -> Frame {
    let renderer = Renderer::new(Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap());
    renderer.redraw(app).unwrap();
    let mut terminal = renderer.into_inner().unwrap();
    let cursor = terminal.get_cursor_position().unwrap();
    Frame {
        buffer: terminal.backend().buffer().clone(),
        cursor,
    }
}

mod layout {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_default_screen() {
        let mut app = app().await;
        let frame = draw(&mut app);

        assert_eq!(frame.row(0), "*triage* is:open is:issue repo:acme/api repo:acme/web");
        assert_eq!(
            frame.row(1),
            format!("{:<30} [?] help [^C] exit", "  [s] sort: +idx")
        );
        assert_eq!(frame.row(2), "  [/] filter:");
        assert_eq!(
            frame.row(3),
            "  [m] set milestone [p] set priority [t] set type [enter] expand"
        );
        assert_eq!(frame.row(4), "  idx repo  num  title");
        assert_eq!(frame.row(5), " >000   web/7    Footer overlaps");
        assert_eq!(frame.row(6), "  221   api/12   Login fails");
        assert_eq!(frame.row(7), "");
        assert_eq!(frame.row(9), "[:] acme/web");
    }

    #[tokio::test]
    async fn test_priority_digit_uses_label_color() {
        let mut app = app().await;
        let frame = draw(&mut app);
        // critical is eb6420; the digit sits after the cursor and milestone
        assert_eq!(frame.buffer[(3, 6)].symbol(), "2");
        assert_eq!(frame.buffer[(3, 6)].fg, Color::Rgb(0xeb, 0x64, 0x20));
    }

    #[tokio::test]
    async fn test_expanded_issue_shows_url_and_body() {
        let mut app = app().await;
        press(&mut app, &[key(KeyCode::Enter)]).await;
        let frame = draw(&mut app);

        assert_eq!(
            frame.row(3),
            "  [m] set milestone [p] set priority [t] set type [enter] collapse"
        );
        assert_eq!(frame.row(5), " >000   web/7    Footer overlaps");
        assert_eq!(frame.row(6), "     https://github.com/acme/web/issues/7");
        assert_eq!(frame.row(7), "     Body of 7");
        assert_eq!(frame.row(8), "  221   api/12   Login fails");
    }

    #[tokio::test]
    async fn test_expanding_last_visible_row_keeps_details_on_screen() {
        let issues = (1..=6)
            .map(|n| raw_issue("acme/api", n, "Something", &[], None))
            .collect();
        let tracker = FakeTracker::with_pages(vec![Ok(issues)]);
        let mut app = loaded_app(Arc::new(tracker), config_for(&[])).await;

        // Four issue rows fit; move to the last of them and expand
        press(&mut app, &[key(KeyCode::Down), key(KeyCode::Down), key(KeyCode::Down)]).await;
        press(&mut app, &[key(KeyCode::Enter)]).await;
        let frame = draw(&mut app);
        let number = app.list.selected_issue().unwrap().number;

        assert!(frame.row(6).starts_with(" >000"), "{}", frame.row(6));
        assert_eq!(
            frame.row(7),
            format!("     https://github.com/acme/api/issues/{}", number)
        );
        assert!(frame.row(8).ends_with(&format!("    Body of {}", number)));
        assert_eq!(frame.buffer[(0, 5)].symbol(), "↑");
    }

    #[tokio::test]
    async fn test_sub_menu_line() {
        let mut app = app().await;
        press(&mut app, &[ch('p')]).await;
        let frame = draw(&mut app);
        assert_eq!(
            frame.row(3),
            "  priority: [1] blocker [2] critical [3] normal [4] low"
        );
    }

    #[tokio::test]
    async fn test_scroll_markers() {
        let issues = (1..=25)
            .map(|n| raw_issue("acme/api", n, "Something", &[], None))
            .collect();
        let tracker = FakeTracker::with_pages(vec![Ok(issues)]);
        let mut app = loaded_app(Arc::new(tracker), config_for(&[])).await;

        let frame = draw(&mut app);
        assert_eq!(frame.buffer[(0, 8)].symbol(), "↓");
        assert_eq!(frame.buffer[(0, 5)].symbol(), " ");

        press(&mut app, &[key(KeyCode::PageDown)]).await;
        let frame = draw(&mut app);
        assert_eq!(frame.buffer[(0, 5)].symbol(), "↑");
        assert_eq!(frame.buffer[(0, 8)].symbol(), "↓");
    }
}

mod editors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_focused_filter_box_places_cursor() {
        let mut app = app().await;
        press(&mut app, &[ch('/'), ch('c'), ch('r')]).await;
        let frame = draw(&mut app);

        assert_eq!(frame.row(2), " >[/] filter: cr");
        assert_eq!(frame.cursor, Position::new(16, 2));
        // Context menu hides while the list is not focused
        assert_eq!(frame.row(3), "");
    }

    #[tokio::test]
    async fn test_unknown_sort_key_is_red() {
        let mut app = app().await;
        press(&mut app, &[ch('s'), ch('x')]).await;
        let frame = draw(&mut app);

        assert_eq!(frame.buffer[(12, 1)].symbol(), "+");
        assert_eq!(frame.buffer[(12, 1)].fg, Color::Red);
    }

    #[tokio::test]
    async fn test_status_line_command() {
        let mut app = app().await;
        press(&mut app, &[ch(':'), ch('w')]).await;
        let frame = draw(&mut app);

        assert_eq!(frame.row(9), ":w");
        assert_eq!(frame.cursor, Position::new(2, 9));
    }
}

mod overlays {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_help_dims_and_annotates() {
        let mut app = app().await;
        press(&mut app, &[ch('?')]).await;
        let frame = draw(&mut app);

        assert_eq!(frame.buffer[(0, 0)].fg, DIM);
        assert!(frame.buffer[(9, 0)]
            .modifier
            .contains(Modifier::UNDERLINED));
        assert!(frame.row(1).contains("what is being listed"));
    }

    #[tokio::test]
    async fn test_alert_is_centered() {
        let mut app = app().await;
        app.ui.raise_alert("Refresh failed: boom");
        let frame = draw(&mut app);

        let text = "Refresh failed: boom";
        let x = WIDTH / 2 - text.len() as u16 / 2;
        assert_eq!(frame.row(HEIGHT / 2)[x as usize..].trim_end(), text);
        assert_eq!(frame.buffer[(x, HEIGHT / 2)].fg, OVERLAY_FG);
        assert_eq!(frame.buffer[(0, 0)].fg, DIM);
    }

    #[tokio::test]
    async fn test_empty_alert_draws_nothing() {
        let mut app = app().await;
        let frame = draw(&mut app);
        assert_ne!(frame.buffer[(0, 0)].fg, DIM);
    }
}
