mod app;
pub mod input;
pub mod list;
pub mod menus;
mod message;
pub mod ui;
pub mod window;

use crate::config::Config;
use crate::integrations::{IssueTracker, QueryMode};
use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use app::{App, ContextMenu, Focus, UiState, DEBUG_DUMP_FILE};
pub use menus::Mutation;
pub use message::Message;

/// Owns the terminal. Every frame goes through [`Renderer::redraw`], which
/// holds the lock for the whole recompute/paint/flush so frames never
/// interleave.
pub struct Renderer<B: Backend> {
    terminal: Mutex<Terminal<B>>,
}

impl<B: Backend> Renderer<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal: Mutex::new(terminal),
        }
    }

    pub fn redraw(&self, app: &mut App) -> Result<()> {
        let mut terminal = self
            .terminal
            .lock()
            .map_err(|_| anyhow!("terminal lock poisoned"))?;
        terminal.draw(|f| {
            let regions = ui::Regions::split(f.area());
            app.prepare_frame(regions.list_rows(), regions.list.width as usize);
            ui::draw(f, app);
        })?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<Terminal<B>> {
        self.terminal
            .into_inner()
            .map_err(|_| anyhow!("terminal lock poisoned"))
    }
}

pub async fn run(
    config: Config,
    tracker: Arc<dyn IssueTracker>,
    mode: QueryMode,
    debug: bool,
) -> Result<()> {
    // Check if stdout is a terminal
    if !std::io::IsTerminal::is_terminal(&io::stdout()) {
        anyhow::bail!("triage requires an interactive terminal");
    }

    let mut app = App::new(config, tracker, mode).with_debug(debug);
    app.init().await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let renderer = Renderer::new(Terminal::new(backend)?);

    let result = run_app(&renderer, &mut app).await;

    // Restore terminal
    let mut terminal = renderer.into_inner()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(renderer: &Renderer<B>, app: &mut App) -> Result<()> {
    let poll_rate = Duration::from_millis(50);
    renderer.redraw(app)?;

    loop {
        // Pages from the background refresh
        if app.poll_refresh() {
            renderer.redraw(app)?;
        }

        if !event::poll(poll_rate)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key).await? {
                    return Ok(());
                }
                renderer.redraw(app)?;
            }
            Event::Resize(_, _) => renderer.redraw(app)?,
            _ => {}
        }
    }
}
