use crate::config::Config;
use crate::data::{Classifier, SortSpec};
use crate::integrations::refresh::{self, RefreshEvent};
use crate::integrations::{self, IssueTracker, QueryMode};
use crate::tui::list::IssueList;
use crate::tui::window::Window;
use anyhow::Result;
use crossterm::event::KeyEvent;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// File the converted issue list is dumped to after a refresh in debug mode.
pub const DEBUG_DUMP_FILE: &str = "raw_issues.json";

/// Which window receives key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Filter,
    Sort,
    Status,
    Help,
    Alert,
}

/// Secondary key handler bound to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextMenu {
    #[default]
    List,
    Milestone,
    Priority,
    Type,
}

/// State shared by every window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub focus: Focus,
    pub context_menu: Option<ContextMenu>,
    pub filter: String,
    pub sort: SortSpec,
    /// Status line command buffer
    pub command: String,
    /// Alert overlay text; empty hides the overlay
    pub alert: String,
    /// One-shot status message, cleared on the next key
    pub status: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: Focus::List,
            context_menu: Some(ContextMenu::List),
            filter: String::new(),
            sort: SortSpec::default(),
            command: String::new(),
            alert: String::new(),
            status: None,
        }
    }
}

impl UiState {
    pub fn focus_list(&mut self) {
        self.focus = Focus::List;
        self.context_menu = Some(ContextMenu::List);
    }

    pub fn focus(&mut self, focus: Focus) {
        if focus == Focus::List {
            self.focus_list();
        } else {
            self.focus = focus;
            self.context_menu = None;
        }
    }

    /// Show an alert and give it focus so the next key dismisses it.
    pub fn raise_alert(&mut self, text: impl Into<String>) {
        self.alert = text.into();
        self.focus = Focus::Alert;
        self.context_menu = None;
    }
}

pub struct App {
    pub config: Arc<Config>,
    pub(crate) tracker: Arc<dyn IssueTracker>,
    pub mode: QueryMode,
    pub classifier: Arc<Classifier>,
    pub ui: UiState,
    pub list: IssueList,
    pub debug: bool,
    pub is_loading: bool,
    /// Where the debug dump goes
    pub dump_path: PathBuf,

    /// Channel receiver for background refresh results
    refresh_rx: Option<mpsc::Receiver<RefreshEvent>>,
}

impl App {
    pub fn new(config: Config, tracker: Arc<dyn IssueTracker>, mode: QueryMode) -> Self {
        let classifier = Arc::new(Classifier::new(&config, Default::default()));
        Self {
            config: Arc::new(config),
            tracker,
            mode,
            classifier,
            ui: UiState::default(),
            list: IssueList::new(),
            debug: false,
            is_loading: false,
            dump_path: PathBuf::from(DEBUG_DUMP_FILE),
            refresh_rx: None,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Resolve milestones, then initialize every window (the list starts the
    /// first refresh).
    pub async fn init(&mut self) -> Result<()> {
        let classifier = integrations::load_classifier(self.tracker.as_ref(), &self.config).await;
        self.classifier = Arc::new(classifier);
        for window in Window::ALL {
            window.init(self)?;
        }
        self.ui.focus_list();
        Ok(())
    }

    /// Spawn a refresh unless one is already running.
    pub fn start_refresh(&mut self) {
        if self.refresh_rx.is_some() {
            return;
        }
        tracing::info!("Refreshing: {}", self.mode.title());
        self.is_loading = true;
        self.list.clear();
        self.refresh_rx = Some(refresh::spawn(
            Arc::clone(&self.tracker),
            self.mode.clone(),
            Arc::clone(&self.classifier),
        ));
    }

    /// Apply whatever refresh events are waiting (non-blocking, call from the
    /// event loop). Returns `true` if anything changed.
    pub fn poll_refresh(&mut self) -> bool {
        let Some(mut rx) = self.refresh_rx.take() else {
            return false;
        };

        let mut changed = false;
        let mut done = false;
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    done = self.apply_refresh_event(event);
                    changed = true;
                    if done {
                        break;
                    }
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    done = true;
                    break;
                }
            }
        }

        if !done {
            self.refresh_rx = Some(rx);
        } else {
            self.is_loading = false;
        }
        changed
    }

    /// Wait for the running refresh to end, applying every event.
    pub async fn finish_refresh(&mut self) {
        let Some(mut rx) = self.refresh_rx.take() else {
            return;
        };
        while let Some(event) = rx.recv().await {
            if self.apply_refresh_event(event) {
                break;
            }
        }
        self.is_loading = false;
    }

    /// Returns `true` once the refresh is over.
    pub fn apply_refresh_event(&mut self, event: RefreshEvent) -> bool {
        match event {
            RefreshEvent::Started => {
                self.ui.alert = "Fetching issues...".to_string();
                false
            }
            RefreshEvent::Page(issues) => {
                self.list.extend(issues);
                self.ui.alert = format!("Fetching issues, got: {}", self.list.issues().len());
                false
            }
            RefreshEvent::Finished => {
                self.ui.alert.clear();
                if self.debug {
                    self.dump_issues();
                }
                true
            }
            RefreshEvent::Failed(msg) => {
                self.ui.raise_alert(format!("Refresh failed: {}", msg));
                true
            }
        }
    }

    fn dump_issues(&self) {
        let result = serde_json::to_string_pretty(self.list.issues())
            .map_err(anyhow::Error::from)
            .and_then(|data| std::fs::write(&self.dump_path, data).map_err(Into::into));
        match result {
            Ok(()) => tracing::debug!("Wrote {}", self.dump_path.display()),
            Err(e) => tracing::warn!("Failed to write {}: {}", self.dump_path.display(), e),
        }
    }

    /// Recompute filter and sort and size the list for a frame.
    pub fn prepare_frame(&mut self, list_rows: usize, list_width: usize) {
        self.list.set_viewport(list_rows, list_width);
        self.list.refresh_view(&self.ui.filter, &self.ui.sort);
    }

    /// Route a key through the focused window and apply the result.
    ///
    /// Returns `Ok(true)` if the app should quit.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        self.ui.status = None;
        let msg = super::input::dispatch(self, key);
        self.update(msg).await
    }

    /// Process a message and update app state (Elm Architecture update function).
    ///
    /// Returns `Ok(true)` if the app should quit, `Ok(false)` to continue.
    pub async fn update(&mut self, msg: super::Message) -> Result<bool> {
        use super::Message;
        match msg {
            Message::None => {}
            Message::Quit => return Ok(true),

            // ─────────────────────────────────────────────────────────────────
            // Focus
            // ─────────────────────────────────────────────────────────────────
            Message::Focus(focus) => self.ui.focus(focus),
            Message::FocusList => {
                self.ui.command.clear();
                self.ui.focus_list();
            }
            Message::ResetView => {
                self.ui.filter.clear();
                self.ui.sort.reset();
                self.ui.focus_list();
            }
            Message::DismissOverlay => {
                if self.ui.focus == super::Focus::Alert {
                    self.ui.alert.clear();
                }
                self.ui.focus_list();
            }

            // ─────────────────────────────────────────────────────────────────
            // Text entry
            // ─────────────────────────────────────────────────────────────────
            Message::FilterInput(c) => self.ui.filter.push(c),
            Message::FilterBackspace => {
                self.ui.filter.pop();
            }
            Message::SortInput(c) => self.ui.sort.push(c),
            Message::SortBackspace => self.ui.sort.pop(),
            Message::CommandInput(c) => self.ui.command.push(c),
            Message::CommandBackspace => {
                self.ui.command.pop();
            }
            Message::ExecuteCommand => {
                let command = std::mem::take(&mut self.ui.command);
                match command.trim() {
                    "q" | "wq" => return Ok(true),
                    "" => {}
                    other => self.ui.status = Some(format!("unknown command: {}", other)),
                }
                self.ui.focus_list();
            }

            // ─────────────────────────────────────────────────────────────────
            // List
            // ─────────────────────────────────────────────────────────────────
            Message::MoveDown => self.list.move_down(),
            Message::MoveUp => {
                if !self.list.move_up() {
                    self.ui.focus(super::Focus::Filter);
                }
            }
            Message::PageDown => self.list.page_down(),
            Message::PageUp => self.list.page_up(),
            Message::ToggleExpand => self.list.toggle_expanded(),
            Message::OpenMenu(menu) => self.ui.context_menu = Some(menu),
            Message::MilestonesMissing => {
                if let Some(issue) = self.list.selected_issue() {
                    tracing::warn!("No milestones resolved for {}", issue.project);
                    self.ui.status = Some(format!("no milestones for {}", issue.project));
                }
            }
            Message::Mutate(mutation) => {
                if let Err(e) = self.apply_mutation(mutation).await {
                    tracing::error!("{:#}", e);
                    self.ui.raise_alert(format!("{:#}", e));
                }
            }
        }
        Ok(false)
    }

    /// Text for the status line when it is not being edited.
    pub fn status_text(&self) -> String {
        let mut text = self.ui.status.clone().unwrap_or_else(|| {
            if self.ui.focus != Focus::List {
                return String::new();
            }
            self.list
                .selected_issue()
                .map(|issue| {
                    let mut s = issue.project.clone();
                    for label in &issue.labels {
                        s.push(' ');
                        s.push_str(label);
                    }
                    s
                })
                .unwrap_or_default()
        });
        if self.debug {
            text.push_str(&format!(
                " sel: {} scroll: {} rows: {}",
                self.list.selected(),
                self.list.scroll(),
                self.list.visible_rows()
            ));
        }
        text
    }
}
