//! Main TUI application: state, event loop, and top-level draw function.

use crate::tui::event::{
    Action, EventHandler, map_global_key, map_history_key, map_input_scroll_key,
};
use crate::tui::theme::Theme;
use crate::tui::widgets::error_banner::render_error_banner;
use crate::tui::widgets::header::{HeaderData, render_header};
use crate::tui::widgets::history_panel::render_history_panel;
use crate::tui::widgets::input_area::{InputAction, InputWidget};
use crate::tui::widgets::review_card::{
    render_empty_state, render_review_card, review_lines, wrapped_height,
};
use crate::tui::widgets::sentiment_chart::render_sentiment_chart;
use crate::tui::widgets::status_bar::{Focus, render_status_bar};
use cinesense_core::session::run_command;
use cinesense_core::{AnalysisClient, Command, ShellEvent, ShellState};
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use std::cell::Cell;
use tokio::sync::mpsc;

const PAGE_SCROLL: u16 = 10;

/// The main TUI application state.
pub struct App {
    // Session state, written only through `ShellState::apply`
    pub shell: ShellState,
    client: AnalysisClient,

    // UI state
    pub input: InputWidget,
    pub header: HeaderData,
    pub theme: Theme,
    pub focus: Focus,
    pub history_cursor: usize,
    pub scroll: u16,
    // Card area from the last draw, for bounding `scroll`
    card_area: Cell<Rect>,

    // Analysis completions from spawned tasks
    completion_tx: mpsc::UnboundedSender<ShellEvent>,
    completion_rx: mpsc::UnboundedReceiver<ShellEvent>,

    pub should_quit: bool,
}

impl App {
    /// Create a new TUI application.
    pub fn new(client: AnalysisClient, theme: Theme) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let header = HeaderData {
            model: client.model_name().to_string(),
            ..Default::default()
        };

        Self {
            shell: ShellState::new(),
            client,
            input: InputWidget::new(&theme),
            header,
            theme,
            focus: Focus::Search,
            history_cursor: 0,
            scroll: 0,
            card_area: Cell::new(Rect::default()),
            completion_tx,
            completion_rx,
            should_quit: false,
        }
    }

    /// Run the main event loop.
    pub async fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_handler = EventHandler::new();
        let tick_rate = std::time::Duration::from_millis(100);

        loop {
            // Draw
            terminal.draw(|frame| self.draw(frame))?;

            // Poll events
            tokio::select! {
                // Terminal events
                event = event_handler.next() => {
                    match event {
                        Some(event) => self.handle_terminal_event(event),
                        None => self.should_quit = true,
                    }
                }
                // Analysis completions
                event = self.completion_rx.recv() => {
                    if let Some(event) = event {
                        self.handle_shell_event(event);
                    }
                }
                // Tick
                _ = tokio::time::sleep(tick_rate) => {
                    if self.shell.in_flight() {
                        self.header.spinner_frame = self.header.spinner_frame.wrapping_add(1);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the full UI.
    pub fn draw(&self, frame: &mut Frame) {
        let error_height = u16::from(self.shell.error().is_some());

        let [header_area, input_area, error_area, main_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(error_height),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        render_header(frame, header_area, &self.header, &self.theme);
        self.input.render(frame, input_area);

        if let Some(error) = self.shell.error() {
            render_error_banner(frame, error_area, error, &self.theme);
        }

        let [card_area, side_area] =
            Layout::horizontal([Constraint::Percentage(68), Constraint::Percentage(32)])
                .areas(main_area);

        let shown = self.shell.current().filter(|_| !self.shell.in_flight());
        let history_area = match shown {
            Some(review) => {
                self.card_area.set(card_area);
                render_review_card(
                    frame,
                    card_area,
                    review,
                    self.shell.sources(),
                    self.scroll,
                    &self.theme,
                );
                let [chart_area, history_area] =
                    Layout::vertical([Constraint::Length(9), Constraint::Min(4)])
                        .areas(side_area);
                render_sentiment_chart(frame, chart_area, review.sentiment.label(), &self.theme);
                history_area
            }
            None => {
                if self.shell.in_flight() || self.shell.error().is_none() {
                    render_empty_state(frame, card_area, self.shell.in_flight(), &self.theme);
                }
                side_area
            }
        };

        render_history_panel(
            frame,
            history_area,
            self.shell.history(),
            self.history_cursor,
            self.focus == Focus::History,
            &self.theme,
        );

        render_status_bar(
            frame,
            status_area,
            self.focus,
            self.shell.in_flight(),
            &self.theme,
        );
    }

    /// Handle a terminal event (keyboard, paste, resize).
    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Paste(_) if self.focus == Focus::Search => {
                if let InputAction::Changed(text) = self.input.handle_event(&event) {
                    self.shell.apply(ShellEvent::QueryChanged(text));
                }
            }
            _ => {} // ratatui redraws on next frame
        }
    }

    /// Handle a key event.
    fn handle_key_event(&mut self, key: KeyEvent) {
        if let Some(action) = map_global_key(&key) {
            self.execute_action(action);
            return;
        }

        match self.focus {
            Focus::History => {
                if let Some(action) = map_history_key(&key) {
                    self.execute_action(action);
                }
            }
            Focus::Search => match self.input.handle_event(&Event::Key(key)) {
                InputAction::Submit(text) => self.submit(&text),
                InputAction::Changed(text) => {
                    self.shell.apply(ShellEvent::QueryChanged(text));
                }
                InputAction::NotConsumed => {
                    if let Some(action) = map_input_scroll_key(&key) {
                        self.execute_action(action);
                    }
                }
                InputAction::Consumed => {}
            },
        }
    }

    fn execute_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleFocus => {
                self.focus = self.focus.toggled();
                self.history_cursor = 0;
            }
            Action::DismissError => {
                self.shell.apply(ShellEvent::DismissError);
            }
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::PageUp => self.scroll = self.scroll.saturating_sub(PAGE_SCROLL),
            Action::PageDown => self.scroll_down(PAGE_SCROLL),
            Action::HistoryUp => self.history_cursor = self.history_cursor.saturating_sub(1),
            Action::HistoryDown => {
                let last = self.shell.history().len().saturating_sub(1);
                self.history_cursor = (self.history_cursor + 1).min(last);
            }
            Action::OpenHistory => self.open_history(self.history_cursor),
            Action::ClearHistory => {
                self.shell.apply(ShellEvent::ClearHistory);
                self.history_cursor = 0;
                self.header.history_len = 0;
            }
        }
    }

    fn scroll_down(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_add(rows).min(self.max_scroll());
    }

    /// Furthest scroll that still leaves the card's last row on screen.
    fn max_scroll(&self) -> u16 {
        let Some(review) = self.shell.current() else {
            return 0;
        };
        let area = self.card_area.get();
        let lines = review_lines(review, self.shell.sources(), &self.theme);
        // Inside the borders.
        let total = wrapped_height(&lines, area.width.saturating_sub(2));
        let visible = usize::from(area.height.saturating_sub(2));
        u16::try_from(total.saturating_sub(visible)).unwrap_or(u16::MAX)
    }

    /// Submit the search box text, or run a slash command.
    fn submit(&mut self, text: &str) {
        if text.trim_start().starts_with('/') {
            self.handle_command(text.trim());
            return;
        }

        self.shell.apply(ShellEvent::QueryChanged(text.to_string()));
        if let Some(command) = self.shell.apply(ShellEvent::Submit) {
            self.spawn_analysis(command);
        }
    }

    /// Handle a slash command typed into the search box.
    pub fn handle_command(&mut self, cmd: &str) {
        match cmd {
            "/quit" | "/exit" | "/q" => self.should_quit = true,
            "/clear" => self.execute_action(Action::ClearHistory),
            _ => return,
        }
        self.input.set_text("");
        self.shell.apply(ShellEvent::QueryChanged(String::new()));
    }

    /// Run the analysis on a background task; the result comes back through
    /// the completion channel.
    fn spawn_analysis(&mut self, command: Command) {
        self.input.set_busy(true, &self.theme);
        self.header.is_analyzing = true;

        let client = self.client.clone();
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let event = run_command(&client, command).await;
            let _ = tx.send(event);
        });
    }

    /// Show a history entry in the card and search box.
    fn open_history(&mut self, index: usize) {
        if index >= self.shell.history().len() {
            return;
        }
        self.shell.apply(ShellEvent::SelectHistory(index));
        self.input.set_text(self.shell.query());
        self.scroll = 0;
        self.focus = Focus::Search;
    }

    /// Apply a completion (or any other shell event) and refresh derived UI state.
    pub fn handle_shell_event(&mut self, event: ShellEvent) {
        let is_completion = matches!(
            event,
            ShellEvent::AnalysisSucceeded { .. } | ShellEvent::AnalysisFailed { .. }
        );
        self.shell.apply(event);
        if is_completion {
            self.scroll = 0;
        }
        let busy = self.shell.in_flight();
        self.input.set_busy(busy, &self.theme);
        self.header.is_analyzing = busy;
        self.header.history_len = self.shell.history().len();
    }

    /// Wait for the next analysis completion.
    pub async fn next_completion(&mut self) -> Option<ShellEvent> {
        self.completion_rx.recv().await
    }
}
