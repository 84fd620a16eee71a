//! Search box widget wrapping tui-textarea for single-line title entry.

use crate::tui::theme::Theme;
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

const PLACEHOLDER: &str = "Enter a movie title (e.g., Inception, The Godfather)...";

/// Search input widget wrapping tui-textarea.
pub struct InputWidget {
    textarea: TextArea<'static>,
    busy: bool,
}

/// Result of processing an input event.
#[derive(Debug, PartialEq)]
pub enum InputAction {
    /// User pressed Enter with the current text.
    Submit(String),
    /// The text changed.
    Changed(String),
    /// Input was consumed without changing the text.
    Consumed,
    /// Input was not consumed (pass to the app).
    NotConsumed,
}

impl InputWidget {
    pub fn new(theme: &Theme) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_style(Style::default().fg(theme.fg).bg(theme.bg));
        textarea.set_placeholder_text(PLACEHOLDER);
        textarea.set_placeholder_style(theme.muted_style());

        let mut widget = Self {
            textarea,
            busy: false,
        };
        widget.set_busy(false, theme);
        widget
    }

    /// Get the current input text.
    pub fn text(&self) -> String {
        self.textarea.lines().join(" ")
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Replace the input text, leaving the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.textarea.select_all();
        self.textarea.cut();
        self.textarea.insert_str(text);
    }

    /// Show the analyzing state in the box title.
    pub fn set_busy(&mut self, busy: bool, theme: &Theme) {
        self.busy = busy;
        let (title, border) = if busy {
            (" Analyzing... ", Style::default().fg(theme.warning_fg))
        } else {
            (
                " Analyze a movie ",
                theme.panel_border_style(true).add_modifier(Modifier::BOLD),
            )
        };
        self.textarea.set_block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border),
        );
    }

    /// Process a crossterm event. Returns the resulting action.
    pub fn handle_event(&mut self, event: &Event) -> InputAction {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Enter,
                ..
            }) => InputAction::Submit(self.text()),
            Event::Key(KeyEvent {
                code: KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab,
                ..
            }) => InputAction::NotConsumed,
            Event::Paste(text) => {
                // Titles are single-line.
                let flat = text.replace(['\r', '\n'], " ");
                self.textarea.insert_str(flat);
                InputAction::Changed(self.text())
            }
            _ => {
                let before = self.text();
                self.textarea.input(event.clone());
                let after = self.text();
                if after == before {
                    InputAction::Consumed
                } else {
                    InputAction::Changed(after)
                }
            }
        }
    }

    /// Render the input widget.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&self.textarea, area);
    }
}
