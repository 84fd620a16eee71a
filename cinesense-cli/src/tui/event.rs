//! Terminal event handling using crossterm EventStream.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;

/// High-level actions the TUI can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleFocus,
    DismissError,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    HistoryUp,
    HistoryDown,
    OpenHistory,
    ClearHistory,
}

/// Reads terminal events asynchronously using crossterm's EventStream.
pub struct EventHandler {
    stream: EventStream,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }

    /// Read the next terminal event. Returns None if the stream ends.
    pub async fn next(&mut self) -> Option<Event> {
        self.stream.next().await.and_then(|r| r.ok())
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a key event to an Action regardless of focus.
/// Returns None if the event should go to the focused panel.
pub fn map_global_key(event: &KeyEvent) -> Option<Action> {
    match (event.modifiers, event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(Action::ClearHistory),
        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => Some(Action::ToggleFocus),
        (_, KeyCode::Esc) => Some(Action::DismissError),
        (_, KeyCode::PageUp) => Some(Action::PageUp),
        (_, KeyCode::PageDown) => Some(Action::PageDown),
        _ => None,
    }
}

/// Map key events while the history panel has focus.
pub fn map_history_key(event: &KeyEvent) -> Option<Action> {
    match event.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::HistoryUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::HistoryDown),
        KeyCode::Enter => Some(Action::OpenHistory),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

/// Map scroll keys while the search input has focus.
pub fn map_input_scroll_key(event: &KeyEvent) -> Option<Action> {
    match (event.modifiers, event.code) {
        (KeyModifiers::NONE, KeyCode::Up) => Some(Action::ScrollUp),
        (KeyModifiers::NONE, KeyCode::Down) => Some(Action::ScrollDown),
        _ => None,
    }
}
