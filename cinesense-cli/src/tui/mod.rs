//! TUI (Terminal User Interface) module for CineSense.
//!
//! A search box, the review card with its sentiment chart, and the
//! recent-analyses panel.

pub mod app;
pub mod event;
pub mod theme;
pub mod widgets;

use app::App;
use cinesense_core::{AnalysisClient, CineConfig};
use theme::Theme;

/// Run the TUI application.
pub async fn run(client: AnalysisClient, config: &CineConfig) -> anyhow::Result<()> {
    // Setup terminal
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableBracketedPaste
    )?;

    let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let mut app = App::new(client, Theme::from_name(&config.ui.theme));
    let result = app.run(&mut terminal).await;

    // Restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableBracketedPaste,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}
