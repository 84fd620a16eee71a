//! Status bar widget showing keybinding hints for the focused panel.

use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Which panel receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    History,
}

impl Focus {
    /// Short display label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Search => "SEARCH",
            Self::History => "HISTORY",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Search => Self::History,
            Self::History => Self::Search,
        }
    }
}

impl std::fmt::Display for Focus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Render the status bar.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    focus: Focus,
    is_analyzing: bool,
    theme: &Theme,
) {
    let hints = match (focus, is_analyzing) {
        (Focus::Search, false) => {
            "[Enter] Analyze │ [↑↓/PgUp/PgDn] Scroll │ [Tab] History │ [Esc] Dismiss │ [Ctrl+C] Quit"
        }
        (Focus::Search, true) => "Analyzing... │ [Tab] History │ [Ctrl+C] Quit",
        (Focus::History, _) => {
            "[↑↓] Navigate │ [Enter] Open │ [Ctrl+L] Clear │ [Tab] Search │ [q] Quit"
        }
    };

    let spans = vec![
        Span::styled(
            format!(" {} ", focus.label()),
            theme
                .status_bar_style()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", theme.status_bar_style()),
        Span::styled(hints, theme.status_bar_style()),
        Span::styled(
            "   Powered by Gemini with Google Search grounding",
            theme.status_bar_style().fg(theme.muted_fg),
        ),
    ];

    let bar = Paragraph::new(Line::from(spans)).style(theme.status_bar_style());
    frame.render_widget(bar, area);
}
