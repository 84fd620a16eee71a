//! Header bar widget showing the app name, model, and analysis status.

use crate::tui::theme::Theme;
use cinesense_core::HISTORY_LIMIT;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Data needed to render the header bar.
#[derive(Debug, Clone)]
pub struct HeaderData {
    pub model: String,
    pub is_analyzing: bool,
    pub spinner_frame: usize,
    pub history_len: usize,
}

impl Default for HeaderData {
    fn default() -> Self {
        Self {
            model: "unknown".to_string(),
            is_analyzing: false,
            spinner_frame: 0,
            history_len: 0,
        }
    }
}

impl HeaderData {
    /// Status indicator: a spinner while analyzing, a dot otherwise.
    pub fn indicator(&self) -> &'static str {
        if self.is_analyzing {
            SPINNER[self.spinner_frame % SPINNER.len()]
        } else {
            "●"
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_analyzing {
            "Analyzing..."
        } else {
            "Ready"
        }
    }

    pub fn history_display(&self) -> String {
        format!("history {}/{}", self.history_len, HISTORY_LIMIT)
    }
}

/// Render the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, data: &HeaderData, theme: &Theme) {
    let status_color = if data.is_analyzing {
        theme.warning_fg
    } else {
        theme.success_fg
    };
    let separator = || Span::styled(" │ ", theme.header_style().fg(theme.border_color));

    let spans = vec![
        Span::styled(
            " CineSense",
            theme
                .header_style()
                .add_modifier(Modifier::BOLD)
                .fg(theme.accent),
        ),
        Span::styled(" · Movie Sentiment Analyzer", theme.header_style().fg(theme.muted_fg)),
        separator(),
        Span::styled(
            data.model.clone(),
            theme.header_style().add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(
            format!("{} {}", data.indicator(), data.status_label()),
            theme.header_style().fg(status_color),
        ),
        separator(),
        Span::styled(data.history_display(), theme.header_style()),
    ];

    let header = Paragraph::new(Line::from(spans)).style(theme.header_style());
    frame.render_widget(header, area);
}
