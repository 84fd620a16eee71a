//! One-line error banner shown above the results.

use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Render `message` with a dismiss hint.
pub fn render_error_banner(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(format!(" ⚠ {} ", message), theme.error_style()),
        Span::styled(" [Esc] dismiss", theme.muted_style()),
    ]))
    .style(theme.base_style());
    frame.render_widget(banner, area);
}
