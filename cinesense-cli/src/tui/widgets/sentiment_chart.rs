//! Sentiment distribution widget: a two-segment proportional bar with legend.

use crate::tui::theme::Theme;
use cinesense_core::present::{self, ChartSlice};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Split `width` cells between slices in proportion to their values.
///
/// The widths always sum to `width`; the last slice absorbs rounding.
pub fn bar_segments(width: u16, slices: &[ChartSlice]) -> Vec<u16> {
    let total: u32 = slices.iter().map(|s| s.value as u32).sum();
    if slices.is_empty() || total == 0 {
        return Vec::new();
    }
    let mut widths: Vec<u16> = slices
        .iter()
        .map(|s| ((width as u32 * s.value as u32 + total / 2) / total) as u16)
        .collect();
    let assigned: u16 = widths[..widths.len() - 1].iter().sum();
    if let Some(last) = widths.last_mut() {
        *last = width.saturating_sub(assigned);
    }
    widths
}

/// Render the chart for a sentiment label.
pub fn render_sentiment_chart(frame: &mut Frame, area: Rect, label: &str, theme: &Theme) {
    let block = Block::default()
        .title(" Sentiment Distribution ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let slices = present::sentiment_distribution(label);
    if slices.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled("No chart data", theme.muted_style())))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let tone = present::badge_tone(label);
    let bar_width = inner.width.saturating_sub(2);
    let bar: Vec<Span> = slices
        .iter()
        .zip(bar_segments(bar_width, &slices))
        .map(|(slice, cells)| {
            Span::styled(
                "█".repeat(cells as usize),
                Style::default().fg(theme.slice_color(slice)),
            )
        })
        .collect();

    let mut lines = vec![
        Line::from(Span::styled(
            label.to_string(),
            Style::default()
                .fg(theme.tone_color(tone))
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(bar).alignment(Alignment::Center),
        Line::default(),
    ];
    for slice in &slices {
        lines.push(Line::from(vec![
            Span::styled(" ■ ", Style::default().fg(theme.slice_color(slice))),
            Span::styled(format!("{:<16}", slice.name), Style::default().fg(theme.fg)),
            Span::styled(format!("{:>3}%", slice.value), theme.muted_style()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
