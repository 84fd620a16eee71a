//! Review card widget: the full analysis of the current movie.
//!
//! Also renders the empty state shown before the first analysis.

use crate::tui::theme::Theme;
use cinesense_core::present;
use cinesense_core::{GroundingSource, Review};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Build the card's lines.
pub fn review_lines(
    review: &Review,
    sources: &[GroundingSource],
    theme: &Theme,
) -> Vec<Line<'static>> {
    let tone = present::sentiment_tone(review.sentiment);
    let heading = |text: &str, color| {
        Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines = vec![Line::from(Span::styled(
        review.title.clone(),
        Style::default()
            .fg(theme.fg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))];
    if let Some(year_genre) = present::year_genre_line(review) {
        lines.push(Line::from(Span::styled(year_genre, theme.muted_style())));
    }
    lines.push(Line::default());

    lines.push(Line::from(vec![
        Span::styled(
            format!("★ {}", present::format_rating(review.rating)),
            Style::default()
                .fg(theme.warning_fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" / 5   ", theme.muted_style()),
        Span::styled(format!(" {} ", review.sentiment), theme.badge_style(tone)),
    ]));

    if !review.emotions.is_empty() {
        let mut tags = vec![Span::styled("Emotions: ", theme.muted_style())];
        for emotion in &review.emotions {
            tags.push(Span::styled(
                format!("#{}", emotion),
                Style::default().fg(theme.accent),
            ));
            tags.push(Span::raw(" "));
        }
        lines.push(Line::from(tags));
    }
    lines.push(Line::default());

    lines.push(heading("Strengths", theme.success_fg));
    for item in &review.strengths {
        lines.push(Line::from(vec![
            Span::styled("  ✓ ", theme.success_style()),
            Span::styled(item.clone(), Style::default().fg(theme.fg)),
        ]));
    }
    lines.push(Line::default());

    lines.push(heading("Weaknesses", theme.error_fg));
    for item in &review.weaknesses {
        lines.push(Line::from(vec![
            Span::styled("  ✗ ", Style::default().fg(theme.error_fg)),
            Span::styled(item.clone(), Style::default().fg(theme.fg)),
        ]));
    }
    lines.push(Line::default());

    lines.push(heading("Review", theme.accent));
    lines.push(Line::from(Span::styled(
        format!("\u{201c}{}\u{201d}", review.narrative),
        Style::default().fg(theme.fg).add_modifier(Modifier::ITALIC),
    )));

    let mut web = present::web_sources(sources).peekable();
    if web.peek().is_some() {
        lines.push(Line::default());
        lines.push(heading("Verified Sources", theme.muted_fg));
        for source in web {
            lines.push(Line::from(vec![
                Span::styled("  • ", theme.muted_style()),
                Span::styled(source.title.clone(), Style::default().fg(theme.accent)),
                Span::styled(format!("  {}", source.uri), theme.muted_style()),
            ]));
        }
    }

    lines
}

/// Rows `lines` occupy once wrapped to `width` columns.
pub fn wrapped_height(lines: &[Line], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines.iter().map(|l| l.width().div_ceil(width).max(1)).sum()
}

/// Render the review card, scrolled down by `scroll` rows.
pub fn render_review_card(
    frame: &mut Frame,
    area: Rect,
    review: &Review,
    sources: &[GroundingSource],
    scroll: u16,
    theme: &Theme,
) {
    let block = Block::default()
        .title(" Analysis ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let card = Paragraph::new(review_lines(review, sources, theme))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(card, area);
}

/// Render the placeholder shown before any analysis.
pub fn render_empty_state(frame: &mut Frame, area: Rect, is_analyzing: bool, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let message = if is_analyzing {
        "Analyzing reviews and searching the web..."
    } else {
        "Search for a movie to get started"
    };

    let padding = area.height.saturating_sub(4) / 2;
    let mut lines: Vec<Line> = (0..padding).map(|_| Line::default()).collect();
    lines.push(Line::from(Span::styled("🎬", Style::default())));
    lines.push(Line::from(Span::styled(
        message,
        theme.muted_style().add_modifier(Modifier::BOLD),
    )));

    let placeholder = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(placeholder, area);
}
