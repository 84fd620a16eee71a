//! "Recent Analyses" panel listing session history, most recent first.

use crate::tui::theme::Theme;
use cinesense_core::HistoryEntry;
use cinesense_core::present;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `max_width` terminal columns, ending with `…` when cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

/// Two-line list item: title, then rating and sentiment.
fn history_item(entry: &HistoryEntry, title_width: usize, theme: &Theme) -> ListItem<'static> {
    let review = &entry.review;
    let tone = present::sentiment_tone(review.sentiment);
    ListItem::new(vec![
        Line::from(Span::styled(
            truncate_to_width(&review.title, title_width),
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("  {}/5 ", present::format_rating(review.rating)),
                theme.muted_style(),
            ),
            Span::styled(
                review.sentiment.label(),
                Style::default().fg(theme.tone_color(tone)),
            ),
            Span::styled(
                format!("  {}", entry.analyzed_at.with_timezone(&chrono::Local).format("%H:%M")),
                theme.muted_style(),
            ),
        ]),
    ])
}

/// Render the history panel. `cursor` is highlighted only while `focused`.
pub fn render_history_panel(
    frame: &mut Frame,
    area: Rect,
    history: &[HistoryEntry],
    cursor: usize,
    focused: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .title(format!(" Recent Analyses ({}) ", history.len()))
        .borders(Borders::ALL)
        .border_style(theme.panel_border_style(focused));

    if history.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No analyses yet. Search for a movie to build your history.",
            theme.muted_style(),
        )))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Borders plus the highlight symbol.
    let title_width = usize::from(area.width.saturating_sub(4));
    let items: Vec<ListItem> = history
        .iter()
        .map(|e| history_item(e, title_width, theme))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selection_style())
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if focused {
        state.select(Some(cursor.min(history.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
