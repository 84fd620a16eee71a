//! Renderer-agnostic presentation tables.
//!
//! Maps sentiment labels to badge tones and chart distributions, and formats
//! reviews as plain text. The terminal UI turns these into styled widgets;
//! the REPL prints `render_plain` directly.

use crate::types::{Analysis, GroundingSource, Review, Sentiment};
use std::fmt::Write as _;

/// Legend name of the positive chart segment.
pub const POSITIVE_FOCUS: &str = "Positive Focus";

/// Legend name of the critical chart segment.
pub const CRITICAL_FOCUS: &str = "Critical Focus";

/// Color of the critical segment, shared by every sentiment.
pub const CRITICAL_COLOR: &str = "#334155";

/// Color family of a sentiment badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Emerald,
    Green,
    Amber,
    Orange,
    Red,
    /// Neutral tone for labels outside the known set.
    Slate,
}

impl BadgeTone {
    /// Foreground hex color for the tone.
    pub fn hex(&self) -> &'static str {
        match self {
            BadgeTone::Emerald => "#10b981",
            BadgeTone::Green => "#22c55e",
            BadgeTone::Amber => "#f59e0b",
            BadgeTone::Orange => "#f97316",
            BadgeTone::Red => "#ef4444",
            BadgeTone::Slate => "#64748b",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        hex_to_rgb(self.hex()).unwrap_or((100, 116, 139))
    }
}

/// Badge tone for a sentiment label. Unknown labels get [`BadgeTone::Slate`].
pub fn badge_tone(label: &str) -> BadgeTone {
    match label.parse::<Sentiment>() {
        Ok(sentiment) => sentiment_tone(sentiment),
        Err(_) => BadgeTone::Slate,
    }
}

pub fn sentiment_tone(sentiment: Sentiment) -> BadgeTone {
    match sentiment {
        Sentiment::VeryPositive => BadgeTone::Emerald,
        Sentiment::Positive => BadgeTone::Green,
        Sentiment::Mixed => BadgeTone::Amber,
        Sentiment::Negative => BadgeTone::Orange,
        Sentiment::VeryNegative => BadgeTone::Red,
    }
}

/// One segment of the sentiment chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSlice {
    pub name: &'static str,
    /// Share of the whole, in percent.
    pub value: u8,
    /// Hex color, `#rrggbb`.
    pub color: &'static str,
}

impl ChartSlice {
    pub fn rgb(&self) -> (u8, u8, u8) {
        hex_to_rgb(self.color).unwrap_or((0, 0, 0))
    }
}

/// Two-segment distribution for a sentiment label.
///
/// The segments always sum to 100. Unknown labels yield an empty chart.
pub fn sentiment_distribution(label: &str) -> Vec<ChartSlice> {
    match label.parse::<Sentiment>() {
        Ok(sentiment) => distribution_for(sentiment).to_vec(),
        Err(_) => Vec::new(),
    }
}

pub fn distribution_for(sentiment: Sentiment) -> [ChartSlice; 2] {
    let (positive, color) = match sentiment {
        Sentiment::VeryPositive => (90, "#10b981"),
        Sentiment::Positive => (75, "#22c55e"),
        Sentiment::Mixed => (50, "#f59e0b"),
        Sentiment::Negative => (30, "#f97316"),
        Sentiment::VeryNegative => (10, "#ef4444"),
    };
    [
        ChartSlice {
            name: POSITIVE_FOCUS,
            value: positive,
            color,
        },
        ChartSlice {
            name: CRITICAL_FOCUS,
            value: 100 - positive,
            color: CRITICAL_COLOR,
        },
    ]
}

/// Parse `#rrggbb` into an RGB triple.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Rating with one decimal place, e.g. `4.2`.
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", rating)
}

/// "2014 • Sci-Fi", either half alone, or `None` when both are absent.
pub fn year_genre_line(review: &Review) -> Option<String> {
    match (review.release_year.as_deref(), review.genre.as_deref()) {
        (Some(year), Some(genre)) => Some(format!("{} • {}", year, genre)),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}

/// Sources that carry a usable web reference.
pub fn web_sources(sources: &[GroundingSource]) -> impl Iterator<Item = &GroundingSource> {
    sources.iter().filter(|s| !s.uri.trim().is_empty())
}

/// Render an analysis as plain text for line-oriented output.
pub fn render_plain(analysis: &Analysis) -> String {
    let review = &analysis.review;
    let mut out = String::new();

    let _ = writeln!(out, "{}", review.title);
    if let Some(line) = year_genre_line(review) {
        let _ = writeln!(out, "{}", line);
    }
    let _ = writeln!(
        out,
        "Rating: {} / 5    Sentiment: {}",
        format_rating(review.rating),
        review.sentiment
    );
    let [positive, critical] = distribution_for(review.sentiment);
    let _ = writeln!(
        out,
        "{}: {}%    {}: {}%",
        positive.name, positive.value, critical.name, critical.value
    );
    if !review.emotions.is_empty() {
        let _ = writeln!(out, "Emotions: {}", review.emotions.join(", "));
    }

    let _ = writeln!(out, "\nStrengths");
    for item in &review.strengths {
        let _ = writeln!(out, "  + {}", item);
    }
    let _ = writeln!(out, "\nWeaknesses");
    for item in &review.weaknesses {
        let _ = writeln!(out, "  - {}", item);
    }

    let _ = writeln!(out, "\n{}", review.narrative);

    let mut sources = web_sources(&analysis.sources).peekable();
    if sources.peek().is_some() {
        let _ = writeln!(out, "\nVerified Sources");
        for source in sources {
            let _ = writeln!(out, "  {} <{}>", source.title, source.uri);
        }
    }
    out
}
