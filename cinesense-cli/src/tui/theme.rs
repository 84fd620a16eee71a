//! Theme system for the CineSense TUI.
//!
//! Provides dark and light color palettes, loaded from UiConfig.theme.

use cinesense_core::present::{BadgeTone, ChartSlice};
use ratatui::style::{Color, Modifier, Style};

/// Complete color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub muted_fg: Color,
    pub accent: Color,

    // Status colors
    pub error_fg: Color,
    pub error_bg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,

    // UI chrome
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub border_color: Color,
    pub focus_border_color: Color,
    pub selection_bg: Color,
}

impl Theme {
    /// Create the default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            bg: Color::Rgb(2, 6, 23),
            fg: Color::Rgb(241, 245, 249),
            muted_fg: Color::Rgb(148, 163, 184),
            accent: Color::Rgb(129, 140, 248),

            error_fg: Color::Rgb(248, 113, 113),
            error_bg: Color::Rgb(69, 10, 10),
            warning_fg: Color::Rgb(251, 191, 36),
            success_fg: Color::Rgb(52, 211, 153),

            header_bg: Color::Rgb(15, 23, 42),
            header_fg: Color::Rgb(241, 245, 249),
            status_bar_bg: Color::Rgb(15, 23, 42),
            status_bar_fg: Color::Rgb(148, 163, 184),
            border_color: Color::Rgb(51, 65, 85),
            focus_border_color: Color::Rgb(129, 140, 248),
            selection_bg: Color::Rgb(30, 41, 59),
        }
    }

    /// Create the light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            bg: Color::Rgb(248, 250, 252),
            fg: Color::Rgb(15, 23, 42),
            muted_fg: Color::Rgb(100, 116, 139),
            accent: Color::Rgb(79, 70, 229),

            error_fg: Color::Rgb(185, 28, 28),
            error_bg: Color::Rgb(254, 226, 226),
            warning_fg: Color::Rgb(180, 83, 9),
            success_fg: Color::Rgb(4, 120, 87),

            header_bg: Color::Rgb(226, 232, 240),
            header_fg: Color::Rgb(15, 23, 42),
            status_bar_bg: Color::Rgb(226, 232, 240),
            status_bar_fg: Color::Rgb(71, 85, 105),
            border_color: Color::Rgb(203, 213, 225),
            focus_border_color: Color::Rgb(79, 70, 229),
            selection_bg: Color::Rgb(224, 231, 255),
        }
    }

    /// Load a theme by name from config. Falls back to dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    // -- Convenience style constructors --

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted_fg)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error_fg)
            .bg(self.error_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success_fg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border_color)
    }

    /// Border style for a panel, highlighted when it has focus.
    pub fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus_border_color)
        } else {
            self.border_style()
        }
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Foreground color of a sentiment badge tone.
    pub fn tone_color(&self, tone: BadgeTone) -> Color {
        let (r, g, b) = tone.rgb();
        Color::Rgb(r, g, b)
    }

    /// Bold badge style: the tone as background with the base background as text.
    pub fn badge_style(&self, tone: BadgeTone) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.tone_color(tone))
            .add_modifier(Modifier::BOLD)
    }

    pub fn slice_color(&self, slice: &ChartSlice) -> Color {
        let (r, g, b) = slice.rgb();
        Color::Rgb(r, g, b)
    }
}
