//! TUI widget modules.

pub mod error_banner;
pub mod header;
pub mod history_panel;
pub mod input_area;
pub mod review_card;
pub mod sentiment_chart;
pub mod status_bar;
