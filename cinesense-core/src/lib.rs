//! # CineSense Core
//!
//! Core library for the CineSense movie sentiment analyzer.
//! Provides the analysis client and its model transport, the shell state
//! reducer and session driver, presentation tables, configuration, and
//! fundamental types.

pub mod analysis;
pub mod brain;
pub mod config;
pub mod error;
pub mod present;
pub mod providers;
pub mod session;
pub mod shell;
pub mod types;

// Re-export commonly used types at the crate root.
pub use analysis::AnalysisClient;
pub use brain::{ContentRequest, LlmProvider, MockLlmProvider};
pub use config::{CineConfig, LlmConfig, UiConfig};
pub use error::{AnalysisError, CineError, ConfigError};
pub use session::Session;
pub use shell::{Command, FAILURE_MESSAGE, HISTORY_LIMIT, HistoryEntry, ShellEvent, ShellState};
pub use types::{Analysis, GroundingSource, Review, Sentiment};
