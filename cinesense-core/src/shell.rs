//! Application shell state.
//!
//! All mutable session state lives in [`ShellState`] and changes only through
//! [`update`]. Side effects are returned as [`Command`]s for the caller to
//! run; their outcome comes back as another [`ShellEvent`].

use crate::types::{Analysis, GroundingSource, Review};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum number of reviews kept in history.
pub const HISTORY_LIMIT: usize = 10;

/// User-facing message for every failed analysis.
pub const FAILURE_MESSAGE: &str =
    "Failed to analyze movie. Please try again with a different title.";

/// A past successful analysis.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub review: Arc<Review>,
    /// Citations shown with the review when it was analyzed.
    pub sources: Vec<GroundingSource>,
    pub analyzed_at: DateTime<Utc>,
}

/// Inputs to the shell.
#[derive(Debug, Clone)]
pub enum ShellEvent {
    QueryChanged(String),
    Submit,
    AnalysisSucceeded { request_id: u64, analysis: Analysis },
    AnalysisFailed { request_id: u64, message: String },
    SelectHistory(usize),
    DismissError,
    ClearHistory,
}

/// Side effects requested by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run one analysis for `title` and report back with `request_id`.
    Analyze { request_id: u64, title: String },
}

/// Session state for one interactive run.
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    query: String,
    in_flight: bool,
    error: Option<String>,
    current: Option<Arc<Review>>,
    sources: Vec<GroundingSource>,
    history: Vec<HistoryEntry>,
    next_request_id: u64,
    pending: Option<u64>,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current(&self) -> Option<&Arc<Review>> {
        self.current.as_ref()
    }

    pub fn sources(&self) -> &[GroundingSource] {
        &self.sources
    }

    /// History, most recent first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Id of the outstanding analysis, if any.
    pub fn pending_request(&self) -> Option<u64> {
        self.pending
    }

    /// Whether a submit would start an analysis right now.
    pub fn can_submit(&self) -> bool {
        !self.in_flight && !self.query.trim().is_empty()
    }

    /// Apply one event in place, returning the side effect it requests.
    pub fn apply(&mut self, event: ShellEvent) -> Option<Command> {
        match event {
            ShellEvent::QueryChanged(query) => {
                self.query = query;
                None
            }
            ShellEvent::Submit => self.submit(),
            ShellEvent::AnalysisSucceeded {
                request_id,
                analysis,
            } => {
                if self.take_pending(request_id) {
                    self.succeed(analysis);
                }
                None
            }
            ShellEvent::AnalysisFailed {
                request_id,
                message,
            } => {
                if self.take_pending(request_id) {
                    debug!(request_id, cause = %message, "Analysis failed");
                    self.error = Some(FAILURE_MESSAGE.to_string());
                }
                None
            }
            ShellEvent::SelectHistory(index) => {
                if let Some(entry) = self.history.get(index) {
                    self.current = Some(Arc::clone(&entry.review));
                    self.query = entry.review.title.clone();
                    self.sources = entry.sources.clone();
                }
                None
            }
            ShellEvent::DismissError => {
                self.error = None;
                None
            }
            ShellEvent::ClearHistory => {
                self.history.clear();
                None
            }
        }
    }

    fn submit(&mut self) -> Option<Command> {
        if !self.can_submit() {
            return None;
        }
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.pending = Some(request_id);
        self.in_flight = true;
        self.error = None;
        Some(Command::Analyze {
            request_id,
            title: self.query.trim().to_string(),
        })
    }

    /// Clear the pending request if `request_id` matches it.
    fn take_pending(&mut self, request_id: u64) -> bool {
        if self.pending != Some(request_id) {
            warn!(
                request_id,
                pending = ?self.pending,
                "Ignoring completion for a request that is not pending"
            );
            return false;
        }
        self.pending = None;
        self.in_flight = false;
        true
    }

    fn succeed(&mut self, analysis: Analysis) {
        let review = Arc::new(analysis.review);
        self.history.insert(
            0,
            HistoryEntry {
                review: Arc::clone(&review),
                sources: analysis.sources.clone(),
                analyzed_at: Utc::now(),
            },
        );
        self.history.truncate(HISTORY_LIMIT);
        self.current = Some(review);
        self.sources = analysis.sources;
    }
}

/// Reducer form of [`ShellState::apply`].
pub fn update(mut state: ShellState, event: ShellEvent) -> (ShellState, Option<Command>) {
    let command = state.apply(event);
    (state, command)
}
