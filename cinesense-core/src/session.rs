//! Session driver: the shell reducer paired with an analysis client.
//!
//! [`Session`] runs each [`Command`] the reducer emits to completion before
//! returning, which suits line-oriented front ends. Event-loop front ends
//! call [`run_command`] on a spawned task instead and feed the resulting
//! event back through [`Session::dispatch`] or [`ShellState::apply`].

use crate::analysis::AnalysisClient;
use crate::shell::{Command, ShellEvent, ShellState};
use tracing::{error, info};

/// Execute one command and turn its outcome into the completion event.
///
/// Failures are logged here with their full cause; the shell only ever
/// shows the generic failure message.
pub async fn run_command(client: &AnalysisClient, command: Command) -> ShellEvent {
    match command {
        Command::Analyze { request_id, title } => match client.analyze(&title).await {
            Ok(analysis) => {
                info!(
                    request_id,
                    title = analysis.review.title.as_str(),
                    "Analysis succeeded"
                );
                ShellEvent::AnalysisSucceeded {
                    request_id,
                    analysis,
                }
            }
            Err(e) => {
                error!(request_id, title = title.as_str(), error = %e, "Analysis failed");
                ShellEvent::AnalysisFailed {
                    request_id,
                    message: e.to_string(),
                }
            }
        },
    }
}

/// One interactive session.
pub struct Session {
    state: ShellState,
    client: AnalysisClient,
}

impl Session {
    pub fn new(client: AnalysisClient) -> Self {
        Self {
            state: ShellState::new(),
            client,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// Apply an event without running the command it produces.
    pub fn dispatch(&mut self, event: ShellEvent) -> Option<Command> {
        self.state.apply(event)
    }

    /// Set the query, submit it, and wait for the analysis to finish.
    ///
    /// Returns `false` when the submit was rejected (blank query or an
    /// analysis already pending) and the client was not called.
    pub async fn submit_query(&mut self, text: &str) -> bool {
        self.state.apply(ShellEvent::QueryChanged(text.to_string()));
        let Some(command) = self.state.apply(ShellEvent::Submit) else {
            return false;
        };
        let completion = run_command(&self.client, command).await;
        self.state.apply(completion);
        true
    }

    /// Show a history entry. Returns `false` for an out-of-range index.
    pub fn select_history(&mut self, index: usize) -> bool {
        if index >= self.state.history().len() {
            return false;
        }
        self.state.apply(ShellEvent::SelectHistory(index));
        true
    }
}
