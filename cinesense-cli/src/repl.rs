//! REPL (Read-Eval-Print Loop) for interactive and single-title modes.

use cinesense_core::present::{self, BadgeTone};
use cinesense_core::{Analysis, AnalysisClient, Session, ShellState};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const HELP_TEXT: &str = "\
Commands:
  <title>      Analyze a movie
  /history     List recent analyses
  /open <n>    Show history entry n (1 = most recent)
  /clear       Clear history
  /help        Show this help
  /quit        Exit";

/// Run the line-based interactive mode.
pub async fn run_interactive(client: AnalysisClient, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("\x1b[1;35m");
        println!("  CineSense");
        println!("\x1b[0m");
        println!("  Model: {}", client.model_name());
        println!("  Type a movie title to analyze it, /help for commands, /quit to exit\n");
    }

    let mut session = Session::new(client);
    let stdin = io::stdin();
    loop {
        print!("\x1b[1;34m> \x1b[0m");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input).is_err() || input.is_empty() {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') {
            let (cmd, arg) = input.split_once(' ').unwrap_or((input, ""));
            match cmd {
                "/quit" | "/exit" | "/q" => {
                    println!("Goodbye!");
                    break;
                }
                "/help" | "/?" => println!("{}", HELP_TEXT),
                "/history" => print_history(session.state()),
                "/open" => handle_open_command(arg.trim(), &mut session),
                "/clear" => {
                    session.dispatch(cinesense_core::ShellEvent::ClearHistory);
                    println!("History cleared.");
                }
                _ => println!(
                    "Unknown command: {}. Type /help for available commands.",
                    cmd
                ),
            }
            continue;
        }

        println!("\x1b[90m  analyzing \"{}\"...\x1b[0m", input);
        session.submit_query(input).await;
        print_outcome(session.state());
    }

    Ok(())
}

/// Analyze one title, print the result, and report success as the exit code.
pub async fn run_single(
    title: &str,
    client: AnalysisClient,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let mut session = Session::new(client);
    if !session.submit_query(title).await {
        eprintln!("Error: a movie title is required");
        return Ok(ExitCode::FAILURE);
    }

    let state = session.state();
    match (state.error(), current_analysis(state)) {
        (None, Some(analysis)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
            Ok(ExitCode::SUCCESS)
        }
        (error, _) => {
            eprintln!(
                "\x1b[31mError: {}\x1b[0m",
                error.unwrap_or(cinesense_core::FAILURE_MESSAGE)
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_open_command(arg: &str, session: &mut Session) {
    let Ok(n) = arg.parse::<usize>() else {
        println!("Usage: /open <n>");
        return;
    };
    if n == 0 || !session.select_history(n - 1) {
        println!(
            "No history entry {}. There are {} entries.",
            n,
            session.state().history().len()
        );
        return;
    }
    if let Some(analysis) = current_analysis(session.state()) {
        print_analysis(&analysis);
    }
}

/// Snapshot of the review and sources currently shown.
fn current_analysis(state: &ShellState) -> Option<Analysis> {
    state.current().map(|review| Analysis {
        review: review.as_ref().clone(),
        sources: state.sources().to_vec(),
    })
}

fn print_outcome(state: &ShellState) {
    if let Some(error) = state.error() {
        println!("\x1b[31m{}\x1b[0m", error);
        return;
    }
    if let Some(analysis) = current_analysis(state) {
        print_analysis(&analysis);
    }
}

fn print_history(state: &ShellState) {
    if state.history().is_empty() {
        println!("No analyses yet.");
        return;
    }
    println!("Recent Analyses:");
    for (i, entry) in state.history().iter().enumerate() {
        let review = &entry.review;
        println!(
            "  {:>2}. {} \x1b[90m{}/5\x1b[0m {}{}\x1b[0m \x1b[90m{}\x1b[0m",
            i + 1,
            review.title,
            present::format_rating(review.rating),
            tone_ansi(present::sentiment_tone(review.sentiment)),
            review.sentiment,
            entry.analyzed_at.format("%H:%M:%S")
        );
    }
}

fn print_analysis(analysis: &Analysis) {
    let width = crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80)
        .clamp(40, 100);
    let text = present::render_plain(analysis);
    let mut lines = text.lines();

    // Title line is bold, the rest is wrapped to the terminal width.
    if let Some(title) = lines.next() {
        println!("\n\x1b[1m{}\x1b[0m", title);
    }
    let tone = tone_ansi(present::sentiment_tone(analysis.review.sentiment));
    for line in lines {
        if line.starts_with("Rating:") {
            println!("{}{}\x1b[0m", tone, line);
        } else if line.is_empty() {
            println!();
        } else {
            let indent: String = line.chars().take_while(|c| *c == ' ').collect();
            let options = textwrap::Options::new(width)
                .initial_indent(&indent)
                .subsequent_indent(&indent);
            println!("{}", textwrap::fill(line.trim_start(), options));
        }
    }
    println!();
}

fn tone_ansi(tone: BadgeTone) -> String {
    let (r, g, b) = tone.rgb();
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinesense_core::MockLlmProvider;
    use std::sync::Arc;

    fn payload() -> serde_json::Value {
        serde_json::json!({
            "movieName": "Heat",
            "overallSentiment": "Very Positive",
            "emotions": ["tension"],
            "strengths": ["heist"],
            "weaknesses": ["runtime"],
            "reviewText": "Tight.",
            "rating": 4.6
        })
    }

    #[tokio::test]
    async fn test_run_single_success_exit_code() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_response(MockLlmProvider::json_response(&payload(), &[]));
        let code = run_single("Heat", AnalysisClient::new(mock), true)
            .await
            .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_run_single_failure_exit_code() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_response(MockLlmProvider::text_response("", &[]));
        let code = run_single("Heat", AnalysisClient::new(mock), false)
            .await
            .unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_run_single_blank_title_fails_without_call() {
        let mock = Arc::new(MockLlmProvider::new());
        let code =
            tokio_test::block_on(run_single("  ", AnalysisClient::new(mock.clone()), false))
                .unwrap();
        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_open_command_selects_history() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_response(MockLlmProvider::json_response(&payload(), &[]));
        let mut session = Session::new(AnalysisClient::new(mock));
        session.submit_query("Heat").await;
        session.dispatch(cinesense_core::ShellEvent::QueryChanged("other".into()));

        handle_open_command("1", &mut session);
        assert_eq!(session.state().query(), "Heat");

        handle_open_command("0", &mut session);
        handle_open_command("x", &mut session);
        assert_eq!(session.state().query(), "Heat");
    }

    #[test]
    fn test_tone_ansi_uses_truecolor() {
        assert_eq!(tone_ansi(BadgeTone::Red), "\x1b[38;2;239;68;68m");
    }
}
