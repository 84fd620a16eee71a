//! CineSense CLI: terminal interface for the CineSense movie sentiment analyzer.
//!
//! Provides single-title, interactive REPL, and full-screen TUI modes.

mod commands;
mod repl;
mod tui;

use clap::Parser;
use cinesense_core::AnalysisClient;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// CineSense: sentiment analysis for any movie, grounded in web search
#[derive(Parser, Debug)]
#[command(name = "cinesense", version, about, long_about = None)]
struct Cli {
    /// Movie title to analyze (starts interactive mode if omitted)
    title: Option<String>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Disable TUI, use simple REPL
    #[arg(long)]
    no_tui: bool,

    /// Print the analysis as JSON (single-title mode)
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show current configuration
    Show,
}

/// Filter directives for the stderr layer.
///
/// Nothing reaches stderr while the TUI owns the screen. Analysis failure
/// causes stay in the log file unless `-v` is given.
fn stderr_filter(verbose: u8, quiet: bool, tui_active: bool) -> String {
    let level = match verbose {
        _ if tui_active => return "off".to_string(),
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    if verbose == 0 {
        format!("{},cinesense_core::session=off", level)
    } else {
        level.to_string()
    }
}

/// Set up tracing: human-readable stderr + JSON file logging.
fn init_tracing(
    verbose: u8,
    quiet: bool,
    tui_active: bool,
) -> tracing_appender::non_blocking::WorkerGuard {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(stderr_filter(verbose, quiet, tui_active)));

    let log_dir = directories::ProjectDirs::from("dev", "cinesense", "cinesense")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "cinesense.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    // Handle subcommands
    if let Some(command) = cli.command {
        let _guard = init_tracing(cli.verbose, cli.quiet, false);
        commands::handle_command(command, &workspace)?;
        return Ok(ExitCode::SUCCESS);
    }

    // Load configuration, applying CLI overrides on top of every other layer
    let mut config = cinesense_core::config::load_config(Some(&workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }

    let use_tui = cli.title.is_none() && !cli.no_tui && config.ui.use_tui;
    let _guard = init_tracing(cli.verbose, cli.quiet, use_tui);

    // The API key is resolved here so a missing key fails before any UI starts
    let client = AnalysisClient::from_config(&config.llm)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    tracing::debug!(
        model = %config.llm.model,
        workspace = %workspace.display(),
        "CineSense starting"
    );

    if let Some(title) = cli.title {
        repl::run_single(&title, client, cli.json).await
    } else if use_tui {
        tui::run(client, &config).await?;
        Ok(ExitCode::SUCCESS)
    } else {
        repl::run_interactive(client, cli.quiet).await?;
        Ok(ExitCode::SUCCESS)
    }
}
