//! CLI subcommand handlers.

use crate::{Commands, ConfigAction};
use cinesense_core::config::{self, CineConfig};
use std::path::Path;

pub fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => handle_config(action, workspace),
    }
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = config::workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            config::write_default_config(&config_path)
                .map_err(|e| anyhow::anyhow!("Failed to write config: {}", e))?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            let key_env = CineConfig::default().llm.api_key_env;
            println!("Set {} in your environment or .env file to your Gemini API key.", key_env);
            Ok(())
        }
        ConfigAction::Show => {
            let config = config::load_config(Some(workspace), None)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            println!("{}", render_config(&config)?);
            Ok(())
        }
    }
}

/// Render the effective configuration as TOML with any inline API key masked.
fn render_config(config: &CineConfig) -> anyhow::Result<String> {
    let mut shown = config.clone();
    if shown.llm.api_key.is_some() {
        shown.llm.api_key = Some("********".to_string());
    }
    Ok(toml::to_string_pretty(&shown)?)
}
