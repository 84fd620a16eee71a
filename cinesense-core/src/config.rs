//! Configuration system for CineSense.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/cinesense/config.toml` and/or `.cinesense/config.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CineError, ConfigError};

/// Default Gemini model used for analysis.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Default environment variable holding the Gemini API key.
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Top-level configuration for CineSense.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CineConfig {
    pub llm: LlmConfig,
    pub ui: UiConfig,
}

/// Configuration for the generative model behind the analysis client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name. Only "gemini" is supported.
    pub provider: String,
    /// Model identifier (e.g., "gemini-3-pro-preview", "gemini-2.5-flash").
    pub model: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// API key given directly in config. Takes precedence over `api_key_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Optional base URL override for the API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sampling temperature. `None` leaves the provider default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whether the model may ground its answer with web search.
    pub search_grounding: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            base_url: None,
            temperature: None,
            timeout_secs: 120,
            connect_timeout_secs: 10,
            search_grounding: true,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: an explicit `api_key` wins, then the environment
    /// variable named by `api_key_env`. Blank values count as missing.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarMissing {
                var: self.api_key_env.clone(),
            })
    }
}

/// Terminal UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color theme name ("dark" or "light").
    pub theme: String,
    /// Whether to use the TUI (false = line-based REPL).
    pub use_tui: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            use_tui: true,
        }
    }
}

/// Path to the user-level config file, if a home directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "cinesense", "cinesense")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path to the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".cinesense").join("config.toml")
}

/// Load configuration from all sources, merging in order of precedence:
///
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `CINESENSE_`)
/// 3. Workspace-local config (`.cinesense/config.toml`)
/// 4. User config (`~/.config/cinesense/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&CineConfig>,
) -> Result<CineConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(CineConfig::default()));

    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // CINESENSE_LLM__MODEL, CINESENSE_UI__THEME, etc.
    figment = figment.merge(Env::prefixed("CINESENSE_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: CineConfig = figment.extract()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &CineConfig) -> Result<(), ConfigError> {
    if config.llm.model.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: "llm.model".into(),
        });
    }
    if config.llm.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "llm.timeout_secs must be greater than zero".into(),
        });
    }
    Ok(())
}

/// Write the default configuration to `path`, creating parent directories.
///
/// Refuses to overwrite an existing file.
pub fn write_default_config(path: &Path) -> Result<(), CineError> {
    if path.exists() {
        return Err(ConfigError::Invalid {
            message: format!("{} already exists", path.display()),
        }
        .into());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str =
        toml::to_string_pretty(&CineConfig::default()).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
