//! LLM provider implementations.
//!
//! Provides the Google Gemini implementation of the `LlmProvider` trait.
//! Use `create_provider()` to instantiate the provider named in config.

pub mod gemini;

use crate::brain::LlmProvider;
use crate::config::LlmConfig;
use crate::error::{AnalysisError, CineError};
use std::sync::Arc;

pub use gemini::GeminiProvider;

/// Create the LLM provider described by `config`.
///
/// Fails with a configuration error when the API key cannot be resolved, and
/// with `UnsupportedProvider` for any provider other than Gemini.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, CineError> {
    match config.provider.trim().to_lowercase().as_str() {
        "gemini" | "google" => {
            let provider = GeminiProvider::new(config)?;
            tracing::debug!(model = %config.model, "Created Gemini provider");
            Ok(Arc::new(provider))
        }
        other => Err(AnalysisError::UnsupportedProvider {
            provider: other.to_string(),
        }
        .into()),
    }
}
