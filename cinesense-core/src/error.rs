//! Error types for the CineSense core library.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering the analysis round trip and configuration.

/// Top-level error type for the CineSense core library.
#[derive(Debug, thiserror::Error)]
pub enum CineError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from one analysis round trip: transport, remote service, or payload.
///
/// Callers that present results to a user treat every variant the same way;
/// the variants exist for logs and tests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Model returned an empty payload")]
    EmptyPayload,

    #[error("Invalid field '{field}' in model output: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },

    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Environment variable not set: {var}")]
    EnvVarMissing { var: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::ParseError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_analysis() {
        let err = CineError::Analysis(AnalysisError::ApiRequest {
            message: "connection refused".into(),
        });
        assert_eq!(
            err.to_string(),
            "Analysis error: API request failed: connection refused"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = CineError::Config(ConfigError::EnvVarMissing {
            var: "API_KEY".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Environment variable not set: API_KEY"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CineError = io_err.into();
        assert!(matches!(err, CineError::Io(_)));
    }

    #[test]
    fn test_analysis_error_variants() {
        assert_eq!(
            AnalysisError::EmptyPayload.to_string(),
            "Model returned an empty payload"
        );

        let err = AnalysisError::InvalidField {
            field: "overallSentiment".into(),
            reason: "unrecognized label 'Ecstatic'".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid field 'overallSentiment' in model output: unrecognized label 'Ecstatic'"
        );

        let err = AnalysisError::RateLimited {
            retry_after_secs: 30,
        };
        assert_eq!(err.to_string(), "Rate limited by provider, retry after 30s");
    }
}
