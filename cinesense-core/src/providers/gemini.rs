//! Google Gemini API provider implementation.
//!
//! Implements the `LlmProvider` trait against the native `generateContent`
//! endpoint with structured JSON output and optional Google Search grounding.
//!
//! Key details of the Gemini API:
//! - Auth via `?key=API_KEY` query parameter (not header-based)
//! - Structured output via `generationConfig.responseMimeType` + `responseSchema`
//! - Search grounding is a tool entry: `{"googleSearch": {}}`
//! - Citations arrive in `candidates[].groundingMetadata.groundingChunks`

use crate::brain::{ContentRequest, LlmProvider};
use crate::config::LlmConfig;
use crate::error::{AnalysisError, CineError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// The default Google Gemini API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiProvider {
    /// Create a new Gemini provider from configuration.
    ///
    /// Resolves the API key via [`LlmConfig::resolve_api_key`], so a missing key
    /// is reported as a configuration error before any request is made.
    pub fn new(config: &LlmConfig) -> Result<Self, CineError> {
        let api_key = config.resolve_api_key()?;
        Ok(Self::new_with_key(config, api_key)?)
    }

    /// Create a new Gemini provider with an explicitly provided API key.
    pub fn new_with_key(config: &LlmConfig, api_key: String) -> Result<Self, AnalysisError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Connection {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Build the JSON request body for the Gemini API.
    fn build_request_body(request: &ContentRequest) -> Value {
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": request.prompt}]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": Self::sanitize_schema(&request.response_schema),
            },
        });

        if let Some(temperature) = request.temperature {
            body["generationConfig"]["temperature"] = serde_json::json!(temperature);
        }

        if request.search_grounding {
            body["tools"] = serde_json::json!([{"googleSearch": {}}]);
        }

        body
    }

    /// Recursively strip JSON Schema fields that the Gemini API does not support.
    ///
    /// Gemini response schemas support: `type`, `description`, `properties`,
    /// `required`, `enum`, `items`, `format`, `nullable`.
    /// Everything else (e.g., `additionalProperties`, `default`, `$schema`) is removed.
    fn sanitize_schema(schema: &Value) -> Value {
        const ALLOWED_KEYS: &[&str] = &[
            "type",
            "description",
            "properties",
            "required",
            "enum",
            "items",
            "format",
            "nullable",
        ];

        match schema {
            Value::Object(map) => {
                let mut clean = serde_json::Map::new();
                for (key, value) in map {
                    if !ALLOWED_KEYS.contains(&key.as_str()) {
                        continue;
                    }
                    let cleaned_value = match key.as_str() {
                        "properties" => {
                            if let Value::Object(props) = value {
                                let cleaned_props: serde_json::Map<String, Value> = props
                                    .iter()
                                    .map(|(k, v)| (k.clone(), Self::sanitize_schema(v)))
                                    .collect();
                                Value::Object(cleaned_props)
                            } else {
                                value.clone()
                            }
                        }
                        "items" => Self::sanitize_schema(value),
                        _ => value.clone(),
                    };
                    clean.insert(key.clone(), cleaned_value);
                }
                Value::Object(clean)
            }
            other => other.clone(),
        }
    }

    /// Map an HTTP status code to the appropriate `AnalysisError`.
    fn map_http_error(status: reqwest::StatusCode, body_text: &str) -> AnalysisError {
        match status.as_u16() {
            401 | 403 => AnalysisError::AuthFailed {
                provider: "Gemini".to_string(),
            },
            429 => AnalysisError::RateLimited {
                retry_after_secs: 30,
            },
            _ => AnalysisError::ApiRequest {
                message: format!("HTTP {} from Gemini API: {}", status, body_text),
            },
        }
    }

    /// Map a transport-level `reqwest` failure.
    fn map_transport_error(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if err.is_connect() {
            AnalysisError::Connection {
                message: err.to_string(),
            }
        } else {
            AnalysisError::ApiRequest {
                message: format!("Request to Gemini API failed: {}", err),
            }
        }
    }

    /// Build the endpoint URL for a Gemini API call.
    fn endpoint_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.base_url, self.model, method, self.api_key
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate_content(&self, request: &ContentRequest) -> Result<Value, AnalysisError> {
        let body = Self::build_request_body(request);
        let url = self.endpoint_url("generateContent");

        debug!(
            model = self.model.as_str(),
            search_grounding = request.search_grounding,
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| AnalysisError::ResponseParse {
                message: format!("Failed to read response body: {}", e),
            })?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &body_text));
        }

        serde_json::from_str(&body_text).map_err(|e| AnalysisError::ResponseParse {
            message: format!("Invalid JSON in response: {}", e),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
