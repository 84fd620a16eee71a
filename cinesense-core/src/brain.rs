//! Brain module: the remote-model boundary.
//!
//! Defines the `LlmProvider` trait the analysis client talks through, the
//! request it sends, and a queue-driven `MockLlmProvider` for tests.

use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One structured-output generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRequest {
    /// Natural-language instruction for the model.
    pub prompt: String,
    /// JSON schema the response text must conform to.
    pub response_schema: Value,
    /// Let the model ground its answer with web search.
    pub search_grounding: bool,
    /// Sampling temperature; `None` uses the provider default.
    pub temperature: Option<f32>,
}

/// Trait for generative-model providers.
///
/// Implementations perform exactly one round trip per call and return the
/// provider's raw response body. Interpreting that body is the caller's job.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the request and return the parsed JSON response body.
    async fn generate_content(&self, request: &ContentRequest) -> Result<Value, AnalysisError>;

    /// Return the model name.
    fn model_name(&self) -> &str;
}

/// A mock provider that replays queued responses in order.
///
/// When the queue is empty, `generate_content` fails with `ApiRequest`.
pub struct MockLlmProvider {
    model: String,
    responses: Mutex<VecDeque<Result<Value, AnalysisError>>>,
    requests: Mutex<Vec<ContentRequest>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a raw response body to be returned by the next call.
    pub fn queue_response(&self, response: Value) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error to be returned by the next call.
    pub fn queue_error(&self, error: AnalysisError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> Vec<ContentRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a Gemini-shaped response body whose single text part is `text`,
    /// with one grounding chunk per `(title, uri)` pair.
    pub fn text_response(text: &str, sources: &[(&str, &str)]) -> Value {
        let chunks: Vec<Value> = sources
            .iter()
            .map(|(title, uri)| serde_json::json!({"web": {"uri": uri, "title": title}}))
            .collect();
        serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": text}]
                },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": chunks
                }
            }],
            "modelVersion": "mock-model"
        })
    }

    /// Build a response body carrying `payload` serialized as the text part.
    pub fn json_response(payload: &Value, sources: &[(&str, &str)]) -> Value {
        Self::text_response(&payload.to_string(), sources)
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn generate_content(&self, request: &ContentRequest) -> Result<Value, AnalysisError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AnalysisError::ApiRequest {
                    message: "mock provider has no queued responses".to_string(),
                })
            })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
