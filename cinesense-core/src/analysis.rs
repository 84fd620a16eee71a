//! Analysis client: turns a movie title into a validated review.
//!
//! Builds the instruction and output schema, performs one round trip through
//! an [`LlmProvider`], and runs a validating parse over the model's JSON.
//! Grounding citations are extracted from the same response.

use crate::brain::{ContentRequest, LlmProvider};
use crate::config::LlmConfig;
use crate::error::{AnalysisError, CineError};
use crate::types::{Analysis, GroundingSource, Review, Sentiment};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Build the natural-language instruction for one title.
pub fn build_prompt(movie_title: &str) -> String {
    format!(
        "Analyze the movie \"{movie_title}\". Generate a balanced, original review based on general \
audience reception and critical tone.\n\
Include strengths, weaknesses, dominant emotions, overall sentiment, a natural review paragraph, \
and a predicted rating out of 5."
    )
}

/// The structured output schema declared to the model.
pub fn review_schema() -> Value {
    let labels: Vec<&str> = Sentiment::ALL.iter().map(|s| s.label()).collect();
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "movieName": { "type": "STRING" },
            "overallSentiment": {
                "type": "STRING",
                "description": format!("Must be one of: {}", labels.join(", "))
            },
            "emotions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Identify 3-5 dominant emotions like joy, nostalgia, etc."
            },
            "strengths": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List 3-4 key strengths"
            },
            "weaknesses": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List 3-4 key weaknesses"
            },
            "reviewText": {
                "type": "STRING",
                "description": "A natural, human-like review paragraph reflecting both positives and negatives"
            },
            "rating": {
                "type": "NUMBER",
                "description": "Predicted rating out of 5"
            },
            "releaseYear": { "type": "STRING" },
            "genre": { "type": "STRING" }
        },
        "required": [
            "movieName",
            "overallSentiment",
            "emotions",
            "strengths",
            "weaknesses",
            "reviewText",
            "rating"
        ]
    })
}

/// Client for the external analysis model.
#[derive(Clone)]
pub struct AnalysisClient {
    provider: Arc<dyn LlmProvider>,
    search_grounding: bool,
    temperature: Option<f32>,
}

impl AnalysisClient {
    /// Wrap a provider. Search grounding is on by default.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            search_grounding: true,
            temperature: None,
        }
    }

    /// Build a client backed by the provider named in `config`.
    pub fn from_config(config: &LlmConfig) -> Result<Self, CineError> {
        let provider = crate::providers::create_provider(config)?;
        Ok(Self::new(provider)
            .with_search_grounding(config.search_grounding)
            .with_temperature(config.temperature))
    }

    pub fn with_search_grounding(mut self, enabled: bool) -> Self {
        self.search_grounding = enabled;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model name reported by the underlying provider.
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// The request `analyze` sends for `movie_title`.
    pub fn build_request(&self, movie_title: &str) -> ContentRequest {
        ContentRequest {
            prompt: build_prompt(movie_title),
            response_schema: review_schema(),
            search_grounding: self.search_grounding,
            temperature: self.temperature,
        }
    }

    /// Analyze one movie title.
    ///
    /// Performs exactly one provider call for a non-blank title and none for a
    /// blank one. Identical titles are never cached.
    pub async fn analyze(&self, movie_title: &str) -> Result<Analysis, AnalysisError> {
        let title = movie_title.trim();
        if title.is_empty() {
            return Err(AnalysisError::InvalidField {
                field: "movieName".into(),
                reason: "title is empty".into(),
            });
        }

        info!(title, model = self.model_name(), "Analyzing movie");
        let body = self.provider.generate_content(&self.build_request(title)).await?;
        let analysis = parse_generate_response(&body)?;
        debug!(
            title = analysis.review.title.as_str(),
            sentiment = %analysis.review.sentiment,
            sources = analysis.sources.len(),
            "Analysis complete"
        );
        Ok(analysis)
    }
}

/// Parse a full `generateContent` response body into an [`Analysis`].
pub fn parse_generate_response(body: &Value) -> Result<Analysis, AnalysisError> {
    let text = extract_candidate_text(body)?;
    let review = parse_review(&text)?;
    let sources = extract_grounding_sources(body);
    Ok(Analysis { review, sources })
}

/// Concatenate the text parts of the first candidate.
///
/// Thought parts are skipped. An absent or blank text is an `EmptyPayload`.
fn extract_candidate_text(body: &Value) -> Result<String, AnalysisError> {
    let candidates = match body["candidates"].as_array() {
        Some(c) if !c.is_empty() => c,
        _ => {
            if let Some(reason) = body["promptFeedback"]["blockReason"].as_str() {
                return Err(AnalysisError::ApiRequest {
                    message: format!("Prompt blocked by provider: {}", reason),
                });
            }
            return Err(AnalysisError::ResponseParse {
                message: "Missing 'candidates' array in response".to_string(),
            });
        }
    };

    let text: String = candidates[0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter(|p| !p["thought"].as_bool().unwrap_or(false))
                .filter_map(|p| p["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyPayload);
    }
    Ok(trimmed.to_string())
}

/// Remove a surrounding Markdown code fence (```json ... ```), if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop the info string ("json"), on its own line or glued to the body.
    let body = match rest.find('\n') {
        Some(pos) if !rest[..pos].contains('{') => &rest[pos + 1..],
        _ => rest
            .trim_start()
            .trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim()
}

/// Wire shape of the model's JSON. Every field is optional here so that a
/// missing field is reported by name rather than as a generic serde error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewPayload {
    movie_name: Option<String>,
    overall_sentiment: Option<String>,
    emotions: Option<Vec<String>>,
    strengths: Option<Vec<String>>,
    weaknesses: Option<Vec<String>>,
    review_text: Option<String>,
    rating: Option<Value>,
    release_year: Option<Value>,
    genre: Option<Value>,
}

/// Parse and validate the model's JSON text into a [`Review`].
pub fn parse_review(text: &str) -> Result<Review, AnalysisError> {
    let json = strip_code_fence(text);
    if json.is_empty() {
        return Err(AnalysisError::EmptyPayload);
    }

    let value: Value = serde_json::from_str(json).map_err(|e| AnalysisError::ResponseParse {
        message: format!("Model output is not valid JSON: {}", e),
    })?;
    // Serde would otherwise map a JSON array onto the struct by position.
    if !value.is_object() {
        return Err(AnalysisError::ResponseParse {
            message: "Model output is not a JSON object".into(),
        });
    }
    let payload: ReviewPayload =
        serde_json::from_value(value).map_err(|e| AnalysisError::ResponseParse {
            message: format!("Model output does not match the review schema: {}", e),
        })?;

    let title = required_text(payload.movie_name, "movieName")?;
    let sentiment_label = required(payload.overall_sentiment, "overallSentiment")?;
    let sentiment: Sentiment =
        sentiment_label
            .parse()
            .map_err(|e: crate::types::UnknownSentiment| AnalysisError::InvalidField {
                field: "overallSentiment".into(),
                reason: e.to_string(),
            })?;

    Ok(Review {
        title,
        sentiment,
        emotions: clean_list(required(payload.emotions, "emotions")?),
        strengths: clean_list(required(payload.strengths, "strengths")?),
        weaknesses: clean_list(required(payload.weaknesses, "weaknesses")?),
        narrative: required_text(payload.review_text, "reviewText")?,
        rating: parse_rating(required(payload.rating, "rating")?)?,
        release_year: payload.release_year.and_then(optional_text),
        genre: payload.genre.and_then(optional_text),
    })
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AnalysisError> {
    value.ok_or_else(|| AnalysisError::ResponseParse {
        message: format!("Missing required field '{}'", field),
    })
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AnalysisError> {
    let text = required(value, field)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidField {
            field: field.into(),
            reason: "must not be blank".into(),
        });
    }
    Ok(trimmed.to_string())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Accept a JSON number or a numeric string. The 0-5 range is not enforced.
fn parse_rating(value: Value) -> Result<f64, AnalysisError> {
    let rating = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match rating {
        Some(r) if r.is_finite() => Ok(r),
        _ => Err(AnalysisError::InvalidField {
            field: "rating".into(),
            reason: format!("expected a number, got {}", value),
        }),
    }
}

fn optional_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract web citations from `candidates[0].groundingMetadata.groundingChunks`.
///
/// Chunks without a `web` reference or a `uri` are skipped; a missing title
/// falls back to the URI. Absent metadata yields an empty list.
pub fn extract_grounding_sources(body: &Value) -> Vec<GroundingSource> {
    let Some(chunks) = body["candidates"][0]["groundingMetadata"]["groundingChunks"].as_array()
    else {
        return Vec::new();
    };

    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.get("web")?;
            let uri = web["uri"].as_str().map(str::trim).filter(|u| !u.is_empty())?;
            let title = web["title"]
                .as_str()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(uri);
            Some(GroundingSource {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::MockLlmProvider;
    use pretty_assertions::assert_eq;

    fn interstellar_payload() -> Value {
        serde_json::json!({
            "movieName": "Interstellar",
            "overallSentiment": "Positive",
            "emotions": ["wonder", "awe"],
            "strengths": ["visuals", "score"],
            "weaknesses": ["pacing"],
            "reviewText": "...",
            "rating": 4.2,
            "releaseYear": "2014",
            "genre": "Sci-Fi"
        })
    }

    fn client_with(mock: Arc<MockLlmProvider>) -> AnalysisClient {
        AnalysisClient::new(mock)
    }

    #[test]
    fn test_prompt_mentions_title_and_sections() {
        let prompt = build_prompt("Heat");
        assert!(prompt.starts_with("Analyze the movie \"Heat\"."));
        assert!(prompt.contains("strengths, weaknesses, dominant emotions"));
        assert!(prompt.contains("predicted rating out of 5"));
    }

    #[test]
    fn test_schema_required_fields() {
        let schema = review_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec![
                "movieName",
                "overallSentiment",
                "emotions",
                "strengths",
                "weaknesses",
                "reviewText",
                "rating"
            ]
        );
        assert!(schema["properties"]["releaseYear"].is_object());
        assert!(schema["properties"]["genre"].is_object());
        assert_eq!(
            schema["properties"]["overallSentiment"]["description"],
            "Must be one of: Very Positive, Positive, Mixed, Negative, Very Negative"
        );
    }

    #[test]
    fn test_parse_review_full() {
        let review = parse_review(&interstellar_payload().to_string()).unwrap();
        assert_eq!(review.title, "Interstellar");
        assert_eq!(review.sentiment, Sentiment::Positive);
        assert_eq!(review.emotions, vec!["wonder", "awe"]);
        assert_eq!(review.weaknesses, vec!["pacing"]);
        assert_eq!(review.rating, 4.2);
        assert_eq!(review.release_year.as_deref(), Some("2014"));
        assert_eq!(review.genre.as_deref(), Some("Sci-Fi"));
    }

    #[test]
    fn test_parse_review_optional_fields_absent() {
        let mut payload = interstellar_payload();
        payload.as_object_mut().unwrap().remove("releaseYear");
        payload.as_object_mut().unwrap().remove("genre");
        let review = parse_review(&payload.to_string()).unwrap();
        assert_eq!(review.release_year, None);
        assert_eq!(review.genre, None);
    }

    #[test]
    fn test_parse_review_numeric_year_and_string_rating() {
        let mut payload = interstellar_payload();
        payload["releaseYear"] = serde_json::json!(2014);
        payload["rating"] = serde_json::json!("3.5");
        let review = parse_review(&payload.to_string()).unwrap();
        assert_eq!(review.release_year.as_deref(), Some("2014"));
        assert_eq!(review.rating, 3.5);
    }

    #[test]
    fn test_parse_review_rating_not_range_checked() {
        let mut payload = interstellar_payload();
        payload["rating"] = serde_json::json!(7.5);
        assert_eq!(parse_review(&payload.to_string()).unwrap().rating, 7.5);
    }

    #[test]
    fn test_parse_review_missing_required_field() {
        for field in [
            "movieName",
            "overallSentiment",
            "emotions",
            "strengths",
            "weaknesses",
            "reviewText",
            "rating",
        ] {
            let mut payload = interstellar_payload();
            payload.as_object_mut().unwrap().remove(field);
            match parse_review(&payload.to_string()) {
                Err(AnalysisError::ResponseParse { message }) => {
                    assert!(message.contains(field), "{message}")
                }
                other => panic!("Expected ResponseParse for {field}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_review_wrong_type() {
        let mut payload = interstellar_payload();
        payload["emotions"] = serde_json::json!("wonder");
        assert!(matches!(
            parse_review(&payload.to_string()),
            Err(AnalysisError::ResponseParse { .. })
        ));
    }

    #[test]
    fn test_parse_review_rejects_positional_array() {
        let array = serde_json::json!([
            "Interstellar",
            "Positive",
            ["wonder"],
            ["visuals"],
            ["pacing"],
            "txt",
            4.2,
            "2014",
            "Sci-Fi"
        ]);
        assert!(matches!(
            parse_review(&array.to_string()),
            Err(AnalysisError::ResponseParse { .. })
        ));
        assert!(matches!(
            parse_review("\"Interstellar\""),
            Err(AnalysisError::ResponseParse { .. })
        ));
    }

    #[test]
    fn test_parse_review_unknown_sentiment() {
        let mut payload = interstellar_payload();
        payload["overallSentiment"] = serde_json::json!("Ecstatic");
        match parse_review(&payload.to_string()) {
            Err(AnalysisError::InvalidField { field, .. }) => {
                assert_eq!(field, "overallSentiment")
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_review_blank_title() {
        let mut payload = interstellar_payload();
        payload["movieName"] = serde_json::json!("   ");
        assert!(matches!(
            parse_review(&payload.to_string()),
            Err(AnalysisError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_parse_review_non_numeric_rating() {
        let mut payload = interstellar_payload();
        payload["rating"] = serde_json::json!("four");
        assert!(matches!(
            parse_review(&payload.to_string()),
            Err(AnalysisError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_parse_review_malformed_json() {
        assert!(matches!(
            parse_review("{\"movieName\": "),
            Err(AnalysisError::ResponseParse { .. })
        ));
    }

    #[test]
    fn test_parse_review_empty_object_is_error() {
        assert!(parse_review("{}").is_err());
    }

    #[test]
    fn test_parse_review_code_fenced() {
        let fenced = format!("```json\n{}\n```", interstellar_payload());
        assert_eq!(parse_review(&fenced).unwrap().title, "Interstellar");

        let inline = format!("```json{}```", interstellar_payload());
        assert_eq!(parse_review(&inline).unwrap().title, "Interstellar");
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json {\"a\":1} ```"), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_empty_payload() {
        let body = MockLlmProvider::text_response("   ", &[]);
        assert_eq!(
            extract_candidate_text(&body).unwrap_err(),
            AnalysisError::EmptyPayload
        );
    }

    #[test]
    fn test_extract_text_no_parts() {
        let body = serde_json::json!({"candidates": [{"content": {"parts": []}}]});
        assert_eq!(
            extract_candidate_text(&body).unwrap_err(),
            AnalysisError::EmptyPayload
        );
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        let body = serde_json::json!({"usageMetadata": {}});
        assert!(matches!(
            extract_candidate_text(&body),
            Err(AnalysisError::ResponseParse { .. })
        ));
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let body = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        match extract_candidate_text(&body) {
            Err(AnalysisError::ApiRequest { message }) => assert!(message.contains("SAFETY")),
            other => panic!("Expected ApiRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_text_joins_parts_and_skips_thoughts() {
        let body = serde_json::json!({"candidates": [{"content": {"parts": [
            {"text": "thinking about it", "thought": true},
            {"text": "{\"a\":"},
            {"text": "1}"}
        ]}}]});
        assert_eq!(extract_candidate_text(&body).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_grounding_sources() {
        let body = serde_json::json!({"candidates": [{
            "content": {"parts": [{"text": "{}"}]},
            "groundingMetadata": {"groundingChunks": [
                {"web": {"uri": "https://a.example", "title": "A"}},
                {"retrievedContext": {"uri": "gs://bucket/doc"}},
                {"web": {"title": "No uri"}},
                {"web": {"uri": "https://b.example"}}
            ]}
        }]});
        let sources = extract_grounding_sources(&body);
        assert_eq!(
            sources,
            vec![
                GroundingSource {
                    title: "A".into(),
                    uri: "https://a.example".into()
                },
                GroundingSource {
                    title: "https://b.example".into(),
                    uri: "https://b.example".into()
                },
            ]
        );
    }

    #[test]
    fn test_extract_grounding_sources_absent() {
        let body = serde_json::json!({"candidates": [{"content": {"parts": []}}]});
        assert!(extract_grounding_sources(&body).is_empty());
        assert!(extract_grounding_sources(&serde_json::json!({})).is_empty());
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_response(MockLlmProvider::json_response(
            &interstellar_payload(),
            &[
                ("IMDb", "https://imdb.com/title/tt0816692"),
                ("Wikipedia", "https://en.wikipedia.org/wiki/Interstellar_(film)"),
            ],
        ));
        let client = client_with(mock.clone());

        let analysis = client.analyze("Interstellar").await.unwrap();
        assert_eq!(analysis.review.title, "Interstellar");
        assert_eq!(analysis.sources.len(), 2);
        assert_eq!(analysis.sources[0].title, "IMDb");
        assert_eq!(mock.call_count(), 1);

        let request = &mock.requests()[0];
        assert!(request.prompt.contains("\"Interstellar\""));
        assert!(request.search_grounding);
        assert_eq!(request.response_schema, review_schema());
    }

    #[tokio::test]
    async fn test_analyze_blank_title_skips_provider() {
        let mock = Arc::new(MockLlmProvider::new());
        let client = client_with(mock.clone());
        assert!(client.analyze("   ").await.is_err());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_trims_title() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_response(MockLlmProvider::json_response(&interstellar_payload(), &[]));
        let client = client_with(mock.clone());
        client.analyze("  Interstellar \n").await.unwrap();
        assert!(mock.requests()[0].prompt.contains("\"Interstellar\"."));
    }

    #[tokio::test]
    async fn test_analyze_empty_payload_is_error() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_response(MockLlmProvider::text_response("", &[]));
        let client = client_with(mock);
        assert_eq!(
            client.analyze("Interstellar").await.unwrap_err(),
            AnalysisError::EmptyPayload
        );
    }

    #[tokio::test]
    async fn test_analyze_propagates_transport_error() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_error(AnalysisError::Connection {
            message: "reset by peer".into(),
        });
        let client = client_with(mock);
        assert!(matches!(
            client.analyze("Interstellar").await,
            Err(AnalysisError::Connection { .. })
        ));
    }

    #[tokio::test]
    async fn test_analyze_same_title_twice_calls_twice() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_response(MockLlmProvider::json_response(&interstellar_payload(), &[]));
        mock.queue_response(MockLlmProvider::json_response(&interstellar_payload(), &[]));
        let client = client_with(mock.clone());
        client.analyze("Interstellar").await.unwrap();
        client.analyze("Interstellar").await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_builder_options_reach_request() {
        let mock = Arc::new(MockLlmProvider::new());
        let client = client_with(mock)
            .with_search_grounding(false)
            .with_temperature(Some(0.3));
        let request = client.build_request("Heat");
        assert!(!request.search_grounding);
        assert_eq!(request.temperature, Some(0.3));
    }
}
