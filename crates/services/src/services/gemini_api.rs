//! Gemini `generateContent` client used for sneaker lookups.
//!
//! Two transports hit the same backend: the header-authenticated `v1beta` path,
//! raced against a timer, and the key-in-query `v1` REST path as a single fallback.
//! No retries beyond that; callers substitute mock data when both fail.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::config::{DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL, GeminiConfig};

const TEMPERATURE: f64 = 0.2;
const TOP_K: u32 = 32;
const TOP_P: f64 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 4096;

#[derive(Debug, Clone, Error)]
pub enum GeminiApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("json error: {0}")]
    Serde(String),
    #[error("response has no candidate text")]
    MalformedEnvelope,
    #[error("missing api key: GOOGLE_GEMINI_KEY environment variable not set")]
    MissingApiKey,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn new(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Anything that can answer a sneaker prompt with raw text.
#[async_trait]
pub trait SneakerModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiApiError>;
}

#[derive(Debug)]
pub struct GeminiApiClient {
    http: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiApiClient {
    /// Transport cap for primary calls left running after the race is lost.
    const ABANDONED_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn from_config(config: GeminiConfig) -> Result<Self, GeminiApiError> {
        let api_key = config.api_key.ok_or(GeminiApiError::MissingApiKey)?;
        Ok(Self::new(api_key, Some(config.model))?
            .with_base_url(config.base_url)
            .with_timeout(config.timeout))
    }

    pub fn new(api_key: SecretString, model: Option<String>) -> Result<Self, GeminiApiError> {
        let http = Client::builder()
            .timeout(Self::ABANDONED_REQUEST_TIMEOUT)
            .user_agent(concat!("sneaker-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeminiApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(super::config::DEFAULT_GEMINI_TIMEOUT_SECS),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Primary transport, then the REST fallback once. Returns the raw candidate text.
    pub async fn fetch_model_response(&self, prompt: &str) -> Result<String, GeminiApiError> {
        match self.generate_via_sdk(prompt).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, model = %self.model, "primary Gemini call failed, trying REST endpoint");
                self.generate_via_rest(prompt).await
            }
        }
    }

    /// The call runs on its own task. When the timer wins the task is left to finish
    /// in the background and its result is dropped.
    pub async fn generate_via_sdk(&self, prompt: &str) -> Result<String, GeminiApiError> {
        let request = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&GenerateContentRequest::new(prompt));

        let call = tokio::spawn(send_request(request));

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(GeminiApiError::Transport(join_error.to_string())),
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs_f64(), "Gemini call timed out, abandoning it");
                Err(GeminiApiError::Timeout)
            }
        }
    }

    pub async fn generate_via_rest(&self, prompt: &str) -> Result<String, GeminiApiError> {
        let request = self
            .http
            .post(format!("{}/v1/models/{}:generateContent", self.base_url, self.model))
            .query(&[("key", self.api_key.expose_secret())])
            .timeout(self.timeout)
            .json(&GenerateContentRequest::new(prompt));

        send_request(request).await
    }
}

#[async_trait]
impl SneakerModel for GeminiApiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiApiError> {
        self.fetch_model_response(prompt).await
    }
}

async fn send_request(request: RequestBuilder) -> Result<String, GeminiApiError> {
    let res = request.send().await.map_err(map_reqwest_error)?;

    match res.status() {
        s if s.is_success() => {
            let envelope = res
                .json::<GenerateContentResponse>()
                .await
                .map_err(|e| GeminiApiError::Serde(e.to_string()))?;
            let text = envelope.into_text().ok_or(GeminiApiError::MalformedEnvelope)?;
            debug!(response_len = text.len(), "received Gemini response");
            Ok(text)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GeminiApiError::InvalidApiKey),
        StatusCode::TOO_MANY_REQUESTS => Err(GeminiApiError::RateLimited),
        s => {
            let status = s.as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(GeminiApiError::Http { status, body })
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> GeminiApiError {
    if e.is_timeout() {
        GeminiApiError::Timeout
    } else {
        GeminiApiError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path, query_param},
    };

    use super::*;

    const PRIMARY: &str = "/v1beta/models/gemini-1.5-pro:generateContent";
    const SECONDARY: &str = "/v1/models/gemini-1.5-pro:generateContent";

    fn answer(text: &str) -> serde_json::Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    fn client(server: &MockServer) -> GeminiApiClient {
        GeminiApiClient::new(SecretString::from("test-key".to_string()), None)
            .unwrap()
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(300))
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::new("hi")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": "hi" }] }],
                "generationConfig": {
                    "temperature": 0.2,
                    "topK": 32,
                    "topP": 0.95,
                    "maxOutputTokens": 4096
                }
            })
        );
    }

    #[test]
    fn test_envelope_without_text_is_none() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_text().is_none());
        let no_parts: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "content": { "parts": [] } }] })).unwrap();
        assert!(no_parts.into_text().is_none());
    }

    #[tokio::test]
    async fn test_primary_path_sends_header_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PRIMARY))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({ "generationConfig": { "topK": 32 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("👟 Shoe Name & Brand")))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server).fetch_model_response("prompt").await.unwrap();
        assert_eq!(text, "👟 Shoe Name & Brand");
    }

    #[tokio::test]
    async fn test_falls_back_to_rest_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PRIMARY))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SECONDARY))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("from rest")))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server).fetch_model_response("prompt").await.unwrap();
        assert_eq!(text, "from rest");
    }

    #[tokio::test]
    async fn test_both_paths_failing_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PRIMARY))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SECONDARY))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).fetch_model_response("prompt").await.unwrap_err();
        assert!(matches!(err, GeminiApiError::RateLimited));
    }

    #[tokio::test]
    async fn test_missing_text_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = client(&server).fetch_model_response("prompt").await.unwrap_err();
        assert!(matches!(err, GeminiApiError::MalformedEnvelope));
    }

    #[tokio::test]
    async fn test_slow_primary_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PRIMARY))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(answer("late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SECONDARY))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("on time")))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.generate_via_sdk("prompt").await.unwrap_err();
        assert!(matches!(err, GeminiApiError::Timeout));

        let text = client.fetch_model_response("prompt").await.unwrap();
        assert_eq!(text, "on time");
    }

    #[tokio::test]
    async fn test_slow_rest_path_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let err = client(&server).generate_via_rest("prompt").await.unwrap_err();
        assert!(matches!(err, GeminiApiError::Timeout));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = GeminiConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            GeminiApiClient::from_config(config),
            Err(GeminiApiError::MissingApiKey)
        ));
    }
}
