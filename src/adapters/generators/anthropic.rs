//! Anthropic Messages API text generator.
//!
//! Makes direct HTTP calls to `/v1/messages`. Requests are rate limited with
//! a token bucket and transient failures (429, 5xx, 529, network errors and
//! timeouts) are retried with exponential backoff up to `max_retries` times.

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoffBuilder;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::models::GeneratorConfig;
use crate::domain::ports::{GenerationPurpose, GenerationRequest, GeneratorError, TextGenerator};

const API_VERSION: &str = "2023-06-01";
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Text generator backed by the Anthropic Messages API.
pub struct AnthropicGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_retries: u32,
    initial_backoff: Duration,
    limiter: DirectRateLimiter,
}

impl AnthropicGenerator {
    /// Build from configuration; the key falls back to `ANTHROPIC_API_KEY`.
    pub fn new(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GeneratorError::NotConfigured(
                    "no API key: set generator.api_key or ANTHROPIC_API_KEY".to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| GeneratorError::NotConfigured(format!("failed to build HTTP client: {e}")))?;

        let rps = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_retries: config.max_retries,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            limiter: RateLimiter::direct(Quota::per_second(rps)),
        })
    }

    /// Override the first retry delay.
    pub fn with_initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    async fn send_once(&self, body: &MessagesRequest<'_>) -> Result<String, GeneratorError> {
        self.limiter.until_ready().await;

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else {
                    GeneratorError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(classify_status(status, message));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;
        extract_text(parsed)
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    #[instrument(skip_all, fields(model = %self.model, purpose = ?request.purpose))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: system_prompt(request.purpose),
            messages: vec![RequestMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let mut policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_backoff)
            .with_max_interval(MAX_BACKOFF)
            .with_max_elapsed_time(None)
            .build();
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(&body).await {
                Ok(text) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "generation succeeded after retries");
                    }
                    return Ok(text);
                }
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let delay = policy.next_backoff().unwrap_or(MAX_BACKOFF);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient generation error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn system_prompt(purpose: GenerationPurpose) -> &'static str {
    match purpose {
        GenerationPurpose::Plan => {
            "You decompose research goals into short questions. Reply with one question per line and nothing else."
        }
        GenerationPurpose::Draft => {
            "You write concise answers grounded only in the supplied evidence and cite it as [n]."
        }
    }
}

fn classify_status(status: StatusCode, message: String) -> GeneratorError {
    match status.as_u16() {
        401 | 403 => GeneratorError::AuthError(message),
        429 => GeneratorError::RateLimited(message),
        code => GeneratorError::ApiError {
            status: code,
            message,
        },
    }
}

fn extract_text(response: MessagesResponse) -> Result<String, GeneratorError> {
    let text: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect();
    if text.is_empty() {
        return Err(GeneratorError::InvalidResponse(
            "response contained no text blocks".to_string(),
        ));
    }
    Ok(text.join(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn config(base_url: String, max_retries: u32) -> GeneratorConfig {
        GeneratorConfig {
            provider: "anthropic".to_string(),
            api_key: Some("test-api-key".to_string()),
            base_url,
            max_retries,
            requests_per_second: 100,
            timeout_secs: 5,
            ..GeneratorConfig::default()
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            purpose: GenerationPurpose::Draft,
            subject: "what is tokio".to_string(),
            prompt: "Answer: what is tokio".to_string(),
            context: vec!["a runtime".to_string()],
            max_tokens: 64,
        }
    }

    fn success_body() -> String {
        serde_json::json!({
            "id": "msg_01ABC123",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Tokio is "},
                {"type": "text", "text": "an async runtime [1]"}
            ],
            "model": "claude-sonnet-4-5",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 6}
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_success_with_mock() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-api-key")
            .match_header("anthropic-version", "2023-06-01")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(success_body())
            .create_async()
            .await;

        let generator = AnthropicGenerator::new(&config(server.url(), 0)).unwrap();
        let text = generator.generate(&request()).await.unwrap();

        assert_eq!(text, "Tokio is an async runtime [1]");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_error_is_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body(r#"{"error":{"type":"authentication_error"}}"#)
            .expect(1)
            .create_async()
            .await;

        let generator = AnthropicGenerator::new(&config(server.url(), 3))
            .unwrap()
            .with_initial_backoff(Duration::from_millis(5));
        let err = generator.generate(&request()).await.unwrap_err();

        assert!(matches!(err, GeneratorError::AuthError(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_overloaded_is_retried_until_exhausted() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body("overloaded")
            .expect(3)
            .create_async()
            .await;

        let generator = AnthropicGenerator::new(&config(server.url(), 2))
            .unwrap()
            .with_initial_backoff(Duration::from_millis(5));
        let err = generator.generate(&request()).await.unwrap_err();

        assert!(matches!(err, GeneratorError::ApiError { status: 529, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_response_without_text_is_invalid() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content": []}"#)
            .create_async()
            .await;

        let generator = AnthropicGenerator::new(&config(server.url(), 0)).unwrap();
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidResponse(_)));
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        temp_env::with_var_unset("ANTHROPIC_API_KEY", || {
            let cfg = GeneratorConfig {
                api_key: None,
                ..GeneratorConfig::default()
            };
            assert!(matches!(
                AnthropicGenerator::new(&cfg),
                Err(GeneratorError::NotConfigured(_))
            ));
        });
    }
}
