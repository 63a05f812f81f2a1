//! OpenAI chat completions client.
//!
//! Talks to `POST {base_url}/chat/completions` directly over `reqwest`.
//! Any OpenAI-compatible server works by pointing `base_url` at it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;
use crate::constants;

use super::{ChatMessage, CompletionClient, CompletionError, CompletionOptions, Exchange};

/// Maximum length of an error body to include in transport error messages.
const ERROR_PREVIEW_LEN: usize = 500;

/// Production completion client.
pub struct OpenAiClient {
    config: OpenAiConfig,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client, failing fast when no API key is configured.
    pub fn new(config: OpenAiConfig) -> Result<Self, CompletionError> {
        if config.api_key().is_none() {
            return Err(CompletionError::NotConfigured(format!(
                "no API key found. Set {}.",
                constants::ENV_OPENAI_API_KEY
            )));
        }
        let http = reqwest::Client::builder()
            .user_agent(constants::USER_AGENT)
            .timeout(constants::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CompletionError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    fn api_key(&self) -> Result<&str, CompletionError> {
        self.config
            .api_key()
            .ok_or_else(|| CompletionError::NotConfigured("missing API key".to_string()))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request<'a>(
        &'a self,
        exchange: &Exchange,
        options: &CompletionOptions,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: exchange.messages(),
            max_tokens: options.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        exchange: &Exchange,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let api_key = self.api_key()?;
        let request = self.build_request(exchange, options);

        tracing::debug!(
            model = request.model,
            max_tokens = ?request.max_tokens,
            prompt_chars = exchange.user.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Transport(format!(
                "HTTP {status}: {}",
                api_error_message(&body)
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Transport(format!("failed to parse response: {e}")))?;

        first_choice_text(body)
    }
}

/// Return the first choice's content verbatim, or `EmptyResponse` when there is none.
fn first_choice_text(response: ChatCompletionResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or(CompletionError::EmptyResponse)
}

/// Pull `error.message` out of an API error body, falling back to a truncated raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(ERROR_PREVIEW_LEN).collect())
}
