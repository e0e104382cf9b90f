//! Reqwest-backed chat client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{ChatMessage, ChatModel, LlmConfig, LlmError};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat client for OpenAI-compatible endpoints.
///
/// Construction validates the configuration and builds the HTTP client but
/// performs no network traffic; endpoint or credential problems surface on
/// the first [`ChatModel::chat`] call or, for malformed input, here.
pub struct OpenAiCompatClient {
    config: LlmConfig,
    endpoint: String,
    http: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.model.is_empty() {
            return Err(LlmError::EmptyModel);
        }
        if config.api_key.is_empty() {
            return Err(LlmError::MissingApiKey(config.model.clone()));
        }

        let base = Url::parse(&config.base_url).map_err(|e| LlmError::InvalidEndpoint {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(LlmError::InvalidEndpoint {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme '{}'", base.scheme()),
            });
        }
        let endpoint = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        );

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            config,
            endpoint,
            http,
        })
    }

    /// Resolved chat-completions URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            enable_thinking: self.config.enable_thinking,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u64,
    enable_thinking: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiCompatClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        debug!(
            "sending {} message(s) to {} (model: {})",
            messages.len(),
            self.endpoint,
            self.config.model
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.config.api_key.expose())
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("no choices in completion".to_string()))
    }
}
