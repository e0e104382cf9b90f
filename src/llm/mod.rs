//! Chat model construction for OpenAI-compatible endpoints
//!
//! The factory talks to the model through the [`ChatModel`] seam;
//! [`OpenAiCompatClient`] is the one production implementation.

mod client;

pub use client::OpenAiCompatClient;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for chat model construction and calls
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("missing API key for model {0}")]
    MissingApiKey(String),

    #[error("model name is empty")]
    EmptyModel,

    #[error("invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("LLM endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),
}

const REDACTED_KEY: &str = "****************";

/// API credential newtype.
///
/// `Debug` and `Display` render a fixed mask; the raw key only leaves this
/// type through [`ApiKey::expose`], used for request authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key material
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({REDACTED_KEY})")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED_KEY)
    }
}

/// Parameters consumed by the chat client constructor
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: ApiKey,
    pub base_url: String,
    pub temperature: f64,
    pub max_tokens: u64,
    /// Extended "thinking" mode on endpoints that support it; off by default
    pub enable_thinking: bool,
}

impl LlmConfig {
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<ApiKey>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            temperature: 0.7,
            max_tokens: 2048,
            enable_thinking: false,
        }
    }
}

/// A single message in the OpenAI wire shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Invocable chat client
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier this client is bound to
    fn model(&self) -> &str;

    /// Send `messages` and return the assistant's reply text
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}
