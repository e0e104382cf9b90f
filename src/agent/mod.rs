//! Agent construction
//!
//! [`AgentFactory`] resolves an extend prompt and wires it, together with a
//! freshly built chat client, into an [`Agent`] handle. Construction is a
//! single synchronous composition call with no retries.

mod factory;

pub use factory::{Agent, AgentFactory};

use thiserror::Error;

use crate::llm::{ApiKey, LlmError};
use crate::prompts::{PromptError, PromptSelector};

/// Error type for agent construction
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Result type for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Parameters for one agent construction call.
///
/// Built per call and consumed by [`AgentFactory::build`]; nothing here is
/// persisted.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    /// Task description handed to the agent
    pub task: String,

    /// Model identifier for the chat client
    pub model: String,

    pub api_key: ApiKey,

    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,

    /// Which extend prompt to inject as the agent's extended system message
    pub extend_prompt: PromptSelector,
}

impl AgentSpec {
    pub fn new(
        task: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<ApiKey>,
        base_url: impl Into<String>,
        extend_prompt: impl Into<PromptSelector>,
    ) -> Self {
        Self {
            task: task.into(),
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            extend_prompt: extend_prompt.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_debug_never_leaks_the_key() {
        let spec = AgentSpec::new(
            "check prices",
            "qwen-plus",
            "sk-spec-secret",
            "https://example.test/v1",
            0usize,
        );
        assert!(!format!("{spec:?}").contains("sk-spec-secret"));
    }

    #[test]
    fn selector_conversions() {
        let by_index = AgentSpec::new("t", "m", "k", "u", 3usize);
        assert_eq!(by_index.extend_prompt, PromptSelector::Index(3));

        let by_name = AgentSpec::new("t", "m", "k", "u", "careful_navigation");
        assert_eq!(
            by_name.extend_prompt,
            PromptSelector::Name("careful_navigation".to_string())
        );
    }
}
