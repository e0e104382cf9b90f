//! Agent factory

use std::sync::Arc;

use tracing::info;

use crate::Config;
use crate::browser::BrowserSession;
use crate::llm::{ChatModel, LlmConfig, OpenAiCompatClient};
use crate::prompts::PromptStore;

use super::{AgentResult, AgentSpec};

/// Builds [`Agent`] handles from a shared prompt store and crate defaults.
///
/// Owns the store loaded at startup; construct one factory and pass it by
/// reference into whatever creates agents.
pub struct AgentFactory {
    prompts: PromptStore,
    config: Config,
}

impl AgentFactory {
    pub fn new(prompts: PromptStore) -> Self {
        Self::with_config(prompts, Config::default())
    }

    pub fn with_config(prompts: PromptStore, config: Config) -> Self {
        Self { prompts, config }
    }

    pub fn prompts(&self) -> &PromptStore {
        &self.prompts
    }

    /// Construct an agent for `spec`, wiring the selected extend prompt in
    /// as its extended system message.
    ///
    /// The prompt selector is resolved before anything else, so a bad
    /// selector never constructs a chat client. Client constructor failures
    /// propagate unchanged; there is no recovery at this layer.
    pub fn build(&self, spec: AgentSpec, session: Option<BrowserSession>) -> AgentResult<Agent> {
        let extend_prompt = self.prompts.resolve(&spec.extend_prompt)?.to_string();

        info!(
            "init chat model: {}; api_key: {}; base_url: {}",
            spec.model, spec.api_key, spec.base_url
        );
        let llm = OpenAiCompatClient::new(LlmConfig {
            model: spec.model,
            api_key: spec.api_key,
            base_url: spec.base_url,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            // thinking mode stays off for automation traffic
            enable_thinking: false,
        })?;
        info!("extend prompt: {}", extend_prompt);

        Ok(Agent {
            task: spec.task,
            llm: Arc::new(llm),
            extend_system_message: extend_prompt,
            session,
        })
    }
}

/// A configured browser agent handle: the task, the chat client, the
/// extended system message, and an optional browser session to drive.
pub struct Agent {
    task: String,
    llm: Arc<dyn ChatModel>,
    extend_system_message: String,
    session: Option<BrowserSession>,
}

impl Agent {
    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn chat_model(&self) -> &dyn ChatModel {
        self.llm.as_ref()
    }

    /// Prompt text appended to the agent's system-level instructions
    pub fn extend_system_message(&self) -> &str {
        &self.extend_system_message
    }

    pub fn session(&self) -> Option<&BrowserSession> {
        self.session.as_ref()
    }

    /// Detach the browser session, leaving the agent without one
    pub fn take_session(&mut self) -> Option<BrowserSession> {
        self.session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentError;
    use crate::llm::LlmError;
    use crate::prompts::PromptError;
    use std::fs;

    fn store_with(prompts: &[(&str, &str)]) -> PromptStore {
        let dir = tempfile::tempdir().unwrap();
        for (name, text) in prompts {
            fs::write(dir.path().join(name), text).unwrap();
        }
        PromptStore::load(dir.path()).unwrap()
    }

    fn valid_spec(extend_prompt: impl Into<crate::prompts::PromptSelector>) -> AgentSpec {
        AgentSpec::new(
            "find the latest release notes",
            "qwen-plus",
            "sk-test",
            "https://example.test/v1",
            extend_prompt,
        )
    }

    #[test]
    fn build_wires_the_selected_prompt_in() {
        let factory = AgentFactory::new(store_with(&[
            ("a_first.md", "first prompt"),
            ("b_second.md", "second prompt"),
        ]));

        let agent = factory.build(valid_spec(1usize), None).unwrap();
        assert_eq!(agent.extend_system_message(), "second prompt");
        assert_eq!(agent.task(), "find the latest release notes");
        assert_eq!(agent.chat_model().model(), "qwen-plus");
        assert!(agent.session().is_none());
    }

    #[test]
    fn build_resolves_named_prompts() {
        let factory = AgentFactory::new(store_with(&[("careful.md", "go slow")]));

        let agent = factory.build(valid_spec("careful"), None).unwrap();
        assert_eq!(agent.extend_system_message(), "go slow");
    }

    #[test]
    fn bad_index_fails_before_any_client_exists() {
        let factory = AgentFactory::new(store_with(&[("only.md", "text")]));

        // The key is also invalid; a prompt error proves the client
        // constructor never ran.
        let mut spec = valid_spec(5usize);
        spec.api_key = "".into();

        match factory.build(spec, None) {
            Err(AgentError::Prompt(PromptError::IndexOutOfRange { index: 5, len: 1 })) => {}
            other => panic!("expected IndexOutOfRange, got {:?}", other.err()),
        }
    }

    #[test]
    fn log_lines_redact_the_api_key() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::fmt::MakeWriter;

        #[derive(Clone)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl<'a> MakeWriter<'a> for Capture {
            type Writer = Capture;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let buffer = Capture(Arc::new(Mutex::new(Vec::new())));
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();

        let factory = AgentFactory::new(store_with(&[("only.md", "text")]));
        tracing::subscriber::with_default(subscriber, || {
            factory.build(valid_spec(0usize), None).unwrap();
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("init chat model: qwen-plus"));
        assert!(logs.contains("extend prompt: text"));
        assert!(!logs.contains("sk-test"));
        assert!(logs.contains("****************"));
    }

    #[test]
    fn client_constructor_failures_propagate() {
        let factory = AgentFactory::new(store_with(&[("only.md", "text")]));

        let mut spec = valid_spec(0usize);
        spec.api_key = "".into();

        assert!(matches!(
            factory.build(spec, None),
            Err(AgentError::Llm(LlmError::MissingApiKey(_)))
        ));
    }
}
