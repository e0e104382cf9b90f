//! Configuration layer for LLM-driven browser agents
//!
//! Loads extend-prompt files from disk, constructs an OpenAI-compatible chat
//! client, and wires both into an [`Agent`] handle via [`AgentFactory`].

pub mod agent;
pub mod browser;
pub mod llm;
pub mod prompts;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u64,

    /// Directory of extend-prompt files, one prompt per file
    #[serde(default = "default_prompt_dir")]
    pub prompt_dir: PathBuf,

    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Browser launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Window dimensions
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u64 {
    2048
}

fn default_prompt_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("prompts")
        .join("extend")
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            prompt_dir: default_prompt_dir(),
            browser: BrowserConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

/// Load config from config.yaml in package root
pub fn load_yaml_config() -> anyhow::Result<Config> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.yaml");

    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

pub use agent::{Agent, AgentError, AgentFactory, AgentResult, AgentSpec};
pub use browser::{BrowserError, BrowserResult, BrowserSession};
pub use llm::{ApiKey, ChatMessage, ChatModel, LlmConfig, LlmError, OpenAiCompatClient};
pub use prompts::{PromptError, PromptSelector, PromptStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 2048);
        assert!(config.browser.headless);
        assert_eq!(config.browser.window.width, 1280);
        assert_eq!(config.browser.window.height, 720);
        assert!(config.prompt_dir.ends_with("prompts/extend"));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("temperature: 0.2\n").unwrap();
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 2048);
        assert!(config.browser.headless);
    }
}
