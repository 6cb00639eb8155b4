//! Configuration models.
//!
//! Every section defaults independently, so a partial (or missing) config
//! file yields a working configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::UnmatchedPolicy;

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub assistant: AssistantConfig,
    pub resolver: ResolverConfig,
    pub session: SessionConfig,
    pub idle: IdleConfig,
    pub gemini: GeminiConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssistantConfig {
    pub greeting: String,
    pub farewell: String,
    /// Phrases that end the interaction loop (matched as whole words)
    pub exit_phrases: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello! How can I assist you today?".to_string(),
            farewell: "Goodbye!".to_string(),
            exit_phrases: vec!["exit".to_string(), "quit".to_string(), "goodbye".to_string()],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    pub unmatched_policy: UnmatchedPolicy,
    /// How many times an empty answer is re-asked before giving up
    pub prompt_retries: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            unmatched_policy: UnmatchedPolicy::default(),
            prompt_retries: 2,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of prior turns used to seed the conversation context
    pub context_turns: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { context_turns: 10 }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct IdleConfig {
    pub threshold_secs: u64,
    pub poll_interval_secs: u64,
    /// How far ahead a task deadline counts as due for a reminder
    pub lookahead_mins: i64,
}

impl IdleConfig {
    pub fn threshold(&self) -> Duration {
        Duration::from_secs(self.threshold_secs)
    }

    /// Poll interval, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            threshold_secs: 1800,
            poll_interval_secs: 5,
            lookahead_mins: 60,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl GeminiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 20,
            max_attempts: 2,
            backoff_ms: 500,
        }
    }
}

/// Contents of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeminiSecret {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}
