//! OpenAI provider configuration from TOML (`[openai]` section)

use review_reply_domain::Model;
use serde::{Deserialize, Serialize};

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can be overridden for compatible endpoints).
    pub base_url: String,
    /// Chat model used for every step (default: gpt-4o-mini).
    pub model: Model,
    /// Sampling temperature; provider default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure (429, 5xx, timeout, connection).
    pub max_retries: u32,
    /// Backoff before the first retry; doubles on each further attempt.
    pub retry_backoff_ms: u64,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: Model::default(),
            temperature: None,
            timeout_secs: 60,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl FileOpenAiConfig {
    /// Resolve the API key from the process environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolve the API key: an explicit `api_key` wins over `api_key_env`.
    /// Blank values count as unset.
    pub fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| lookup(&self.api_key_env))
            .filter(|k| !k.trim().is_empty())
    }
}
