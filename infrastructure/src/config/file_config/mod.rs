//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod openai;
mod server;

pub use logging::FileLoggingConfig;
pub use openai::FileOpenAiConfig;
pub use server::FileServerConfig;

use review_reply_domain::{ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener settings
    pub server: FileServerConfig,
    /// Language-model provider settings
    pub openai: FileOpenAiConfig,
    /// Log output settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Credentials are not checked here; a missing API key is reported when
    /// the gateway is built.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.server.host.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "server.host".to_string(),
                },
                "server.host must not be empty",
            ));
        }
        if self.server.port == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidPort,
                "server.port must be between 1 and 65535",
            ));
        }

        let openai = &self.openai;
        if matches!(&openai.model, Model::Custom(name) if name.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "openai.model".to_string(),
                },
                "openai.model must name a chat model",
            ));
        }
        if openai.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "openai.base_url".to_string(),
                },
                "openai.base_url must not be empty",
            ));
        }
        if openai.api_key.is_none() && openai.api_key_env.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "openai.api_key_env".to_string(),
                },
                "openai.api_key_env is empty and no openai.api_key is set",
            ));
        }
        if openai.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "openai.timeout_secs".to_string(),
                },
                "openai.timeout_secs must be positive",
            ));
        }
        if let Some(t) = openai.temperature
            && !(0.0..=2.0).contains(&t)
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "openai.temperature".to_string(),
                    value: t.to_string(),
                },
                format!("openai.temperature must be within 0.0..=2.0, got {}", t),
            ));
        }
        if openai.max_retries > 0 && openai.retry_backoff_ms == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: "openai.retry_backoff_ms".to_string(),
                },
                "openai.retry_backoff_ms is 0: retries will fire back to back",
            ));
        }

        issues
    }
}
