//! Configuration file loading for review-reply
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `REVIEW_REPLY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./review-reply.toml` or `./.review-reply.toml`
//! 4. Global: `$XDG_CONFIG_HOME/review-reply/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileLoggingConfig, FileOpenAiConfig, FileServerConfig};
pub use loader::ConfigLoader;
