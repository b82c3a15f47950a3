//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for review-reply
#[derive(Parser, Debug)]
#[command(name = "review-reply")]
#[command(author, version, about = "Customer review triage and reply service")]
#[command(long_about = r#"
review-reply serves an HTTP endpoint that classifies a customer review and
drafts a reply.

Positive reviews get a thank-you. Negative reviews are first diagnosed
(issue type, tone, urgency) and then answered with a reply addressing the
diagnosed problem.

Configuration is merged from (lowest to highest priority):
1. Built-in defaults
2. ~/.config/review-reply/config.toml   Global config
3. ./review-reply.toml                  Project-level config
4. --config <path>                      Explicit config file
5. REVIEW_REPLY_* environment variables (e.g. REVIEW_REPLY_SERVER__PORT)
6. --host / --port flags

Example:
  review-reply --port 8080
  curl -X POST localhost:8080/process-review -H 'content-type: application/json' \
       -d '{"review": "The app crashes every time I open it"}'
"#)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Address to bind (overrides server.host)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to bind (overrides server.port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Verbosity level (default: this service at info; -v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Default tracing filter for the requested verbosity.
    ///
    /// Without `-v` this workspace's crates (all targets prefixed
    /// `review_reply`) still log at info, so the bind address is announced.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn,review_reply=info",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
