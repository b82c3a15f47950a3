//! OpenAI chat completions provider

mod adapter;
mod types;

pub use adapter::{OpenAiGateway, OpenAiGatewayConfig};
