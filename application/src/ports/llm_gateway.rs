//! LLM Gateway port
//!
//! Defines the interface for communicating with the language-model provider.
//! The workflow only needs two operations: free-text generation and
//! enum-constrained structured extraction.

use async_trait::async_trait;
use review_reply_domain::{Model, SchemaViolation, StructuredSchema};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model refused to answer: {0}")]
    Refused(String),

    #[error("Structured output does not match schema: {0}")]
    SchemaViolation(#[from] SchemaViolation),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

impl GatewayError {
    /// Whether a transport-level retry could plausibly succeed.
    ///
    /// Schema violations and refusals are answers, not outages, and are
    /// never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::ConnectionError(_) | GatewayError::Timeout => true,
            GatewayError::RequestFailed { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Model that answers requests made through this gateway
    fn model(&self) -> &Model;

    /// Generate free text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Generate an object conforming to `schema`.
    ///
    /// Implementations must fail with [`GatewayError::SchemaViolation`]
    /// rather than return a value outside the schema's enums.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &StructuredSchema,
    ) -> Result<Value, GatewayError>;
}
