//! OpenAI gateway adapter
//!
//! Implements [`LlmGateway`] on top of `POST /v1/chat/completions`.
//! Structured calls use a strict `json_schema` response format and the
//! answer is validated against the same schema before it is returned.

use super::types::{
    ApiErrorBody, AssistantMessage, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    ResponseFormat,
};
use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use review_reply_application::ports::llm_gateway::{GatewayError, LlmGateway};
use review_reply_domain::{Model, StructuredSchema};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Resolved settings for [`OpenAiGateway`].
#[derive(Debug, Clone)]
pub struct OpenAiGatewayConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: Model,
    pub temperature: Option<f32>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl OpenAiGatewayConfig {
    /// Build from the `[openai]` section, resolving the API key.
    pub fn from_file_config(file: &FileOpenAiConfig) -> Result<Self, GatewayError> {
        let api_key = file.resolve_api_key().ok_or_else(|| {
            GatewayError::MissingCredentials(format!(
                "set {} or openai.api_key",
                file.api_key_env
            ))
        })?;

        Ok(Self {
            api_key,
            base_url: file.base_url.clone(),
            model: file.model.clone(),
            temperature: file.temperature,
            timeout: Duration::from_secs(file.timeout_secs),
            max_retries: file.max_retries,
            retry_backoff: Duration::from_millis(file.retry_backoff_ms),
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// LLM Gateway implementation for the OpenAI chat completions API
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: OpenAiGatewayConfig,
}

impl OpenAiGateway {
    pub fn new(config: OpenAiGatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("review-reply/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        info!(
            model = %config.model,
            base_url = %config.base_url,
            "OpenAI gateway initialized"
        );

        Ok(Self { client, config })
    }

    fn request(&self, prompt: &str, response_format: Option<ResponseFormat>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.to_string(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: self.config.temperature,
            response_format,
        }
    }

    /// Send with retries on transient failures.
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<AssistantMessage, GatewayError> {
        let mut attempt: u32 = 0;
        loop {
            match self.send_once(request).await {
                Ok(message) => return Ok(message),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_backoff.saturating_mul(1 << attempt.min(16));
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "OpenAI request failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<AssistantMessage, GatewayError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(GatewayError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::InvalidResponse("response has no choices".to_string()))?;

        debug!(finish_reason = ?choice.finish_reason, "OpenAI completion received");

        if let Some(refusal) = choice.message.refusal {
            return Err(GatewayError::Refused(refusal));
        }
        Ok(choice.message)
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(e.to_string())
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn model(&self) -> &Model {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let message = self.complete(&self.request(prompt, None)).await?;
        Ok(message.content.unwrap_or_default())
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &StructuredSchema,
    ) -> Result<Value, GatewayError> {
        let format = ResponseFormat::strict_json_schema(schema.name(), schema.to_json_schema());
        let message = self.complete(&self.request(prompt, Some(format))).await?;

        let content = message.content.ok_or_else(|| {
            GatewayError::InvalidResponse("structured answer has no content".to_string())
        })?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| GatewayError::InvalidResponse(format!("answer is not JSON: {}", e)))?;

        schema.validate(&value)?;
        Ok(value)
    }
}
