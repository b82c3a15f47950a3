//! Application layer for review-reply
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway},
};
pub use use_cases::process_review::{
    ClassificationFailure, ErrorKind, ProcessReviewError, ProcessReviewInput,
    ProcessReviewUseCase,
};
