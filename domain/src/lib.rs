//! Domain layer for review-reply
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Review workflow
//!
//! Every inbound review runs through a small state machine:
//!
//! - **Sentiment check**: the model classifies the review as positive or negative
//! - **Branch**: positive reviews get a thank-you, negative ones are diagnosed first
//! - **Diagnosis**: issue type, tone and urgency, each from a fixed label set
//! - **Response**: a reply tailored to the branch (and diagnosis)
//!
//! ## Structured output
//!
//! Classifications are requested against a [`StructuredSchema`] so the
//! model can only answer with labels the domain knows about.

pub mod classification;
pub mod config;
pub mod core;
pub mod prompt;
pub mod workflow;

// Re-export commonly used types
pub use classification::{
    Classification,
    diagnosis::{Diagnosis, IssueType, Tone, Urgency},
    schema::{EnumField, SchemaViolation, StructuredSchema},
    sentiment::{Sentiment, SentimentVerdict},
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{error::DomainError, model::Model, review::Review};
pub use prompt::ReviewPromptTemplate;
pub use workflow::{
    branch::Branch,
    state::{ReviewOutcome, ReviewState},
    step::WorkflowStep,
};
