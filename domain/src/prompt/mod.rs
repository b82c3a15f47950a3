//! Prompt domain
//!
//! Templates for the prompts sent at each step of the review workflow.

mod template;

pub use template::ReviewPromptTemplate;
