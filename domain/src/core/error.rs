//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Review text must not be empty")]
    EmptyReview,

    #[error("Workflow state invariant violated: {0}")]
    InternalState(String),
}

impl DomainError {
    /// Check if this error was caused by bad caller input
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::EmptyReview)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        DomainError::InternalState(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_review_display() {
        assert_eq!(
            DomainError::EmptyReview.to_string(),
            "Review text must not be empty"
        );
    }

    #[test]
    fn test_is_validation_check() {
        assert!(DomainError::EmptyReview.is_validation());
        assert!(!DomainError::internal("sentiment unset").is_validation());
    }
}
