//! Review value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Raw customer feedback submitted for processing (Value Object)
///
/// Always holds non-blank text. The original text is kept verbatim,
/// surrounding whitespace included, so prompts see exactly what the
/// customer wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Review {
    text: String,
}

impl Review {
    /// Create a review, rejecting empty or whitespace-only text
    pub fn try_new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyReview);
        }
        Ok(Self { text })
    }

    /// Get the review text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume and return the inner text
    pub fn into_text(self) -> String {
        self.text
    }

    /// Short single-line preview for log lines.
    ///
    /// Cuts at `max_bytes` on a UTF-8 boundary and appends `...` when
    /// anything was dropped.
    pub fn preview(&self, max_bytes: usize) -> String {
        let flat = self.text.trim().replace(['\n', '\r'], " ");
        if flat.len() <= max_bytes {
            return flat;
        }
        let mut end = max_bytes;
        while end > 0 && !flat.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &flat[..end])
    }
}

impl std::fmt::Display for Review {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl TryFrom<String> for Review {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Review::try_new(s)
    }
}

impl From<Review> for String {
    fn from(review: Review) -> Self {
        review.text
    }
}
