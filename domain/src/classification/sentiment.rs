//! Binary sentiment of a review

use super::Classification;
use super::schema::StructuredSchema;
use serde::{Deserialize, Serialize};

/// Sentiment of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Classification for Sentiment {
    const FIELD: &'static str = "sentiment";
    const DESCRIPTION: &'static str = "Sentiment of the review";

    fn variants() -> &'static [Self] {
        &[Sentiment::Positive, Sentiment::Negative]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured answer of the sentiment check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentimentVerdict {
    pub sentiment: Sentiment,
}

impl SentimentVerdict {
    /// Schema the model's answer must conform to.
    pub fn schema() -> StructuredSchema {
        StructuredSchema::new("SentimentSchema").with_field(Sentiment::enum_field())
    }
}
