//! Branch selection after the sentiment check

use crate::classification::sentiment::Sentiment;
use serde::{Deserialize, Serialize};

/// The two terminal paths of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    /// Thank the customer and ask for public feedback.
    #[serde(rename = "positive_response")]
    Positive,
    /// Diagnose the issue, then reply with a resolution message.
    #[serde(rename = "run_diagnosis")]
    Negative,
}

impl Branch {
    /// Pick the branch for a sentiment. Total and side-effect free.
    pub fn for_sentiment(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Positive => Branch::Positive,
            Sentiment::Negative => Branch::Negative,
        }
    }

    /// Whether this branch runs the diagnosis step.
    pub fn needs_diagnosis(&self) -> bool {
        matches!(self, Branch::Negative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Positive => "positive_response",
            Branch::Negative => "run_diagnosis",
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
