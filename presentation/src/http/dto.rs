//! Request and response bodies

use review_reply_domain::{Diagnosis, IssueType, ReviewOutcome, Sentiment, Tone, Urgency};
use serde::{Deserialize, Serialize};

/// Body of `POST /process-review`
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub review: String,
}

/// Successful reply to `POST /process-review`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutput {
    pub review: String,
    pub sentiment: Sentiment,
    /// `null` on the positive branch
    pub diagnosis: Option<DiagnosisOutput>,
    pub response: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisOutput {
    pub issue_type: IssueType,
    pub tone: Tone,
    pub urgency: Urgency,
}

impl From<Diagnosis> for DiagnosisOutput {
    fn from(d: Diagnosis) -> Self {
        Self {
            issue_type: d.issue_type,
            tone: d.tone,
            urgency: d.urgency,
        }
    }
}

impl From<ReviewOutcome> for ReviewOutput {
    fn from(outcome: ReviewOutcome) -> Self {
        Self {
            review: outcome.review,
            sentiment: outcome.sentiment,
            diagnosis: outcome.diagnosis.map(DiagnosisOutput::from),
            response: outcome.response,
        }
    }
}
