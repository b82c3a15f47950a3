//! Per-request review state and its terminal outcome

use super::branch::Branch;
use crate::classification::diagnosis::Diagnosis;
use crate::classification::sentiment::Sentiment;
use crate::core::error::DomainError;
use crate::core::review::Review;
use serde::{Deserialize, Serialize};

/// The unit of work for one review.
///
/// Fields are filled in additively as steps complete. Each `record_*`
/// method refuses to overwrite a value or to run out of order, so a
/// misbehaving driver surfaces as [`DomainError::InternalState`] instead
/// of a silently inconsistent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewState {
    review: Review,
    sentiment: Option<Sentiment>,
    diagnosis: Option<Diagnosis>,
    response: Option<String>,
}

impl ReviewState {
    pub fn new(review: Review) -> Self {
        Self {
            review,
            sentiment: None,
            diagnosis: None,
            response: None,
        }
    }

    pub fn review(&self) -> &Review {
        &self.review
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        self.diagnosis.as_ref()
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn record_sentiment(&mut self, sentiment: Sentiment) -> Result<(), DomainError> {
        if self.sentiment.is_some() {
            return Err(DomainError::internal("sentiment already recorded"));
        }
        self.sentiment = Some(sentiment);
        Ok(())
    }

    /// Branch to take after the sentiment check.
    pub fn branch(&self) -> Result<Branch, DomainError> {
        self.sentiment
            .map(Branch::for_sentiment)
            .ok_or_else(|| DomainError::internal("branching before sentiment was recorded"))
    }

    pub fn record_diagnosis(&mut self, diagnosis: Diagnosis) -> Result<(), DomainError> {
        if !self.branch()?.needs_diagnosis() {
            return Err(DomainError::internal(
                "diagnosis recorded for a positive review",
            ));
        }
        if self.diagnosis.is_some() {
            return Err(DomainError::internal("diagnosis already recorded"));
        }
        self.diagnosis = Some(diagnosis);
        Ok(())
    }

    pub fn record_response(&mut self, response: String) -> Result<(), DomainError> {
        if self.branch()?.needs_diagnosis() && self.diagnosis.is_none() {
            return Err(DomainError::internal(
                "negative response recorded before diagnosis",
            ));
        }
        if self.response.is_some() {
            return Err(DomainError::internal("response already recorded"));
        }
        self.response = Some(response);
        Ok(())
    }

    /// Close the workflow, checking every invariant of a finished record.
    pub fn finish(self) -> Result<ReviewOutcome, DomainError> {
        let branch = self.branch()?;
        let Some(sentiment) = self.sentiment else {
            return Err(DomainError::internal("sentiment missing at finish"));
        };
        let Some(response) = self.response else {
            return Err(DomainError::internal("response missing at finish"));
        };
        if branch.needs_diagnosis() != self.diagnosis.is_some() {
            return Err(DomainError::internal(
                "diagnosis must be present exactly for negative reviews",
            ));
        }

        Ok(ReviewOutcome {
            review: self.review.into_text(),
            sentiment,
            diagnosis: self.diagnosis,
            response,
        })
    }
}

/// Terminal record of a completed workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub review: String,
    pub sentiment: Sentiment,
    pub diagnosis: Option<Diagnosis>,
    pub response: String,
}
