//! Workflow steps and the transitions between them

use super::branch::Branch;
use super::state::ReviewState;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A node of the review workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Start,
    SentimentCheck,
    PositiveResponse,
    Diagnosis,
    NegativeResponse,
    End,
}

impl WorkflowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::Start => "start",
            WorkflowStep::SentimentCheck => "sentiment_check",
            WorkflowStep::PositiveResponse => "positive_response",
            WorkflowStep::Diagnosis => "diagnosis",
            WorkflowStep::NegativeResponse => "negative_response",
            WorkflowStep::End => "end",
        }
    }

    /// Step that follows this one, given what the state holds so far.
    ///
    /// The only conditional edge is after `SentimentCheck`, where the
    /// recorded sentiment picks the branch.
    pub fn next(self, state: &ReviewState) -> Result<WorkflowStep, DomainError> {
        match self {
            WorkflowStep::Start => Ok(WorkflowStep::SentimentCheck),
            WorkflowStep::SentimentCheck => Ok(match state.branch()? {
                Branch::Positive => WorkflowStep::PositiveResponse,
                Branch::Negative => WorkflowStep::Diagnosis,
            }),
            WorkflowStep::Diagnosis => Ok(WorkflowStep::NegativeResponse),
            WorkflowStep::PositiveResponse | WorkflowStep::NegativeResponse => {
                Ok(WorkflowStep::End)
            }
            WorkflowStep::End => Err(DomainError::internal("no step follows end")),
        }
    }
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
