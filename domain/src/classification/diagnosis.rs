//! Structured diagnosis of a negative review

use super::Classification;
use super::schema::StructuredSchema;
use serde::{Deserialize, Serialize};

/// Category of issue mentioned in a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    #[serde(rename = "UX")]
    Ux,
    Performance,
    Bug,
    Support,
    Other,
}

impl Classification for IssueType {
    const FIELD: &'static str = "issue_type";
    const DESCRIPTION: &'static str = "The category of issue mentioned in the review";

    fn variants() -> &'static [Self] {
        &[
            IssueType::Ux,
            IssueType::Performance,
            IssueType::Bug,
            IssueType::Support,
            IssueType::Other,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            IssueType::Ux => "UX",
            IssueType::Performance => "Performance",
            IssueType::Bug => "Bug",
            IssueType::Support => "Support",
            IssueType::Other => "Other",
        }
    }
}

/// Emotional tone expressed by the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Angry,
    Frustrated,
    Disappointed,
    Calm,
}

impl Classification for Tone {
    const FIELD: &'static str = "tone";
    const DESCRIPTION: &'static str = "The emotional tone expressed by the user";

    fn variants() -> &'static [Self] {
        &[Tone::Angry, Tone::Frustrated, Tone::Disappointed, Tone::Calm]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Tone::Angry => "angry",
            Tone::Frustrated => "frustrated",
            Tone::Disappointed => "disappointed",
            Tone::Calm => "calm",
        }
    }
}

/// How urgent or critical the issue appears to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Classification for Urgency {
    const FIELD: &'static str = "urgency";
    const DESCRIPTION: &'static str = "How urgent or critical the issue appears to be";

    fn variants() -> &'static [Self] {
        &[Urgency::Low, Urgency::Medium, Urgency::High]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

macro_rules! display_as_label {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        })*
    };
}

display_as_label!(IssueType, Tone, Urgency);

/// Diagnosis of a negative review (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Diagnosis {
    pub issue_type: IssueType,
    pub tone: Tone,
    pub urgency: Urgency,
}

impl Diagnosis {
    pub fn new(issue_type: IssueType, tone: Tone, urgency: Urgency) -> Self {
        Self {
            issue_type,
            tone,
            urgency,
        }
    }

    /// Schema the model's answer must conform to.
    pub fn schema() -> StructuredSchema {
        StructuredSchema::new("DiagnosisSchema")
            .with_field(IssueType::enum_field())
            .with_field(Tone::enum_field())
            .with_field(Urgency::enum_field())
    }
}
