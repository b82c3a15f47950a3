//! Prompt templates for the review workflow

use crate::classification::diagnosis::Diagnosis;
use crate::core::review::Review;

/// Templates for generating prompts at each step
pub struct ReviewPromptTemplate;

impl ReviewPromptTemplate {
    /// Prompt for the sentiment check
    pub fn sentiment(review: &Review) -> String {
        format!(
            "For the following review find out the sentiment \n {}",
            review.text()
        )
    }

    /// Prompt for the reply to a positive review
    pub fn positive_response(review: &Review) -> String {
        format!(
            r#"Write a warm thank-you message in response to this review:

"{}"

Also, kindly ask the user to leave feedback on our website."#,
            review.text()
        )
    }

    /// Prompt for diagnosing a negative review
    pub fn diagnosis(review: &Review) -> String {
        format!(
            r#"Diagnose this negative review:

{}

Return issue_type, tone, and urgency."#,
            review.text()
        )
    }

    /// Prompt for the reply to a negative review.
    ///
    /// Only the diagnosis is embedded; the reply is tailored to the issue
    /// category, tone and urgency rather than to the raw text.
    pub fn negative_response(diagnosis: &Diagnosis) -> String {
        format!(
            r#"You are a support assistant.
The user had a '{}' issue, sounded '{}', and marked urgency as '{}'.
Write an empathetic, helpful resolution message.
"#,
            diagnosis.issue_type, diagnosis.tone, diagnosis.urgency
        )
    }
}
