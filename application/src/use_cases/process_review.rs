//! Process Review use case.
//!
//! Drives one review through the workflow graph:
//!
//! 1. Sentiment check (structured, `positive` | `negative`)
//! 2. Branch on the recorded sentiment
//! 3. Positive: thank-you reply. Negative: diagnosis, then resolution reply
//!
//! Each step is a single gateway call followed by a pure state update.
//! Nothing is retried here; retry and timeout policy belongs to the gateway.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use review_reply_domain::{
    Diagnosis, DomainError, Review, ReviewOutcome, ReviewPromptTemplate, ReviewState,
    SchemaViolation, SentimentVerdict, StructuredSchema, WorkflowStep,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const PREVIEW_BYTES: usize = 80;

/// Why a structured classification step produced no usable label.
#[derive(Error, Debug)]
pub enum ClassificationFailure {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("answer does not match schema: {0}")]
    Schema(#[from] SchemaViolation),

    #[error("answer could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that can occur while processing a review.
#[derive(Error, Debug)]
pub enum ProcessReviewError {
    #[error("Invalid review: {0}")]
    Validation(#[source] DomainError),

    #[error("Classification failed during {step}: {source}")]
    Classification {
        step: WorkflowStep,
        #[source]
        source: ClassificationFailure,
    },

    #[error("Response generation failed during {step}: {source}")]
    Generation {
        step: WorkflowStep,
        #[source]
        source: GatewayError,
    },

    #[error("No response from model during {step}")]
    EmptyResponse { step: WorkflowStep },

    #[error("Internal state error: {0}")]
    InternalState(#[source] DomainError),
}

impl From<DomainError> for ProcessReviewError {
    fn from(err: DomainError) -> Self {
        if err.is_validation() {
            ProcessReviewError::Validation(err)
        } else {
            ProcessReviewError::InternalState(err)
        }
    }
}

/// Coarse error category, used for status mapping and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Classification,
    Generation,
    InternalState,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Classification => "classification",
            ErrorKind::Generation => "generation",
            ErrorKind::InternalState => "internal_state",
        }
    }
}

impl ProcessReviewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessReviewError::Validation(_) => ErrorKind::Validation,
            ProcessReviewError::Classification { .. } => ErrorKind::Classification,
            ProcessReviewError::Generation { .. } | ProcessReviewError::EmptyResponse { .. } => {
                ErrorKind::Generation
            }
            ProcessReviewError::InternalState(_) => ErrorKind::InternalState,
        }
    }

    /// Step that failed, if the failure happened inside a model step.
    pub fn step(&self) -> Option<WorkflowStep> {
        match self {
            ProcessReviewError::Classification { step, .. }
            | ProcessReviewError::Generation { step, .. }
            | ProcessReviewError::EmptyResponse { step } => Some(*step),
            _ => None,
        }
    }
}

/// Input for the [`ProcessReviewUseCase`].
#[derive(Debug, Clone)]
pub struct ProcessReviewInput {
    /// Raw review text as received; validated by the use case.
    pub review: String,
}

impl ProcessReviewInput {
    pub fn new(review: impl Into<String>) -> Self {
        Self {
            review: review.into(),
        }
    }
}

/// Use case running the review workflow.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent requests.
#[derive(Clone)]
pub struct ProcessReviewUseCase {
    gateway: Arc<dyn LlmGateway>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ProcessReviewUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Run the workflow for one review.
    pub async fn execute(
        &self,
        input: ProcessReviewInput,
    ) -> Result<ReviewOutcome, ProcessReviewError> {
        let review = Review::try_new(input.review)?;

        info!(
            model = %self.gateway.model(),
            "Processing review: {}",
            review.preview(PREVIEW_BYTES)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "review_received",
            json!({
                "model": self.gateway.model().as_str(),
                "review": review.text(),
            }),
        ));

        let result = self.run(ReviewState::new(review)).await;

        match &result {
            Ok(outcome) => info!(
                sentiment = %outcome.sentiment,
                diagnosed = outcome.diagnosis.is_some(),
                "Review processed"
            ),
            Err(e) => {
                warn!(kind = e.kind().as_str(), "Review processing failed: {}", e);
                self.conversation_logger.log(ConversationEvent::new(
                    "workflow_failed",
                    json!({
                        "kind": e.kind().as_str(),
                        "step": e.step().map(|s| s.as_str()),
                        "error": e.to_string(),
                    }),
                ));
            }
        }

        result
    }

    async fn run(&self, mut state: ReviewState) -> Result<ReviewOutcome, ProcessReviewError> {
        let mut step = WorkflowStep::Start;
        loop {
            step = step.next(&state)?;
            debug!("Entering step {}", step);
            match step {
                WorkflowStep::SentimentCheck => self.check_sentiment(&mut state).await?,
                WorkflowStep::PositiveResponse => self.positive_response(&mut state).await?,
                WorkflowStep::Diagnosis => self.run_diagnosis(&mut state).await?,
                WorkflowStep::NegativeResponse => self.negative_response(&mut state).await?,
                WorkflowStep::End => break,
                WorkflowStep::Start => {
                    return Err(ProcessReviewError::InternalState(
                        DomainError::InternalState("workflow re-entered start".to_string()),
                    ));
                }
            }
        }

        Ok(state.finish()?)
    }

    async fn check_sentiment(&self, state: &mut ReviewState) -> Result<(), ProcessReviewError> {
        let prompt = ReviewPromptTemplate::sentiment(state.review());
        let verdict: SentimentVerdict = self
            .classify(
                WorkflowStep::SentimentCheck,
                &prompt,
                &SentimentVerdict::schema(),
            )
            .await?;

        state.record_sentiment(verdict.sentiment)?;
        let branch = state.branch()?;

        info!(sentiment = %verdict.sentiment, branch = %branch, "Sentiment classified");
        self.conversation_logger.log(ConversationEvent::new(
            "sentiment_classified",
            json!({ "sentiment": verdict.sentiment }),
        ));
        self.conversation_logger.log(ConversationEvent::new(
            "branch_selected",
            json!({ "branch": branch }),
        ));
        Ok(())
    }

    async fn positive_response(&self, state: &mut ReviewState) -> Result<(), ProcessReviewError> {
        let prompt = ReviewPromptTemplate::positive_response(state.review());
        let reply = self.reply(WorkflowStep::PositiveResponse, &prompt).await?;
        state.record_response(reply)?;
        Ok(())
    }

    async fn run_diagnosis(&self, state: &mut ReviewState) -> Result<(), ProcessReviewError> {
        let prompt = ReviewPromptTemplate::diagnosis(state.review());
        let diagnosis: Diagnosis = self
            .classify(WorkflowStep::Diagnosis, &prompt, &Diagnosis::schema())
            .await?;

        state.record_diagnosis(diagnosis)?;

        info!(
            issue_type = %diagnosis.issue_type,
            tone = %diagnosis.tone,
            urgency = %diagnosis.urgency,
            "Negative review diagnosed"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "diagnosis_completed",
            json!({ "diagnosis": diagnosis }),
        ));
        Ok(())
    }

    async fn negative_response(&self, state: &mut ReviewState) -> Result<(), ProcessReviewError> {
        let diagnosis = state.diagnosis().copied().ok_or_else(|| {
            ProcessReviewError::InternalState(DomainError::InternalState(
                "negative response without diagnosis".to_string(),
            ))
        })?;
        let prompt = ReviewPromptTemplate::negative_response(&diagnosis);
        let reply = self.reply(WorkflowStep::NegativeResponse, &prompt).await?;
        state.record_response(reply)?;
        Ok(())
    }

    /// Ask for a structured answer and decode it into `T`.
    ///
    /// The gateway is required to validate against the schema; the value is
    /// checked again here so a lax adapter can never leak an unknown label
    /// into the state.
    async fn classify<T: DeserializeOwned>(
        &self,
        step: WorkflowStep,
        prompt: &str,
        schema: &StructuredSchema,
    ) -> Result<T, ProcessReviewError> {
        let fail = |source: ClassificationFailure| ProcessReviewError::Classification {
            step,
            source,
        };

        debug!(
            schema = schema.name(),
            prompt_bytes = prompt.len(),
            "Requesting structured output"
        );
        let value = self
            .gateway
            .generate_structured(prompt, schema)
            .await
            .map_err(|e| fail(e.into()))?;
        schema.validate(&value).map_err(|e| fail(e.into()))?;
        serde_json::from_value(value).map_err(|e| fail(e.into()))
    }

    /// Ask for free text and reject blank replies.
    async fn reply(&self, step: WorkflowStep, prompt: &str) -> Result<String, ProcessReviewError> {
        debug!(prompt_bytes = prompt.len(), "Requesting reply for {}", step);
        let text = self
            .gateway
            .generate(prompt)
            .await
            .map_err(|source| ProcessReviewError::Generation { step, source })?;

        if text.trim().is_empty() {
            return Err(ProcessReviewError::EmptyResponse { step });
        }

        self.conversation_logger.log(ConversationEvent::new(
            "response_generated",
            json!({
                "step": step.as_str(),
                "bytes": text.len(),
                "text": text,
            }),
        ));
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use review_reply_domain::{IssueType, Model, Sentiment, Tone, Urgency};
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A scripted answer for one gateway call
    #[derive(Debug)]
    enum Scripted {
        Structured(Value),
        Text(String),
        Error(GatewayError),
    }

    /// Gateway that returns scripted answers in order and records every prompt
    struct ScriptedGateway {
        model: Model,
        answers: Mutex<VecDeque<Scripted>>,
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl ScriptedGateway {
        fn new(answers: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                model: Model::default(),
                answers: Mutex::new(answers.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn next(&self) -> Scripted {
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .expect("gateway called more often than scripted")
        }

        /// (prompt, schema name) pairs in call order
        fn calls(&self) -> Vec<(String, Option<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
            self.calls.lock().unwrap().push((prompt.to_string(), None));
            match self.next() {
                Scripted::Text(t) => Ok(t),
                Scripted::Error(e) => Err(e),
                Scripted::Structured(v) => panic!("expected text answer, scripted {v}"),
            }
        }

        async fn generate_structured(
            &self,
            prompt: &str,
            schema: &StructuredSchema,
        ) -> Result<Value, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), Some(schema.name().to_string())));
            match self.next() {
                Scripted::Structured(v) => Ok(v),
                Scripted::Error(e) => Err(e),
                Scripted::Text(t) => panic!("expected structured answer, scripted {t}"),
            }
        }
    }

    /// Gateway that answers from keywords in the prompt, for concurrent runs
    struct KeywordGateway {
        model: Model,
    }

    #[async_trait]
    impl LlmGateway for KeywordGateway {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
            tokio::task::yield_now().await;
            if prompt.contains("support assistant") {
                Ok("We're sorry about the crash; a fix is on the way.".to_string())
            } else {
                Ok("Thank you so much! Please leave feedback on our website.".to_string())
            }
        }

        async fn generate_structured(
            &self,
            prompt: &str,
            schema: &StructuredSchema,
        ) -> Result<Value, GatewayError> {
            tokio::task::yield_now().await;
            Ok(match schema.name() {
                "SentimentSchema" if prompt.contains("crashes") => {
                    serde_json::json!({"sentiment": "negative"})
                }
                "SentimentSchema" => serde_json::json!({"sentiment": "positive"}),
                _ => serde_json::json!({"issue_type": "Bug", "tone": "angry", "urgency": "high"}),
            })
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<ConversationEvent>>,
    }

    impl RecordingLogger {
        fn types(&self) -> Vec<&'static str> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.event_type)
                .collect()
        }

        fn payload(&self, event_type: &str) -> Option<Value> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.event_type == event_type)
                .map(|e| e.payload.clone())
        }
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn sentiment(label: &str) -> Scripted {
        Scripted::Structured(serde_json::json!({ "sentiment": label }))
    }

    fn diagnosis(issue_type: &str, tone: &str, urgency: &str) -> Scripted {
        Scripted::Structured(serde_json::json!({
            "issue_type": issue_type,
            "tone": tone,
            "urgency": urgency,
        }))
    }

    #[tokio::test]
    async fn test_positive_review_skips_diagnosis() {
        let gateway = ScriptedGateway::new(vec![
            sentiment("positive"),
            Scripted::Text("Thank you! Would you share this on our website?".to_string()),
        ]);
        let use_case = ProcessReviewUseCase::new(gateway.clone());

        let outcome = use_case
            .execute(ProcessReviewInput::new(
                "This app is amazing, saved me hours!",
            ))
            .await
            .unwrap();

        assert_eq!(outcome.sentiment, Sentiment::Positive);
        assert!(outcome.diagnosis.is_none());
        assert!(!outcome.response.is_empty());
        assert_eq!(outcome.review, "This app is amazing, saved me hours!");

        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1.as_deref(), Some("SentimentSchema"));
        assert!(calls[1].1.is_none());
        assert!(calls[1].0.contains("leave feedback on our website"));
    }

    #[tokio::test]
    async fn test_negative_review_is_diagnosed_then_answered() {
        let gateway = ScriptedGateway::new(vec![
            sentiment("negative"),
            diagnosis("Bug", "frustrated", "high"),
            Scripted::Text("We're sorry, our team is fixing the crash.".to_string()),
        ]);
        let use_case = ProcessReviewUseCase::new(gateway.clone());

        let outcome = use_case
            .execute(ProcessReviewInput::new(
                "The app crashes every time I open it, so frustrating!",
            ))
            .await
            .unwrap();

        assert_eq!(outcome.sentiment, Sentiment::Negative);
        assert_eq!(
            outcome.diagnosis,
            Some(Diagnosis::new(IssueType::Bug, Tone::Frustrated, Urgency::High))
        );
        assert!(outcome.response.contains("fixing"));

        let calls = gateway.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].1.as_deref(), Some("DiagnosisSchema"));
        assert!(calls[2].0.contains("'Bug' issue"));
        assert!(calls[2].0.contains("sounded 'frustrated'"));
        assert!(calls[2].0.contains("urgency as 'high'"));
    }

    #[tokio::test]
    async fn test_empty_review_fails_before_any_model_call() {
        let gateway = ScriptedGateway::new(vec![]);
        let use_case = ProcessReviewUseCase::new(gateway.clone());

        let err = use_case
            .execute(ProcessReviewInput::new("   "))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sentiment_outside_enum_is_classification_error() {
        let gateway = ScriptedGateway::new(vec![sentiment("neutral")]);
        let use_case = ProcessReviewUseCase::new(gateway.clone());

        let err = use_case
            .execute(ProcessReviewInput::new("It's fine I guess"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Classification);
        assert_eq!(err.step(), Some(WorkflowStep::SentimentCheck));
        assert!(matches!(
            err,
            ProcessReviewError::Classification {
                source: ClassificationFailure::Schema(SchemaViolation::OutsideEnum { .. }),
                ..
            }
        ));
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_diagnosis_outside_enum_is_classification_error() {
        let gateway = ScriptedGateway::new(vec![
            sentiment("negative"),
            diagnosis("Crash", "frustrated", "high"),
        ]);
        let use_case = ProcessReviewUseCase::new(gateway.clone());

        let err = use_case
            .execute(ProcessReviewInput::new(
                "The app crashes every time I open it, so frustrating!",
            ))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Classification);
        match err {
            ProcessReviewError::Classification {
                step: WorkflowStep::Diagnosis,
                source: ClassificationFailure::Schema(SchemaViolation::OutsideEnum { field, value, .. }),
            } => {
                assert_eq!(field, "issue_type");
                assert_eq!(value, "Crash");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // no reply is generated after a failed diagnosis
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_diagnosis_gateway_failure_is_not_retried() {
        let gateway = ScriptedGateway::new(vec![
            sentiment("negative"),
            Scripted::Error(GatewayError::Timeout),
        ]);
        let use_case = ProcessReviewUseCase::new(gateway.clone());

        let err = use_case
            .execute(ProcessReviewInput::new("Support never answered my ticket"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Classification);
        assert_eq!(err.step(), Some(WorkflowStep::Diagnosis));
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_reply_failure_is_generation_error() {
        let gateway = ScriptedGateway::new(vec![
            sentiment("positive"),
            Scripted::Error(GatewayError::RequestFailed {
                status: 500,
                message: "upstream".to_string(),
            }),
        ]);
        let use_case = ProcessReviewUseCase::new(gateway);

        let err = use_case
            .execute(ProcessReviewInput::new("Lovely"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Generation);
        assert_eq!(err.step(), Some(WorkflowStep::PositiveResponse));
    }

    #[tokio::test]
    async fn test_blank_reply_is_rejected() {
        let gateway = ScriptedGateway::new(vec![
            sentiment("negative"),
            diagnosis("UX", "calm", "low"),
            Scripted::Text("  \n".to_string()),
        ]);
        let use_case = ProcessReviewUseCase::new(gateway);

        let err = use_case
            .execute(ProcessReviewInput::new("The menu is a bit hard to find"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProcessReviewError::EmptyResponse {
                step: WorkflowStep::NegativeResponse
            }
        ));
    }

    #[tokio::test]
    async fn test_conversation_events_follow_the_path() {
        let gateway = ScriptedGateway::new(vec![
            sentiment("negative"),
            diagnosis("Performance", "disappointed", "medium"),
            Scripted::Text("Sorry it feels slow.".to_string()),
        ]);
        let logger = Arc::new(RecordingLogger::default());
        let use_case =
            ProcessReviewUseCase::new(gateway).with_conversation_logger(logger.clone());

        use_case
            .execute(ProcessReviewInput::new("Takes forever to load"))
            .await
            .unwrap();

        assert_eq!(
            logger.types(),
            vec![
                "review_received",
                "sentiment_classified",
                "branch_selected",
                "diagnosis_completed",
                "response_generated",
            ]
        );
        assert_eq!(
            logger.payload("branch_selected"),
            Some(serde_json::json!({"branch": "run_diagnosis"}))
        );
        assert_eq!(
            logger.payload("sentiment_classified"),
            Some(serde_json::json!({"sentiment": "negative"}))
        );
    }

    #[tokio::test]
    async fn test_failure_is_logged() {
        let gateway = ScriptedGateway::new(vec![Scripted::Error(GatewayError::ConnectionError(
            "refused".to_string(),
        ))]);
        let logger = Arc::new(RecordingLogger::default());
        let use_case =
            ProcessReviewUseCase::new(gateway).with_conversation_logger(logger.clone());

        assert!(use_case
            .execute(ProcessReviewInput::new("hello"))
            .await
            .is_err());
        assert_eq!(logger.types(), vec!["review_received", "workflow_failed"]);
    }

    #[tokio::test]
    async fn test_concurrent_reviews_do_not_share_state() {
        let use_case = ProcessReviewUseCase::new(Arc::new(KeywordGateway {
            model: Model::default(),
        }));

        let (happy, unhappy) = tokio::join!(
            use_case.execute(ProcessReviewInput::new("This app is amazing, saved me hours!")),
            use_case.execute(ProcessReviewInput::new(
                "The app crashes every time I open it, so frustrating!"
            )),
        );

        let happy = happy.unwrap();
        let unhappy = unhappy.unwrap();
        assert_eq!(happy.sentiment, Sentiment::Positive);
        assert!(happy.diagnosis.is_none());
        assert_eq!(unhappy.sentiment, Sentiment::Negative);
        assert_eq!(unhappy.diagnosis.unwrap().issue_type, IssueType::Bug);
        assert!(unhappy.response.contains("fix"));
    }
}
