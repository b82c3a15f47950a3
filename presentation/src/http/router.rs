//! Route table and shared state

use super::handlers::{health_check, process_review};
use axum::Router;
use axum::routing::{get, post};
use review_reply_application::ProcessReviewUseCase;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub use_case: Arc<ProcessReviewUseCase>,
}

impl AppState {
    pub fn new(use_case: ProcessReviewUseCase) -> Self {
        Self {
            use_case: Arc::new(use_case),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/process-review", post(process_review))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use review_reply_application::{GatewayError, LlmGateway};
    use review_reply_domain::{Model, StructuredSchema};
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Answers every sentiment check with a fixed label.
    pub(crate) struct FixedGateway {
        model: Model,
        sentiment: &'static str,
        pub(crate) calls: AtomicUsize,
    }

    impl FixedGateway {
        pub(crate) fn new(sentiment: &'static str) -> Self {
            Self {
                model: Model::default(),
                sentiment,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for FixedGateway {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn generate(&self, _prompt: &str) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("Thank you for taking the time to write to us.".to_string())
        }

        async fn generate_structured(
            &self,
            _prompt: &str,
            schema: &StructuredSchema,
        ) -> Result<Value, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match schema.name() {
                "SentimentSchema" => Ok(json!({ "sentiment": self.sentiment })),
                _ => Ok(json!({
                    "issue_type": "Bug",
                    "tone": "frustrated",
                    "urgency": "high"
                })),
            }
        }
    }

    pub(crate) fn test_state(sentiment: &'static str) -> AppState {
        AppState::new(ProcessReviewUseCase::new(Arc::new(FixedGateway::new(
            sentiment,
        ))))
    }

    fn post_review(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/process-review")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(test_state("positive"))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"status": "healthy", "service": "review-reply"})
        );
    }

    #[tokio::test]
    async fn test_positive_review() {
        let body = json!({"review": "This app is amazing, saved me hours!"}).to_string();
        let response = build_router(test_state("positive"))
            .oneshot(post_review(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value = json_body(response).await;
        assert_eq!(value["review"], "This app is amazing, saved me hours!");
        assert_eq!(value["sentiment"], "positive");
        assert!(value["diagnosis"].is_null());
        assert!(!value["response"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_review() {
        let body =
            json!({"review": "The app crashes every time I open it, so frustrating!"}).to_string();
        let response = build_router(test_state("negative"))
            .oneshot(post_review(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value = json_body(response).await;
        assert_eq!(value["sentiment"], "negative");
        assert_eq!(
            value["diagnosis"],
            json!({"issue_type": "Bug", "tone": "frustrated", "urgency": "high"})
        );
        assert!(!value["response"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_review_is_rejected_before_model_call() {
        let gateway = Arc::new(FixedGateway::new("positive"));
        let state = AppState::new(ProcessReviewUseCase::new(gateway.clone()));

        let response = build_router(state)
            .oneshot(post_review(json!({"review": "   "}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json_body(response).await["detail"].is_string());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_unprocessable() {
        for body in ["{}", "not json", r#"{"review": 42}"#] {
            let response = build_router(test_state("positive"))
                .oneshot(post_review(body))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "body: {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_out_of_enum_sentiment_is_bad_gateway() {
        let response = build_router(test_state("neutral"))
            .oneshot(post_review(json!({"review": "It's okay"}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(json_body(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/process-review")
            .header(header::ORIGIN, "https://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = build_router(test_state("positive"))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = build_router(test_state("positive"))
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
