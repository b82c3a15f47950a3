//! Request handlers

use super::dto::{ReviewInput, ReviewOutput};
use super::error::ApiError;
use super::router::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use review_reply_application::ProcessReviewInput;
use serde_json::{Value, json};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "review-reply"
    }))
}

/// `POST /process-review`
pub async fn process_review(
    State(state): State<AppState>,
    payload: Result<Json<ReviewInput>, JsonRejection>,
) -> Result<Json<ReviewOutput>, ApiError> {
    let Json(input) = payload?;
    let outcome = state
        .use_case
        .execute(ProcessReviewInput::new(input.review))
        .await?;
    Ok(Json(outcome.into()))
}
