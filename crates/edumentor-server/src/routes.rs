use crate::state::AppState;
use edumentor_analytics::EngagementSummary;
use edumentor_core::completion::DEFAULT_QUIZ_QUESTIONS;
use edumentor_core::types::{QuizItem, TutorReply};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

const EMPTY_MASTERY_MESSAGE: &str = "Start asking questions to build your mastery!";

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(detail: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "detail": detail })),
    )
}

// ── Health ──────────────────────────────────────────────────────────────

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": state.config.server.service_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ── Tutor ───────────────────────────────────────────────────────────────

pub fn tutor_routes() -> Router<AppState> {
    Router::new().route("/api/tutor/query", post(tutor_query))
}

#[derive(Debug, Deserialize)]
struct TutorRequest {
    question: String,
}

async fn tutor_query(
    State(state): State<AppState>,
    Json(req): Json<TutorRequest>,
) -> Result<Json<TutorReply>, ApiError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(bad_request("Question cannot be empty."));
    }

    state.aggregator.write().await.record_question(question);

    let reply = state.completion.tutor_completion(question).await;
    tracing::debug!(follow_ups = reply.follow_up_suggestions.len(), "Answered tutor query");
    Ok(Json(reply))
}

// ── Quiz ────────────────────────────────────────────────────────────────

pub fn quiz_routes() -> Router<AppState> {
    Router::new().route("/api/quiz/generate", post(quiz_generate))
}

#[derive(Debug, Deserialize)]
struct QuizRequest {
    topic: String,
}

#[derive(Debug, Serialize)]
struct QuizResponse {
    questions: Vec<QuizItem>,
}

async fn quiz_generate(
    State(state): State<AppState>,
    Json(req): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    let topic = req.topic.trim();
    if topic.is_empty() {
        return Err(bad_request("Topic cannot be empty."));
    }

    state.aggregator.write().await.record_quiz(topic);

    let questions = state
        .completion
        .quiz_completion(topic, DEFAULT_QUIZ_QUESTIONS)
        .await;
    tracing::debug!(count = questions.len(), "Generated quiz");
    Ok(Json(QuizResponse { questions }))
}

// ── Progress ────────────────────────────────────────────────────────────

pub fn progress_routes() -> Router<AppState> {
    Router::new().route("/api/progress/summary", get(progress_summary))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressResponse {
    #[serde(flatten)]
    summary: EngagementSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_message: Option<&'static str>,
}

async fn progress_summary(State(state): State<AppState>) -> Json<ProgressResponse> {
    let summary = state.aggregator.read().await.summary();
    let empty_message = summary
        .mastered_topics
        .is_empty()
        .then_some(EMPTY_MASTERY_MESSAGE);
    Json(ProgressResponse {
        summary,
        empty_message,
    })
}
