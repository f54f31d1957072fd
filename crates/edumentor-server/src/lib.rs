pub mod routes;
pub mod state;

use axum::Router;
use edumentor_core::config::AppConfig;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors_enabled = state.config.server.cors;

    let mut app = Router::new()
        .merge(routes::health_routes())
        .merge(routes::tutor_routes())
        .merge(routes::quiz_routes())
        .merge(routes::progress_routes())
        .with_state(state);

    app = app.layer(TraceLayer::new_for_http());

    if cors_enabled {
        app = app.layer(CorsLayer::permissive());
    }

    app
}

/// Start the HTTP server.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::new(config.clone());
    let router = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting {} on {}", config.server.service_name, addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use edumentor_core::error::Result as CoreResult;
    use edumentor_core::{ClientState, CompletionClient, CompletionService};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Always-available service returning a fixed completion.
    struct CannedService(&'static str);

    #[async_trait]
    impl CompletionService for CannedService {
        async fn complete(&self, _model: &str, prompt: &str) -> CoreResult<String> {
            if prompt == edumentor_core::prompts::SMOKE_PROMPT {
                return Ok("Hello".into());
            }
            Ok(self.0.to_string())
        }
    }

    fn offline_state() -> AppState {
        let config = AppConfig::default();
        let completion = CompletionClient::new(None, &config);
        AppState::with_completion(config, completion)
    }

    fn live_state(reply: &'static str) -> AppState {
        let config = AppConfig::default();
        let service: Arc<dyn CompletionService> = Arc::new(CannedService(reply));
        let completion = CompletionClient::new(Some(service), &config);
        AppState::with_completion(config, completion)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
        let resp = build_router(state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let state = offline_state();
        for uri in ["/", "/health"] {
            let (status, body) = send(&state, get(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "ok");
            assert_eq!(body["service"], "edumentor-api");
        }
    }

    #[tokio::test]
    async fn test_blank_question_rejected_and_not_recorded() {
        let state = offline_state();

        let (status, body) =
            send(&state, post_json("/api/tutor/query", r#"{"question":"   "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Question cannot be empty.");

        assert_eq!(state.aggregator.read().await.total_questions(), 0);
        assert_eq!(state.completion.state(), ClientState::Uninitialized);
    }

    #[tokio::test]
    async fn test_blank_topic_rejected_and_not_recorded() {
        let state = offline_state();

        let (status, body) = send(&state, post_json("/api/quiz/generate", r#"{"topic":""}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Topic cannot be empty.");

        assert_eq!(state.aggregator.read().await.total_quizzes(), 0);
    }

    #[tokio::test]
    async fn test_tutor_fallback_reply() {
        let state = offline_state();

        let (status, body) = send(
            &state,
            post_json("/api/tutor/query", r#"{"question":"  why does rain fall  "}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["answer"].as_str().unwrap().contains("'why does rain fall'"));
        assert_eq!(body["follow_up_suggestions"].as_array().unwrap().len(), 3);
        assert_eq!(state.aggregator.read().await.total_questions(), 1);
    }

    #[tokio::test]
    async fn test_quiz_fallback_single_item() {
        let state = offline_state();

        let (status, body) =
            send(&state, post_json("/api/quiz/generate", r#"{"topic":"optics"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 1);
        assert!(questions[0]["choices"].is_null());
        assert!(questions[0]["prompt"].as_str().unwrap().contains("optics"));
    }

    #[tokio::test]
    async fn test_live_tutor_reply_is_parsed() {
        let state = live_state("ANSWER: Solar panels in villages.\nFOLLOW_UP_1: How?\nFOLLOW_UP_2: Why?\nFOLLOW_UP_3: When?");

        let (status, body) = send(
            &state,
            post_json("/api/tutor/query", r#"{"question":"how do solar panels work"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Solar panels in villages.");
        assert_eq!(
            body["follow_up_suggestions"],
            serde_json::json!(["How?", "Why?", "When?"])
        );
    }

    #[tokio::test]
    async fn test_live_quiz_returns_three_items() {
        let state = live_state(
            "Q1: a?\nA1: 1\nE1: x\nQ2: b?\nA2: 2\nE2: y\nQ3: c?\nA3: 3\nE3: z",
        );

        let (status, body) =
            send(&state, post_json("/api/quiz/generate", r#"{"topic":"numbers"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[1]["prompt"], "b?");
        assert_eq!(questions[1]["answer"], "2");
    }

    #[tokio::test]
    async fn test_progress_empty_state_has_message() {
        let state = offline_state();

        let (status, body) = send(&state, get("/api/progress/summary")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["engagementScore"], 0);
        assert_eq!(body["streakDays"], 0);
        assert_eq!(body["masteredTopics"], serde_json::json!([]));
        assert_eq!(body["emptyMessage"], "Start asking questions to build your mastery!");
    }

    #[tokio::test]
    async fn test_progress_reflects_activity() {
        let state = offline_state();

        send(&state, post_json("/api/quiz/generate", r#"{"topic":"gravity"}"#)).await;
        send(
            &state,
            post_json("/api/tutor/query", r#"{"question":"what causes gravity"}"#),
        )
        .await;

        let (_, body) = send(&state, get("/api/progress/summary")).await;
        assert_eq!(body["masteredTopics"], serde_json::json!(["Gravity"]));
        assert_eq!(body["totalQuestions"], 1);
        assert_eq!(body["totalQuizzes"], 1);
        assert_eq!(body["topicsExplored"], 1);
        assert_eq!(body["streakDays"], 1);
        assert!(body.get("emptyMessage").is_none());
    }
}
