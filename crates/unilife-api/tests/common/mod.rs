//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use unilife_content::application::compiler::{BUNDLED_STORY, bundled_story_book, compile_story_book};
use unilife_content::domain::story_book::StoryBook;
use unilife_core::clock::Clock;
use unilife_event_store::memory_event_repository::InMemoryEventRepository;
use unilife_test_support::FixedClock;

use unilife_api::routes;
use unilife_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock::default())
}

/// Application state shared by every router a test builds, so sessions
/// persist across requests.
pub struct TestApp {
    state: AppState,
}

impl TestApp {
    /// App with the bundled story and an empty in-memory event store.
    pub fn new() -> Self {
        Self::with_story(bundled_story_book().unwrap())
    }

    /// App with the bundled story but a different loader delay.
    pub fn with_loader_delay_ms(delay_ms: u64) -> Self {
        let source = BUNDLED_STORY.replace(
            "loader_delay_ms: 1500",
            &format!("loader_delay_ms: {delay_ms}"),
        );
        Self::with_story(compile_story_book(&source).unwrap())
    }

    fn with_story(story: StoryBook) -> Self {
        let state = AppState::new(
            fixed_clock(),
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(story),
        );
        Self { state }
    }

    /// The full app router. Uses the same route structure as `main.rs`.
    pub fn router(&self) -> Router {
        routes::app_router().with_state(self.state.clone())
    }

    /// POST /api/v1/sessions and return the new session id.
    pub async fn start_session(&self) -> String {
        let (status, json) =
            post_json(self.router(), "/api/v1/sessions", &serde_json::json!({})).await;
        assert_eq!(status, StatusCode::OK);
        json["session_id"].as_str().unwrap().to_owned()
    }

    /// POST a scan of `stage` and return the response body.
    pub async fn scan(&self, session_id: &str, stage: i64) -> serde_json::Value {
        let (status, json) = post_json(
            self.router(),
            &format!("/api/v1/sessions/{session_id}/events"),
            &serde_json::json!({ "type": "scan", "stage": stage }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        json
    }

    /// GET the session's progress view.
    pub async fn progress(&self, session_id: &str) -> serde_json::Value {
        let (status, json) =
            get_json(self.router(), &format!("/api/v1/sessions/{session_id}")).await;
        assert_eq!(status, StatusCode::OK);
        json
    }
}

/// Names of the commands in a response body, in order.
pub fn command_names(json: &serde_json::Value) -> Vec<String> {
    json["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["command"].as_str().unwrap().to_owned())
        .collect()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
