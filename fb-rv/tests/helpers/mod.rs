//! Shared test helpers for fb-rv integration tests
//!
//! - In-memory review store
//! - Stand-in text-generation service (axum on 127.0.0.1:0)
//! - Analyzers with scripted behavior

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use fb_common::AiAction;
use fb_rv::analysis::{AnalysisResult, OpenAiAnalyzer, ReviewAnalyzer};
use fb_rv::db::{connect_in_memory, ReviewStore};
use fb_rv::validator::Rating;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fresh in-memory store plus its pool (close the pool to simulate an outage)
pub async fn memory_store() -> (ReviewStore, SqlitePool) {
    let pool = connect_in_memory()
        .await
        .expect("Should create in-memory database");
    (ReviewStore::new(pool.clone()), pool)
}

/// Request captured by the stand-in completion service
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Running stand-in for the chat completion endpoint
pub struct MockCompletionServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockCompletionServer {
    /// Serve `body` with `status` after `delay` for every request
    pub async fn start(status: StatusCode, body: impl Into<String>, delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body: body.into(),
            delay,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/chat/completions", post(handle_completion))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Should bind mock server");
        let addr = listener.local_addr().expect("Should have local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            requests,
        }
    }

    /// 200 with a completion whose message content is `content`
    pub async fn replying(content: &str) -> Self {
        Self::start(StatusCode::OK, completion_body(content), Duration::ZERO).await
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("Mock request log poisoned").clone()
    }

    pub fn analyzer(&self, timeout: Duration) -> OpenAiAnalyzer {
        OpenAiAnalyzer::new("sk-test", &self.base_url, "gpt-3.5-turbo", timeout)
            .expect("Should build analyzer")
    }
}

async fn handle_completion(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state
        .requests
        .lock()
        .expect("Mock request log poisoned")
        .push(CapturedRequest {
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

/// Chat completion response body carrying `content`
pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

/// Analyzer that panics on every call
pub struct PanickingAnalyzer;

#[async_trait]
impl ReviewAnalyzer for PanickingAnalyzer {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn analyze(&self, _text: &str, _rating: Rating) -> AnalysisResult {
        panic!("model exploded");
    }
}

/// Analyzer that counts calls and returns a fixed result
#[derive(Default)]
pub struct CountingAnalyzer {
    pub calls: AtomicUsize,
}

impl CountingAnalyzer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewAnalyzer for CountingAnalyzer {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn analyze(&self, text: &str, _rating: Rating) -> AnalysisResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        AnalysisResult {
            user_response: format!("Thanks for: {}", text),
            summary: "counted".to_string(),
            action: AiAction::Neutral,
        }
    }
}
