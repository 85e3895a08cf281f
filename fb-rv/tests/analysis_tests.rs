//! External analyzer tests against a stand-in completion service
//!
//! Tests cover:
//! - Request shape (model, messages, temperature, token budget, bearer auth)
//! - Plain, fenced, and partial JSON completions
//! - Fallback on non-success status, malformed content, empty completion,
//!   timeout, and unreachable service
//! - The fallback has the same shape whatever the failure

mod helpers;

use axum::http::StatusCode;
use fb_common::AiAction;
use fb_rv::analysis::{AnalysisResult, OpenAiAnalyzer, ReviewAnalyzer};
use fb_rv::validator::Rating;
use helpers::{completion_body, MockCompletionServer};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn rating(r: i64) -> Rating {
    Rating::new(r).unwrap()
}

fn assert_fallback(result: &AnalysisResult, text: &str) {
    assert_eq!(result.user_response, text);
    assert_eq!(result.action, AiAction::Neutral);
    assert!(
        result.summary.starts_with("Review analysis failed: "),
        "unexpected summary: {}",
        result.summary
    );
    assert!(result.summary.len() > "Review analysis failed: ".len());
}

// =============================================================================
// Successful completions
// =============================================================================

#[tokio::test]
async fn test_plain_json_completion() {
    let server = MockCompletionServer::replying(
        r#"{"user_response":"Thank you!","summary":"Very happy","action":"positive"}"#,
    )
    .await;
    let analyzer = server.analyzer(TIMEOUT);

    let result = analyzer.analyze("Great service!", rating(5)).await;

    assert_eq!(result.user_response, "Thank you!");
    assert_eq!(result.summary, "Very happy");
    assert_eq!(result.action, AiAction::Positive);
}

#[tokio::test]
async fn test_request_shape() {
    let server = MockCompletionServer::replying(
        r#"{"user_response":"ok","summary":"ok","action":"neutral"}"#,
    )
    .await;
    let analyzer = server.analyzer(TIMEOUT);

    analyzer.analyze("Average food", rating(3)).await;

    let requests = server.requests();
    assert_eq!(requests.len(), 1, "exactly one request, no retries");

    let request = &requests[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer sk-test"));
    assert_eq!(request.body["model"], "gpt-3.5-turbo");
    assert_eq!(request.body["max_tokens"], 200);
    assert!((request.body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);

    let messages = request.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert!(messages[0]["content"].as_str().unwrap().contains("user_response"));
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(
        messages[1]["content"],
        "Analyze this review (rating: 3/5): \"Average food\""
    );
}

#[tokio::test]
async fn test_fenced_completion() {
    let server = MockCompletionServer::replying(
        "```json\n{\"user_response\":\"Sorry!\",\"summary\":\"Cold food\",\"action\":\"negative\"}\n```",
    )
    .await;
    let analyzer = server.analyzer(TIMEOUT);

    let result = analyzer.analyze("Food was cold", rating(2)).await;

    assert_eq!(result.user_response, "Sorry!");
    assert_eq!(result.summary, "Cold food");
    assert_eq!(result.action, AiAction::Negative);
}

#[tokio::test]
async fn test_partial_completion_keeps_returned_fields() {
    let server = MockCompletionServer::replying(r#"{"summary":"Mixed feelings"}"#).await;
    let analyzer = server.analyzer(TIMEOUT);

    let result = analyzer.analyze("It was fine I guess", rating(3)).await;

    assert_eq!(result.user_response, "It was fine I guess");
    assert_eq!(result.summary, "Mixed feelings");
    assert_eq!(result.action, AiAction::Neutral);
}

// =============================================================================
// Failures fall back
// =============================================================================

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockCompletionServer::start(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"error":{"message":"boom"}}"#,
        Duration::ZERO,
    )
    .await;
    let analyzer = server.analyzer(TIMEOUT);

    let result = analyzer.analyze("Loved it", rating(5)).await;

    assert_fallback(&result, "Loved it");
    assert_eq!(result.summary, "Review analysis failed: OpenAI API error: 500");
    assert_eq!(server.requests().len(), 1, "no retry after failure");
}

#[tokio::test]
async fn test_malformed_content_falls_back() {
    let server = MockCompletionServer::replying("Sure! The review is positive.").await;
    let analyzer = server.analyzer(TIMEOUT);

    let result = analyzer.analyze("Loved it", rating(5)).await;
    assert_fallback(&result, "Loved it");
}

#[tokio::test]
async fn test_empty_completion_falls_back() {
    let server =
        MockCompletionServer::start(StatusCode::OK, r#"{"choices":[]}"#, Duration::ZERO).await;
    let analyzer = server.analyzer(TIMEOUT);

    let result = analyzer.analyze("Loved it", rating(4)).await;

    assert_fallback(&result, "Loved it");
    assert_eq!(result.summary, "Review analysis failed: No response from LLM");
}

#[tokio::test]
async fn test_timeout_falls_back() {
    let server = MockCompletionServer::start(
        StatusCode::OK,
        completion_body(r#"{"summary":"too late","action":"positive"}"#),
        Duration::from_secs(2),
    )
    .await;
    let analyzer = server.analyzer(Duration::from_millis(200));

    let result = analyzer.analyze("Slow", rating(4)).await;

    assert_fallback(&result, "Slow");
    assert_eq!(result.summary, "Review analysis failed: request timed out");
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let analyzer =
        OpenAiAnalyzer::new("sk-test", &format!("http://{}/v1", addr), "gpt-3.5-turbo", TIMEOUT)
            .unwrap();

    let result = analyzer.analyze("Nobody home", rating(1)).await;
    assert_fallback(&result, "Nobody home");
}

#[tokio::test]
async fn test_fallback_shape_independent_of_failure() {
    let text = "Same text every time";

    let server_error =
        MockCompletionServer::start(StatusCode::BAD_GATEWAY, "", Duration::ZERO).await;
    let malformed = MockCompletionServer::replying("{not json").await;
    let slow = MockCompletionServer::start(
        StatusCode::OK,
        completion_body("{}"),
        Duration::from_secs(2),
    )
    .await;

    let results = vec![
        server_error.analyzer(TIMEOUT).analyze(text, rating(2)).await,
        malformed.analyzer(TIMEOUT).analyze(text, rating(2)).await,
        slow.analyzer(Duration::from_millis(200)).analyze(text, rating(2)).await,
    ];

    for result in &results {
        assert_fallback(result, text);
    }
}
