//! HTTP surface tests driven through the router without a socket.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::*;
use docs_agent::kernel::{MockCompletion, MockFileSearch};
use docs_agent::server::{build_app, AppState};
use docs_agent::AgentAnswer;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(file_search: MockFileSearch, completion: MockCompletion) -> Router {
    let (agent, _test_deps) = agent_with(file_search, completion);
    build_app(AppState::new(Arc::new(agent)))
}

async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_configuration() {
    let response = app(MockFileSearch::new(), MockCompletion::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["vectorStore"], "ckodocs");
    assert_eq!(body["providerConfigured"], true);
}

#[tokio::test]
async fn chat_returns_answer_with_metadata() {
    let app = app(
        MockFileSearch::new().with_response(annotated_response("Refunds settle in days.", &["refunds.md"])),
        MockCompletion::new().with_reply("Refunds settle within a few days."),
    );

    let (status, body) = post_chat(app, json!({"message": "How long do refunds take?"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Refunds settle within a few days.");
    assert_eq!(body["metadata"]["context"][0]["source"], "refunds.md");
    assert!(body["metadata"].get("retrievalError").is_none());
    assert!(body.get("rawProviderResponse").is_some());
}

#[tokio::test]
async fn chat_reports_retrieval_error_type() {
    let app = app(
        MockFileSearch::new().failing("search down"),
        MockCompletion::new().with_reply("fallback").with_reply("General answer."),
    );

    let (status, body) = post_chat(app, json!({"message": "Payment methods?"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["retrievalError"]["type"], "VectorSearchError");
}

#[tokio::test]
async fn chat_failure_is_still_ok_with_apology() {
    let app = app(
        MockFileSearch::new().failing("bad key"),
        MockCompletion::new().failing("bad key"),
    );

    let (status, body) = post_chat(app, json!({"message": "Payment methods?"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], AgentAnswer::APOLOGY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let app = app(MockFileSearch::new(), MockCompletion::new());

    let (status, body) = post_chat(app, json!({"message": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "message must not be empty");
}
