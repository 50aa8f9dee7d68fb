use axum::body::Body;
use axum::http::Request;
use tower::ServiceExt;

use super::*;
use crate::routes::api_routes;
use crate::state::test_helpers;

async fn post_chat(state: AppState, body: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    let resp = api_routes(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn parse_message_requires_non_empty_string() {
    assert_eq!(parse_message(br#"{"message":"hi"}"#), Some("hi".to_owned()));
    assert_eq!(parse_message(br#"{"message":""}"#), None);
    assert_eq!(parse_message(br#"{"text":"hi"}"#), None);
    assert_eq!(parse_message(br#"{"message":42}"#), None);
    assert_eq!(parse_message(b"not json"), None);
}

#[tokio::test]
async fn uninitialized_backend_is_500() {
    let (status, body) = post_chat(AppState::default(), r#"{"message":"hi"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": NOT_INITIALIZED }));
}

#[tokio::test]
async fn missing_message_is_400() {
    let (status, body) = post_chat(test_helpers::scripted_state(&[]), "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], NO_MESSAGE);
}

#[tokio::test]
async fn successful_pipeline_returns_response() {
    let state = test_helpers::scripted_state(&[r#"{"STATE": {"$regex": "goa", "$options": "i"}}"#, "Goa got 3005 mm."]);
    let (status, body) = post_chat(state, r#"{"message":"How much rain in Goa?"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "response": "Goa got 3005 mm." }));
}

#[tokio::test]
async fn greeting_returns_direct_reply() {
    let state = test_helpers::scripted_state(&["{}"]);
    let (status, body) = post_chat(state, r#"{"message":"hello"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], crate::services::chat::GREETING_REPLY);
}

#[tokio::test]
async fn failing_query_is_500() {
    let state = test_helpers::scripted_state(&[r#"{"$where": "sleep(1)"}"#]);
    let (status, body) = post_chat(state, r#"{"message":"anything"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], QUERY_FAILED);
}
