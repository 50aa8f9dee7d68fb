//! `POST /chat`: one question in, one answer out.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::services::chat::ChatServiceError;
use crate::state::AppState;

pub const NOT_INITIALIZED: &str = "Backend services are not initialized.";
pub const NO_MESSAGE: &str = "No message provided.";
pub const QUERY_FAILED: &str = "Failed to execute database query.";

#[derive(Debug, Default, Deserialize)]
struct ChatBody {
    #[serde(default)]
    message: Option<String>,
}

/// Any body that is not JSON with a non-empty string `message` is rejected
/// with 400.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(service) = state.chat.as_ref() else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, NOT_INITIALIZED);
    };

    let Some(message) = parse_message(&body) else {
        return error_response(StatusCode::BAD_REQUEST, NO_MESSAGE);
    };

    match service.reply(&message).await {
        Ok(response) => Json(json!({ "response": response })).into_response(),
        Err(e @ ChatServiceError::QueryFailed(_)) => {
            error!(error = %e, "chat: pipeline failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, QUERY_FAILED)
        }
    }
}

fn parse_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ChatBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
