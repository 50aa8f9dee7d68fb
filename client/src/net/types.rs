//! Wire-protocol payloads for `POST /chat` and the widget error type.
//!
//! DESIGN
//! ======
//! The success/failure split is decided by HTTP status alone; the body is
//! only decoded after the status has been checked. Error text is kept as a
//! plain string because it ends up verbatim in the transcript.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use super::transport::TransportError;

/// Fixed prefix of every error bubble shown to the user.
pub const APOLOGY_PREFIX: &str = "Sorry, something went wrong: ";

// =============================================================================
// PAYLOADS
// =============================================================================

/// Request body: the trimmed, non-empty user input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub message: String,
}

impl OutgoingMessage {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    response: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Decoded service reply, variant chosen by HTTP status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncomingResult {
    /// 2xx with `{"response": ...}`.
    Response(String),
    /// Non-2xx; text from `{"error": ...}` or synthesized from the status.
    Error(String),
}

impl IncomingResult {
    /// Decode a response body for the given status.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Transport`] when a 2xx body is not a valid
    /// `{"response": string}` document. Non-2xx bodies never fail to decode;
    /// an unusable error body falls back to [`http_error_message`].
    pub fn decode(status: u16, body: &str) -> Result<Self, ChatError> {
        if is_success(status) {
            let parsed: ResponseBody = serde_json::from_str(body).map_err(|e| ChatError::Transport(e.to_string()))?;
            return Ok(Self::Response(parsed.response));
        }
        Ok(Self::Error(remote_error_message(status, body)))
    }

    /// Convert into the widget's result type.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Remote`] for the `Error` variant.
    pub fn into_result(self) -> Result<String, ChatError> {
        match self {
            Self::Response(text) => Ok(text),
            Self::Error(message) => Err(ChatError::Remote(message)),
        }
    }
}

/// `true` for any 2xx status.
#[must_use]
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Message used when a failed response carries no usable `error` field.
#[must_use]
pub fn http_error_message(status: u16) -> String {
    format!("HTTP error! Status: {status}")
}

fn remote_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| http_error_message(status))
}

// =============================================================================
// ERROR
// =============================================================================

/// Failures of a single chat exchange. Both variants display as their bare
/// message so they can be appended to [`APOLOGY_PREFIX`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// The service answered with a non-2xx status.
    #[error("{0}")]
    Remote(String),

    /// The request did not complete or the body could not be decoded.
    #[error("{0}")]
    Transport(String),
}

impl ChatError {
    /// Text of the bot bubble rendered for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("{APOLOGY_PREFIX}{self}")
    }
}

impl From<TransportError> for ChatError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}
