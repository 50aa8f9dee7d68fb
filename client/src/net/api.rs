//! One `/chat` exchange: encode, send, check status, decode.
//!
//! ERROR HANDLING
//! ==============
//! Every failure along the chain collapses into a [`ChatError`] so the widget
//! has a single place to turn it into a transcript entry.

use super::transport::Transport;
use super::types::{ChatError, IncomingResult, OutgoingMessage};

/// Send `text` to `endpoint` and return the service's reply text.
///
/// Suspends twice: once for the request and once inside the transport while
/// the body is read.
///
/// # Errors
///
/// Returns [`ChatError::Remote`] for a non-2xx status and
/// [`ChatError::Transport`] when the request fails or a success body cannot
/// be decoded.
pub async fn send_chat_message(transport: &dyn Transport, endpoint: &str, text: &str) -> Result<String, ChatError> {
    let payload =
        serde_json::to_string(&OutgoingMessage::new(text)).map_err(|e| ChatError::Transport(e.to_string()))?;
    let resp = transport.post_json(endpoint, &payload).await?;
    log::debug!("chat response status {}", resp.status);
    IncomingResult::decode(resp.status, &resp.body)?.into_result()
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
