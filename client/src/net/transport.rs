//! HTTP transport seam used by the widget.
//!
//! Client-side (hydrate): `GlooTransport` issues real requests via `gloo-net`.
//! Tests substitute their own implementations of [`Transport`].
//!
//! The transport reports every response it receives, whatever the status;
//! deciding between success and failure is left to the caller.

use std::rc::Rc;

/// Raw HTTP outcome: status code plus the full body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// The request could not be completed (network failure, body read failure).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Issues JSON POST requests. Single-threaded: futures are not `Send`.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    /// POST `body` to `path` with `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response could be obtained.
    async fn post_json(&self, path: &str, body: &str) -> Result<TransportResponse, TransportError>;
}

#[async_trait::async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for Rc<T> {
    async fn post_json(&self, path: &str, body: &str) -> Result<TransportResponse, TransportError> {
        (**self).post_json(path, body).await
    }
}

/// Browser `fetch` transport.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
#[async_trait::async_trait(?Send)]
impl Transport for GlooTransport {
    async fn post_json(&self, path: &str, body: &str) -> Result<TransportResponse, TransportError> {
        let resp = gloo_net::http::Request::post(path)
            .header("Content-Type", "application/json")
            .body(body.to_owned())
            .map_err(|e| TransportError::new(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| TransportError::new(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}
