//! Networking for the `/chat` wire protocol.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the HTTP seam (a `gloo-net` implementation in the browser,
//! test doubles elsewhere), `types` defines the JSON payloads and the widget
//! error type, and `api` runs one request/response exchange end to end.

pub mod api;
pub mod transport;
pub mod types;
