//! # ingres-chat-client
//!
//! Browser chat widget for the INGRES groundwater assistant.
//!
//! The widget core (`widget`) only talks to its collaborators through the
//! traits in `widget::host` and `net::transport`, so it runs unchanged in
//! native unit tests. The `hydrate` feature adds the `web-sys` DOM bindings,
//! the `gloo-net` transport and the wasm entry point in `dom`.

pub mod config;
#[cfg(feature = "hydrate")]
pub mod dom;
pub mod net;
pub mod widget;
