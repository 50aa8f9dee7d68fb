use std::cell::RefCell;

use futures::executor::block_on;

use super::*;
use crate::net::transport::{TransportError, TransportResponse};

struct CannedTransport {
    reply: Result<TransportResponse, TransportError>,
    requests: RefCell<Vec<(String, String)>>,
}

impl CannedTransport {
    fn new(reply: Result<TransportResponse, TransportError>) -> Self {
        Self { reply, requests: RefCell::new(Vec::new()) }
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for CannedTransport {
    async fn post_json(&self, path: &str, body: &str) -> Result<TransportResponse, TransportError> {
        self.requests
            .borrow_mut()
            .push((path.to_owned(), body.to_owned()));
        self.reply.clone()
    }
}

#[test]
fn posts_message_json_to_endpoint() {
    let transport = CannedTransport::new(Ok(TransportResponse::new(200, r#"{"response":"Hello"}"#)));
    let reply = block_on(send_chat_message(&transport, "/chat", "Hi")).unwrap();
    assert_eq!(reply, "Hello");

    let requests = transport.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "/chat");
    let body: serde_json::Value = serde_json::from_str(&requests[0].1).unwrap();
    assert_eq!(body, serde_json::json!({ "message": "Hi" }));
}

#[test]
fn remote_error_carries_error_field() {
    let transport = CannedTransport::new(Ok(TransportResponse::new(500, r#"{"error":"overloaded"}"#)));
    let err = block_on(send_chat_message(&transport, "/chat", "Hi")).unwrap_err();
    assert_eq!(err, ChatError::Remote("overloaded".to_owned()));
}

#[test]
fn transport_failure_carries_underlying_message() {
    let transport = CannedTransport::new(Err(TransportError::new("Network down")));
    let err = block_on(send_chat_message(&transport, "/chat", "Hi")).unwrap_err();
    assert_eq!(err, ChatError::Transport("Network down".to_owned()));
}

#[test]
fn message_with_quotes_is_escaped_in_payload() {
    let transport = CannedTransport::new(Ok(TransportResponse::new(200, r#"{"response":"ok"}"#)));
    block_on(send_chat_message(&transport, "/chat", r#"say "hi""#)).unwrap();
    let requests = transport.requests.borrow();
    let body: serde_json::Value = serde_json::from_str(&requests[0].1).unwrap();
    assert_eq!(body["message"], r#"say "hi""#);
}
