use super::*;

#[test]
fn user_message_has_user_role() {
    let msg = Message::user("hello");
    assert_eq!(msg.role, "user");
    assert_eq!(msg.content, "hello");
}

#[test]
fn missing_api_key_display_names_variable() {
    let err = LlmError::MissingApiKey { var: "GROQ_API_KEY".into() };
    assert_eq!(err.to_string(), "missing API key: env var GROQ_API_KEY not set");
}

#[test]
fn api_response_display_includes_status() {
    let err = LlmError::ApiResponse { status: 429, body: "slow down".into() };
    assert_eq!(err.to_string(), "API response error: status 429");
}

#[test]
fn provider_body_only_for_non_empty_api_responses() {
    let err = LlmError::ApiResponse { status: 400, body: "{\"error\":\"bad model\"}".into() };
    assert_eq!(err.provider_body(), Some("{\"error\":\"bad model\"}"));
    assert_eq!(LlmError::ApiResponse { status: 502, body: String::new() }.provider_body(), None);
    assert_eq!(LlmError::ApiRequest("timeout".into()).provider_body(), None);
}
