use super::*;

#[test]
fn default_config_matches_markup_host_ids() {
    let cfg = WidgetConfig::default();
    assert_eq!(cfg.form_id, "chat-form");
    assert_eq!(cfg.input_id, "user-input");
    assert_eq!(cfg.container_id, "chat-box");
    assert_eq!(cfg.indicator_id, "loading-indicator");
    assert_eq!(cfg.hidden_class, "hidden");
    assert_eq!(cfg.endpoint, "/chat");
}

#[test]
fn with_endpoint_overrides_only_endpoint() {
    let cfg = WidgetConfig::default().with_endpoint("/api/chat");
    assert_eq!(cfg.endpoint, "/api/chat");
    assert_eq!(cfg.form_id, "chat-form");
}
