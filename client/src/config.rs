//! Widget configuration: element ids of the markup host and the endpoint.

/// Path of the chat endpoint on the serving origin.
pub const DEFAULT_CHAT_ENDPOINT: &str = "/chat";

/// CSS class that hides the loading indicator.
pub const DEFAULT_HIDDEN_CLASS: &str = "hidden";

/// Element ids and paths the widget binds to at mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub form_id: String,
    pub input_id: String,
    pub container_id: String,
    pub indicator_id: String,
    pub hidden_class: String,
    pub endpoint: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            form_id: "chat-form".to_owned(),
            input_id: "user-input".to_owned(),
            container_id: "chat-box".to_owned(),
            indicator_id: "loading-indicator".to_owned(),
            hidden_class: DEFAULT_HIDDEN_CLASS.to_owned(),
            endpoint: DEFAULT_CHAT_ENDPOINT.to_owned(),
        }
    }
}

impl WidgetConfig {
    /// Override the chat endpoint path.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
