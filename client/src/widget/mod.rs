//! Chat widget controller.
//!
//! DESIGN
//! ======
//! `ChatWidget` owns one handle per collaborator (input, transcript,
//! indicator, transport) and is constructed once per page. A submission is
//! split in two:
//!
//! - [`ChatWidget::accept_input`] runs synchronously inside the submit event:
//!   trim, render the user bubble, clear the input, show the indicator.
//! - [`ChatWidget::deliver`] is the async half: one request, one bot bubble,
//!   then the indicator is hidden by a drop guard whatever the outcome.
//!
//! Submissions are not serialized. Two overlapping `deliver` calls race and
//! their bot bubbles land in completion order.

pub mod host;

use crate::net::api::send_chat_message;
use crate::net::transport::Transport;
use host::{LoadingIndicator, MessageInput, MessageList, Role};

pub struct ChatWidget {
    input: Box<dyn MessageInput>,
    messages: Box<dyn MessageList>,
    indicator: Box<dyn LoadingIndicator>,
    transport: Box<dyn Transport>,
    endpoint: String,
}

impl ChatWidget {
    pub fn new(
        input: impl MessageInput + 'static,
        messages: impl MessageList + 'static,
        indicator: impl LoadingIndicator + 'static,
        transport: impl Transport + 'static,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            input: Box::new(input),
            messages: Box::new(messages),
            indicator: Box::new(indicator),
            transport: Box::new(transport),
            endpoint: endpoint.into(),
        }
    }

    /// Full submission: [`accept_input`](Self::accept_input) followed by
    /// [`deliver`](Self::deliver). No-op for blank input.
    pub async fn submit(&self) {
        if let Some(text) = self.accept_input() {
            self.deliver(&text).await;
        }
    }

    /// Synchronous half of a submission.
    ///
    /// Returns the trimmed text to send, or `None` when it is empty, in which
    /// case nothing is rendered and the input is left as is.
    pub fn accept_input(&self) -> Option<String> {
        let raw = self.input.value();
        let text = trim_input(&raw);
        if text.is_empty() {
            return None;
        }
        let text = text.to_owned();

        self.render(&text, Role::User);
        self.input.clear();
        self.indicator.show();
        self.messages.scroll_to_bottom();
        Some(text)
    }

    /// Asynchronous half of a submission: always renders exactly one bot
    /// bubble, then hides the indicator.
    pub async fn deliver(&self, text: &str) {
        let _pending = PendingRequest { indicator: self.indicator.as_ref(), messages: self.messages.as_ref() };

        match send_chat_message(self.transport.as_ref(), &self.endpoint, text).await {
            Ok(reply) => self.render(&reply, Role::Bot),
            Err(err) => {
                log::error!("Error: {err:?}");
                self.render(&err.user_message(), Role::Bot);
            }
        }
    }

    /// Append a bubble and keep the newest message in view.
    pub fn render(&self, text: &str, role: Role) {
        self.messages.append(text, role);
        self.messages.scroll_to_bottom();
    }
}

/// `str::trim`, except a byte-order mark also counts as whitespace.
fn trim_input(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Hides the indicator when a delivery finishes, including when its future is
/// dropped mid-flight.
struct PendingRequest<'a> {
    indicator: &'a dyn LoadingIndicator,
    messages: &'a dyn MessageList,
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        self.indicator.hide();
        self.messages.scroll_to_bottom();
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
