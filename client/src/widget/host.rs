//! Markup-host seams: the three page elements the widget drives.
//!
//! Implementations take `&self` because the page is shared between every
//! in-flight submission; DOM handles already have interior mutability.

use std::rc::Rc;

/// Which side of the conversation a bubble belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    /// CSS class selecting the bubble style.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::User => "user-message",
            Self::Bot => "bot-message",
        }
    }
}

/// Class shared by every bubble regardless of role.
pub const MESSAGE_CLASS: &str = "message";

/// Single-line text input.
pub trait MessageInput {
    fn value(&self) -> String;
    fn clear(&self);
}

/// Scrollable, append-only transcript container.
pub trait MessageList {
    /// Append one bubble. `text` is shown literally, never parsed as markup.
    fn append(&self, text: &str, role: Role);
    fn scroll_to_bottom(&self);
}

/// Busy indicator shown while a request is in flight.
pub trait LoadingIndicator {
    fn show(&self);
    fn hide(&self);
}

impl<T: MessageInput + ?Sized> MessageInput for Rc<T> {
    fn value(&self) -> String {
        (**self).value()
    }

    fn clear(&self) {
        (**self).clear();
    }
}

impl<T: MessageList + ?Sized> MessageList for Rc<T> {
    fn append(&self, text: &str, role: Role) {
        (**self).append(text, role);
    }

    fn scroll_to_bottom(&self) {
        (**self).scroll_to_bottom();
    }
}

impl<T: LoadingIndicator + ?Sized> LoadingIndicator for Rc<T> {
    fn show(&self) {
        (**self).show();
    }

    fn hide(&self) {
        (**self).hide();
    }
}
