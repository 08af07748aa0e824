//! Conversation domain model.

use super::id::ConversationId;
use super::message::ConversationMessage;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single conversation: an ordered, append-only message history with a
/// display title.
///
/// The title is derived once: either from the first real user text, or as a
/// time-stamped placeholder when the conversation is created empty. A
/// placeholder title may be overwritten exactly once, by [`Conversation::retitle`],
/// when the first user message arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier, ordered by creation time.
    pub id: ConversationId,
    /// Human-readable display title.
    pub title: String,
    /// Whether `title` is still the auto-generated placeholder.
    pub placeholder_title: bool,
    /// Timestamp when the conversation was created (ISO 8601 format).
    pub created_at: String,
    /// Message history in strict chronological append order.
    pub messages: Vec<ConversationMessage>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new(id: ConversationId, title: impl Into<String>, placeholder_title: bool) -> Self {
        Self {
            id,
            title: title.into(),
            placeholder_title,
            created_at: Utc::now().to_rfc3339(),
            messages: Vec::new(),
        }
    }

    /// Appends a message to the history.
    pub fn push_message(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    /// Replaces a placeholder title with a derived one.
    ///
    /// After this call the title is considered derived and is never changed
    /// again.
    pub fn retitle(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.placeholder_title = false;
    }

    /// Returns the most recent message, if any.
    pub fn last_message(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }
}
