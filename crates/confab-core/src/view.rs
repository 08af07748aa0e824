//! Pure view projections for the presentation shell.
//!
//! The shell re-derives its entire view from these projections after every
//! mutation; no incremental diffing contract exists.

use crate::conversation::{Conversation, ConversationId, ConversationStore, MessageRole};
use serde::{Deserialize, Serialize};

/// One row of the conversation history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: ConversationId,
    pub title: String,
    pub is_active: bool,
}

/// One renderable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub role: MessageRole,
    pub content: String,
}

/// The renderable state of the message pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TranscriptView {
    /// No active conversation; render the empty-state marker.
    Empty,
    /// An active conversation's messages plus the typing indicator state.
    Conversation {
        messages: Vec<MessageView>,
        typing: bool,
    },
}

/// Projects the history list: one entry per conversation, in store order.
pub fn project_history(store: &ConversationStore) -> Vec<HistoryEntry> {
    let active = store.active_id();
    store
        .list()
        .iter()
        .map(|conv| HistoryEntry {
            id: conv.id,
            title: conv.title.clone(),
            is_active: Some(conv.id) == active,
        })
        .collect()
}

/// Projects the message pane for a conversation (or the empty state).
///
/// System messages are part of the request context but are never rendered,
/// so they are filtered out here. The typing indicator is presentation-only
/// state and rides along with the projection.
pub fn project_transcript(conversation: Option<&Conversation>, typing: bool) -> TranscriptView {
    match conversation {
        None => TranscriptView::Empty,
        Some(conv) => TranscriptView::Conversation {
            messages: conv
                .messages
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .map(|m| MessageView {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect(),
            typing,
        },
    }
}
