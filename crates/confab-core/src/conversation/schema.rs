//! Versioned persistence schema for conversation history.
//!
//! These DTOs are the explicit on-disk format; the domain model is converted
//! to and from them at the persistence boundary. Loading validates the schema
//! version and the store invariants, treating any mismatch as malformed data.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//!
//! ### History Version History
//! - **1.0.0**: Initial schema (id, title, placeholder flag, timestamps,
//!   lowercase roles)

use super::id::ConversationId;
use super::message::{ConversationMessage, MessageRole};
use super::model::Conversation;
use crate::error::{ConfabError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Current schema version for the history file.
pub const HISTORY_SCHEMA_VERSION: &str = "1.0.0";

/// Top-level persisted document: the full conversation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryFileV1 {
    /// The schema version of this data structure.
    pub schema_version: String,
    /// All conversations, most recently created first.
    pub conversations: Vec<ConversationV1>,
}

/// Persisted form of a single conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationV1 {
    /// Unique identifier (millisecond clock reading).
    pub id: i64,
    /// Human-readable display title.
    pub title: String,
    /// Whether the title is still the auto-generated placeholder.
    #[serde(default)]
    pub placeholder_title: bool,
    /// Timestamp when the conversation was created (ISO 8601 format).
    pub created_at: String,
    /// Message history in append order.
    pub messages: Vec<MessageV1>,
}

/// Persisted form of a single message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageV1 {
    pub role: MessageRole,
    pub content: String,
    /// Absent in data written by older clients; defaults to empty.
    #[serde(default)]
    pub timestamp: String,
}

impl HistoryFileV1 {
    /// Builds the persisted document from the in-memory conversation list.
    pub fn from_conversations(conversations: &[Conversation]) -> Self {
        Self {
            schema_version: HISTORY_SCHEMA_VERSION.to_string(),
            conversations: conversations.iter().map(ConversationV1::from).collect(),
        }
    }

    /// Converts the document back into domain conversations, validating the
    /// store invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema major version is unsupported or if the
    /// document violates id uniqueness. Callers treat any error here as the
    /// malformed-data case and degrade to an empty store.
    pub fn into_domain(self) -> Result<Vec<Conversation>> {
        let major = self.schema_version.split('.').next().unwrap_or("");
        if major != "1" {
            return Err(ConfabError::Serialization {
                format: "JSON".to_string(),
                message: format!("unsupported history schema version: {}", self.schema_version),
            });
        }

        let mut seen = HashSet::new();
        for conv in &self.conversations {
            if !seen.insert(conv.id) {
                return Err(ConfabError::Serialization {
                    format: "JSON".to_string(),
                    message: format!("duplicate conversation id: {}", conv.id),
                });
            }
        }

        Ok(self.conversations.into_iter().map(Conversation::from).collect())
    }
}

impl From<&Conversation> for ConversationV1 {
    fn from(conv: &Conversation) -> Self {
        Self {
            id: conv.id.as_millis(),
            title: conv.title.clone(),
            placeholder_title: conv.placeholder_title,
            created_at: conv.created_at.clone(),
            messages: conv
                .messages
                .iter()
                .map(|m| MessageV1 {
                    role: m.role,
                    content: m.content.clone(),
                    timestamp: m.timestamp.clone(),
                })
                .collect(),
        }
    }
}

impl From<ConversationV1> for Conversation {
    fn from(dto: ConversationV1) -> Self {
        Self {
            id: ConversationId::from_millis(dto.id),
            title: dto.title,
            placeholder_title: dto.placeholder_title,
            created_at: dto.created_at,
            messages: dto
                .messages
                .into_iter()
                .map(|m| ConversationMessage {
                    role: m.role,
                    content: m.content,
                    timestamp: m.timestamp,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::message::ConversationMessage;

    fn sample_conversation(id: i64) -> Conversation {
        let mut conv = Conversation::new(ConversationId::from_millis(id), format!("Chat {id}"), false);
        conv.push_message(ConversationMessage::user("Hello"));
        conv.push_message(ConversationMessage::assistant("Hi there!"));
        conv
    }

    #[test]
    fn test_round_trip_preserves_conversations() {
        let original = vec![sample_conversation(2), sample_conversation(1)];
        let file = HistoryFileV1::from_conversations(&original);

        let json = serde_json::to_string(&file).unwrap();
        let parsed: HistoryFileV1 = serde_json::from_str(&json).unwrap();
        let restored = parsed.into_domain().unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn test_unsupported_major_version_is_rejected() {
        let file = HistoryFileV1 {
            schema_version: "2.0.0".to_string(),
            conversations: Vec::new(),
        };
        assert!(file.into_domain().is_err());
    }

    #[test]
    fn test_minor_version_bump_is_accepted() {
        let file = HistoryFileV1 {
            schema_version: "1.3.0".to_string(),
            conversations: Vec::new(),
        };
        assert!(file.into_domain().is_ok());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let conv = sample_conversation(7);
        let file = HistoryFileV1::from_conversations(&[conv.clone(), conv]);
        assert!(file.into_domain().is_err());
    }

    #[test]
    fn test_missing_timestamp_defaults_to_empty() {
        let json = r#"{
            "schema_version": "1.0.0",
            "conversations": [{
                "id": 5,
                "title": "Old data",
                "created_at": "2024-01-01T00:00:00Z",
                "messages": [{"role": "user", "content": "hi"}]
            }]
        }"#;
        let parsed: HistoryFileV1 = serde_json::from_str(json).unwrap();
        let restored = parsed.into_domain().unwrap();
        assert_eq!(restored[0].messages[0].timestamp, "");
        assert!(!restored[0].placeholder_title);
    }
}
