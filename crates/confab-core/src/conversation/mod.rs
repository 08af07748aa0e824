//! Conversation domain module.
//!
//! This module contains the conversation-related domain models, the
//! persistence schema, and the store/controller logic.
//!
//! # Module Structure
//!
//! - `id`: Identifier newtype and monotonic allocation
//! - `message`: Message types (`MessageRole`, `ConversationMessage`)
//! - `model`: Core conversation entity (`Conversation`)
//! - `schema`: Versioned persistence DTOs
//! - `store`: In-memory list plus durable serialization (`ConversationStore`)
//! - `controller`: Creation, selection, title derivation (`ConversationController`)

mod controller;
mod id;
mod message;
mod model;
mod schema;
mod store;

// Re-export public API
pub use controller::{ConversationController, TITLE_MAX_CHARS, derive_title};
pub use id::{ConversationId, ConversationIdAllocator};
pub use message::{ConversationMessage, MessageRole};
pub use model::Conversation;
pub use schema::{ConversationV1, HISTORY_SCHEMA_VERSION, HistoryFileV1, MessageV1};
pub use store::{ConversationStore, HISTORY_KEY};
