//! In-memory conversation store with durable persistence.

use super::id::ConversationId;
use super::model::Conversation;
use super::schema::HistoryFileV1;
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Fixed key the conversation list is persisted under.
pub const HISTORY_KEY: &str = "conversations";

/// The in-memory conversation list plus its durable serialization.
///
/// The store owns the full conversation list (most recently created first)
/// and the active-conversation id. Persistence is deliberately forgiving in
/// both directions: a missing or malformed history loads as an empty store,
/// and a failed write is logged and otherwise ignored, so the chat flow is
/// never blocked by the storage layer.
///
/// Mutation happens only from the single logical thread of control; the
/// store provides no internal locking.
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active_id: Option<ConversationId>,
    storage: Arc<dyn KeyValueStore>,
}

impl ConversationStore {
    /// Creates an empty store backed by the given storage collaborator.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            conversations: Vec::new(),
            active_id: None,
            storage,
        }
    }

    /// Loads persisted state, replacing the in-memory list.
    ///
    /// Missing or malformed data degrades to the empty store; this method
    /// never fails. When history is present the most recently created
    /// conversation becomes active.
    pub fn load(&mut self) {
        let raw = match self.storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.reset();
                return;
            }
            Err(e) => {
                tracing::warn!("Cannot load conversations: {e}");
                self.reset();
                return;
            }
        };

        let conversations = match serde_json::from_str::<HistoryFileV1>(&raw) {
            Ok(file) => file.into_domain(),
            Err(e) => Err(e.into()),
        };

        match conversations {
            Ok(conversations) => {
                self.active_id = conversations.first().map(|c| c.id);
                self.conversations = conversations;
            }
            Err(e) => {
                tracing::warn!("Cannot load conversations: {e}");
                self.reset();
            }
        }
    }

    /// Serializes the full conversation list to durable storage.
    ///
    /// A storage failure is logged as a warning and otherwise ignored;
    /// persistence must never block the in-memory flow.
    pub fn save(&self) {
        let file = HistoryFileV1::from_conversations(&self.conversations);
        let json = match serde_json::to_string(&file) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Cannot save conversations: {e}");
                return;
            }
        };

        if let Err(e) = self.storage.set(HISTORY_KEY, &json) {
            tracing::warn!("Cannot save conversations: {e}");
        }
    }

    /// Returns the conversations in store order (most recently created first).
    pub fn list(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Returns the conversation with the given id, if present.
    pub fn find(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Mutable variant of [`ConversationStore::find`].
    pub fn find_mut(&mut self, id: ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    /// Inserts a freshly created conversation at the front of the list.
    pub fn insert_front(&mut self, conversation: Conversation) {
        self.conversations.insert(0, conversation);
    }

    /// Sets the active conversation.
    ///
    /// Returns `false` (leaving the previous selection untouched) when the
    /// id does not resolve to a stored conversation.
    pub fn set_active(&mut self, id: ConversationId) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.active_id = Some(id);
        true
    }

    /// Returns the active conversation id, if any.
    pub fn active_id(&self) -> Option<ConversationId> {
        self.active_id
    }

    /// Resolves the active conversation.
    ///
    /// A stale active id (one that no longer resolves) behaves as "none".
    pub fn active(&self) -> Option<&Conversation> {
        self.active_id.and_then(|id| self.find(id))
    }

    /// Mutable variant of [`ConversationStore::active`].
    pub fn active_mut(&mut self) -> Option<&mut Conversation> {
        let id = self.active_id?;
        self.find_mut(id)
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    fn reset(&mut self) {
        self.conversations = Vec::new();
        self.active_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::message::ConversationMessage;
    use crate::error::{ConfabError, Result};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory key-value store with switchable failure injection.
    struct MockKeyValueStore {
        entries: Mutex<HashMap<String, String>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl MockKeyValueStore {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
                fail_reads: false,
                fail_writes: false,
            }
        }

        fn with_value(value: &str) -> Self {
            let store = Self::new();
            store
                .entries
                .lock()
                .unwrap()
                .insert(HISTORY_KEY.to_string(), value.to_string());
            store
        }

        fn failing_writes() -> Self {
            Self {
                fail_writes: true,
                ..Self::new()
            }
        }

        fn failing_reads() -> Self {
            Self {
                fail_reads: true,
                ..Self::new()
            }
        }
    }

    impl KeyValueStore for MockKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(ConfabError::storage("simulated read failure"));
            }
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(ConfabError::storage("simulated quota exceeded"));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn conversation(id: i64, title: &str) -> Conversation {
        let mut conv = Conversation::new(ConversationId::from_millis(id), title, false);
        conv.push_message(ConversationMessage::user("Hello"));
        conv.push_message(ConversationMessage::assistant("Hi there!"));
        conv
    }

    #[test]
    fn test_load_missing_data_yields_empty_store() {
        let mut store = ConversationStore::new(Arc::new(MockKeyValueStore::new()));
        store.load();
        assert!(store.is_empty());
        assert_eq!(store.active_id(), None);
    }

    #[test]
    fn test_load_malformed_json_yields_empty_store() {
        let mut store =
            ConversationStore::new(Arc::new(MockKeyValueStore::with_value("{not json")));
        store.load();
        assert!(store.is_empty());
        assert_eq!(store.active_id(), None);
    }

    #[test]
    fn test_load_unsupported_schema_yields_empty_store() {
        let raw = r#"{"schema_version": "9.0.0", "conversations": []}"#;
        let mut store = ConversationStore::new(Arc::new(MockKeyValueStore::with_value(raw)));
        store.load();
        assert!(store.is_empty());
        assert_eq!(store.active_id(), None);
    }

    #[test]
    fn test_load_read_failure_yields_empty_store() {
        let mut store = ConversationStore::new(Arc::new(MockKeyValueStore::failing_reads()));
        store.load();
        assert!(store.is_empty());
        assert_eq!(store.active_id(), None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let storage = Arc::new(MockKeyValueStore::new());

        let mut store = ConversationStore::new(storage.clone());
        store.insert_front(conversation(1, "Oldest"));
        store.insert_front(conversation(2, "Newest"));
        store.save();

        let mut restored = ConversationStore::new(storage);
        restored.load();

        assert_eq!(restored.list(), store.list());
        // Reload policy: most recently created conversation is active.
        assert_eq!(restored.active_id(), Some(ConversationId::from_millis(2)));
    }

    #[test]
    fn test_save_failure_does_not_disturb_memory() {
        let mut store = ConversationStore::new(Arc::new(MockKeyValueStore::failing_writes()));
        store.insert_front(conversation(1, "Kept"));
        store.set_active(ConversationId::from_millis(1));

        store.save();

        assert_eq!(store.len(), 1);
        assert_eq!(store.active_id(), Some(ConversationId::from_millis(1)));
    }

    #[test]
    fn test_set_active_unknown_id_is_refused() {
        let mut store = ConversationStore::new(Arc::new(MockKeyValueStore::new()));
        store.insert_front(conversation(1, "Only"));
        store.set_active(ConversationId::from_millis(1));

        assert!(!store.set_active(ConversationId::from_millis(99)));
        assert_eq!(store.active_id(), Some(ConversationId::from_millis(1)));
    }

    #[test]
    fn test_active_on_empty_store_is_none() {
        let store = ConversationStore::new(Arc::new(MockKeyValueStore::new()));
        assert!(store.active().is_none());
    }
}
