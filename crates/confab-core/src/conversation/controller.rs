//! Conversation lifecycle: creation, selection, title derivation.

use super::id::{ConversationId, ConversationIdAllocator};
use super::model::Conversation;
use super::store::ConversationStore;
use chrono::{DateTime, Utc};

/// Maximum number of characters a derived title keeps from its seed text.
pub const TITLE_MAX_CHARS: usize = 40;

/// Creates and selects conversations on top of a [`ConversationStore`].
///
/// The controller owns the store and the id allocator; all conversation
/// lifecycle mutations flow through it so the store invariants (unique ids,
/// valid active id, persisted-after-mutation) hold at every return point.
pub struct ConversationController {
    store: ConversationStore,
    allocator: ConversationIdAllocator,
}

impl ConversationController {
    /// Wraps a store, seeding the id allocator past any loaded conversation
    /// so restored histories never collide with new allocations.
    pub fn new(store: ConversationStore) -> Self {
        let allocator = ConversationIdAllocator::seeded(store.list().iter().map(|c| c.id));
        Self { store, allocator }
    }

    /// Creates a new, empty conversation, inserts it at the front of the
    /// list, makes it active, and persists.
    ///
    /// The title is a bounded prefix of `seed` when real text is given,
    /// otherwise a time-stamped placeholder that the first user message may
    /// later overwrite.
    pub fn create_conversation(&mut self, seed: Option<&str>) -> ConversationId {
        let id = self.allocator.allocate();

        let seed = seed.map(str::trim).filter(|s| !s.is_empty());
        let (title, placeholder) = match seed {
            Some(text) => (derive_title(text), false),
            None => (placeholder_title(id), true),
        };

        tracing::debug!("Creating conversation {id} ({title})");

        self.store.insert_front(Conversation::new(id, title, placeholder));
        self.store.set_active(id);
        self.store.save();

        id
    }

    /// Returns the active conversation.
    ///
    /// An empty store or a stale active id both behave as "none".
    pub fn get_active(&self) -> Option<&Conversation> {
        self.store.active()
    }

    /// Mutable variant of [`ConversationController::get_active`].
    pub fn get_active_mut(&mut self) -> Option<&mut Conversation> {
        self.store.active_mut()
    }

    /// Selects a conversation by id.
    ///
    /// Unknown ids are ignored; selection is session-local state and is not
    /// itself persisted (reload reselects the most recent conversation).
    pub fn select_conversation(&mut self, id: ConversationId) {
        if !self.store.set_active(id) {
            tracing::debug!("Ignoring selection of unknown conversation {id}");
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }
}

/// Truncates seed text to a bounded prefix for display.
pub fn derive_title(text: &str) -> String {
    text.chars().take(TITLE_MAX_CHARS).collect()
}

/// Builds the auto-generated title for a conversation created without seed
/// text. Derived from the creation instant (the id), so placeholders are
/// pairwise distinct.
fn placeholder_title(id: ConversationId) -> String {
    let time = DateTime::<Utc>::from_timestamp_millis(id.as_millis())
        .map(|t| t.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| id.to_string());
    format!("New chat {time}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::storage::KeyValueStore;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct MockKeyValueStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MockKeyValueStore {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }
    }

    impl KeyValueStore for MockKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn controller() -> ConversationController {
        ConversationController::new(ConversationStore::new(Arc::new(MockKeyValueStore::new())))
    }

    #[test]
    fn test_created_ids_are_pairwise_distinct() {
        let mut controller = controller();
        let mut ids: Vec<_> = (0..100)
            .map(|_| controller.create_conversation(None))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_create_inserts_front_and_activates() {
        let mut controller = controller();
        let first = controller.create_conversation(Some("first"));
        let second = controller.create_conversation(Some("second"));

        assert_eq!(controller.store().list()[0].id, second);
        assert_eq!(controller.store().list()[1].id, first);
        assert_eq!(controller.get_active().unwrap().id, second);
        assert!(controller.get_active().unwrap().messages.is_empty());
    }

    #[test]
    fn test_seeded_title_is_truncated_to_forty_chars() {
        let mut controller = controller();
        controller.create_conversation(Some("Hello world, this is a long message that keeps going"));
        let title = &controller.get_active().unwrap().title;
        assert_eq!(title.chars().count(), 40);
        assert_eq!(title, "Hello world, this is a long message that");
        assert!(!controller.get_active().unwrap().placeholder_title);
    }

    #[test]
    fn test_title_truncation_respects_char_boundaries() {
        let mut controller = controller();
        let seed = "ねこ".repeat(30);
        controller.create_conversation(Some(&seed));
        let title = &controller.get_active().unwrap().title;
        assert_eq!(title.chars().count(), 40);
    }

    #[test]
    fn test_blank_seed_yields_placeholder_title() {
        let mut controller = controller();
        controller.create_conversation(Some("   "));
        let conv = controller.get_active().unwrap();
        assert!(conv.placeholder_title);
        assert!(conv.title.starts_with("New chat "));
    }

    #[test]
    fn test_placeholder_titles_are_distinct() {
        let mut controller = controller();
        controller.create_conversation(None);
        let first = controller.get_active().unwrap().title.clone();
        controller.create_conversation(None);
        let second = controller.get_active().unwrap().title.clone();
        assert_ne!(first, second);
    }

    #[test]
    fn test_select_unknown_id_is_a_no_op() {
        let mut controller = controller();
        let id = controller.create_conversation(Some("kept"));
        controller.select_conversation(ConversationId::from_millis(1));
        assert_eq!(controller.get_active().unwrap().id, id);
    }

    #[test]
    fn test_select_switches_active_conversation() {
        let mut controller = controller();
        let first = controller.create_conversation(Some("first"));
        controller.create_conversation(Some("second"));

        controller.select_conversation(first);
        assert_eq!(controller.get_active().unwrap().id, first);
    }

    #[test]
    fn test_get_active_on_empty_store_is_none() {
        let controller = controller();
        assert!(controller.get_active().is_none());
    }

    #[test]
    fn test_create_persists_immediately() {
        let storage = Arc::new(MockKeyValueStore::new());
        let mut controller =
            ConversationController::new(ConversationStore::new(storage.clone()));
        controller.create_conversation(Some("durable"));

        let mut restored = ConversationStore::new(storage);
        restored.load();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.list()[0].title, "durable");
    }
}
