//! In-memory conversation store.
//!
//! Owns the mapping from thread identifier to ordered message history.
//! State is process-local and volatile, and it grows without bound:
//! nothing expires by age or size. The sanctioned remedies are
//! [`ConversationStore::delete`] and [`ConversationStore::clear_all`].

use dashmap::DashMap;

use crate::chat::conversation::Conversation;
use crate::chat::errors::{ChatError, ChatResult};
use crate::chat::ids::ConversationId;
use crate::chat::message::ChatMessage;

/// Thread-safe map of conversations keyed by id.
///
/// Each conversation is either absent or present; once present it
/// accumulates turns until it is deleted. Identifiers are never recycled:
/// deleting an id and calling [`ConversationStore::create`] again always
/// yields a fresh identifier.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: DashMap<ConversationId, Conversation>,
}

impl ConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            conversations: DashMap::new(),
        }
    }

    /// Register an empty conversation under a fresh identifier.
    ///
    /// Never fails; returns the new identifier.
    #[must_use]
    pub fn create(&self) -> ConversationId {
        let id = ConversationId::new();
        self.conversations.insert(id, Conversation::new(id));
        id
    }

    /// Append a turn to an existing conversation.
    ///
    /// Stamps the message with the append instant (overwriting any
    /// caller-supplied timestamp), pushes it, refreshes `updated_at`, and
    /// returns the stored copy. An unknown id leaves the store untouched.
    ///
    /// # Errors
    /// [`ChatError::ConversationNotFound`] if `id` is not registered.
    pub fn append(&self, id: ConversationId, message: ChatMessage) -> ChatResult<ChatMessage> {
        let mut conversation = self
            .conversations
            .get_mut(&id)
            .ok_or(ChatError::ConversationNotFound(id))?;
        Ok(conversation.apply(message))
    }

    /// Full ordered history of a conversation, as an owned snapshot.
    ///
    /// Later appends are not reflected in a snapshot already handed out.
    ///
    /// # Errors
    /// [`ChatError::ConversationNotFound`] if `id` is not registered.
    pub fn read(&self, id: ConversationId) -> ChatResult<Vec<ChatMessage>> {
        let conversation = self
            .conversations
            .get(&id)
            .ok_or(ChatError::ConversationNotFound(id))?;
        Ok(conversation.messages.clone())
    }

    /// Non-failing lookup for introspection; `None` when absent.
    #[must_use]
    pub fn get(&self, id: ConversationId) -> Option<Conversation> {
        self.conversations.get(&id).map(|entry| entry.value().clone())
    }

    /// Snapshot of every conversation, oldest first.
    ///
    /// Creation-time order with id tie-breaking keeps listings
    /// deterministic.
    #[must_use]
    pub fn list(&self) -> Vec<Conversation> {
        let mut all: Vec<Conversation> = self
            .conversations
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        all
    }

    /// Remove a conversation if present; reports whether a removal
    /// occurred. Never fails.
    pub fn delete(&self, id: ConversationId) -> bool {
        self.conversations.remove(&id).is_some()
    }

    /// Remove every conversation.
    pub fn clear_all(&self) {
        self.conversations.clear();
    }

    /// Number of live conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::MessageRole;
    use chrono::{DateTime, Utc};

    #[test]
    fn append_sequence_reads_back_in_order_with_monotonic_stamps() {
        let store = ConversationStore::new();
        let id = store.create();

        store.append(id, ChatMessage::user("first")).unwrap();
        store.append(id, ChatMessage::assistant("second")).unwrap();
        store.append(id, ChatMessage::user("third")).unwrap();

        let history = store.read(id).unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);

        let mut previous: Option<DateTime<Utc>> = None;
        for message in &history {
            let stamp = message.timestamp.unwrap();
            if let Some(earlier) = previous {
                assert!(stamp >= earlier);
            }
            previous = Some(stamp);
        }
    }

    #[test]
    fn append_to_unknown_id_fails_and_mutates_nothing() {
        let store = ConversationStore::new();
        let bogus = ConversationId::new();

        let err = store.append(bogus, ChatMessage::user("hi")).unwrap_err();
        assert!(matches!(err, ChatError::ConversationNotFound(id) if id == bogus));
        assert!(store.is_empty());
        assert!(store.get(bogus).is_none());
    }

    #[test]
    fn create_twice_yields_distinct_empty_conversations() {
        let store = ConversationStore::new();
        let first = store.create();
        let second = store.create();
        assert_ne!(first, second);

        let all = store.list();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(Conversation::is_empty));
        assert!(all.iter().any(|c| c.id == first));
        assert!(all.iter().any(|c| c.id == second));
    }

    #[test]
    fn deleted_conversation_cannot_be_read() {
        let store = ConversationStore::new();
        let id = store.create();
        store.append(id, ChatMessage::user("hi")).unwrap();

        assert!(store.delete(id));
        let err = store.read(id).unwrap_err();
        assert!(matches!(err, ChatError::ConversationNotFound(_)));
    }

    #[test]
    fn delete_reports_presence_then_absence() {
        let store = ConversationStore::new();
        let id = store.create();

        assert!(store.delete(id));
        assert!(!store.delete(id));
        assert!(!store.delete(ConversationId::new()));
    }

    #[test]
    fn read_hands_out_a_snapshot() {
        let store = ConversationStore::new();
        let id = store.create();
        store.append(id, ChatMessage::user("hi")).unwrap();

        let mut snapshot = store.read(id).unwrap();
        snapshot.push(ChatMessage::assistant("injected"));
        snapshot[0].content.clear();

        let fresh = store.read(id).unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].content, "hi");
    }

    #[test]
    fn caller_timestamps_are_overwritten() {
        let store = ConversationStore::new();
        let id = store.create();

        let mut forged = ChatMessage::user("hi");
        forged.timestamp = Some(DateTime::<Utc>::MIN_UTC);
        let stored = store.append(id, forged).unwrap();

        let created_at = store.get(id).unwrap().created_at;
        assert!(stored.timestamp.unwrap() >= created_at);
    }

    #[test]
    fn append_returns_the_stored_copy() {
        let store = ConversationStore::new();
        let id = store.create();

        let stored = store.append(id, ChatMessage::assistant("hello")).unwrap();
        assert_eq!(stored.role, MessageRole::Assistant);
        assert!(stored.timestamp.is_some());
        assert_eq!(store.read(id).unwrap().last(), Some(&stored));
    }

    #[test]
    fn get_distinguishes_present_from_absent() {
        let store = ConversationStore::new();
        let id = store.create();

        assert!(store.get(id).is_some());
        assert!(store.get(ConversationId::new()).is_none());
    }

    #[test]
    fn list_order_is_stable_across_calls() {
        let store = ConversationStore::new();
        for _ in 0..8 {
            let _ = store.create();
        }

        let first: Vec<ConversationId> = store.list().iter().map(|c| c.id).collect();
        let second: Vec<ConversationId> = store.list().iter().map(|c| c.id).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn clear_all_empties_the_store() {
        let store = ConversationStore::new();
        let id = store.create();
        store.append(id, ChatMessage::user("hi")).unwrap();
        let _ = store.create();

        store.clear_all();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
        assert_eq!(store.len(), 0);
    }
}
