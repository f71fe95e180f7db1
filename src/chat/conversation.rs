//! Conversation entity: one thread of ordered, append-only turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::ids::ConversationId;
use crate::chat::message::ChatMessage;

/// A named, ordered, append-only sequence of turns.
///
/// Owned exclusively by the store; reads hand out clones, never references
/// into live state. Message order is append order, with no reordering and
/// no deduplication.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Thread identifier.
    pub id: ConversationId,
    /// Turns in append order.
    pub messages: Vec<ChatMessage>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Instant of the most recent append; equals `created_at` while empty.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Register an empty conversation with `created_at = updated_at = now`.
    #[must_use]
    pub fn new(id: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamp `message` with the append instant and push it.
    ///
    /// The stamp is clamped to `updated_at` so per-conversation timestamps
    /// never decrease, even if the wall clock steps backwards. Any
    /// caller-supplied timestamp is overwritten.
    pub(crate) fn apply(&mut self, mut message: ChatMessage) -> ChatMessage {
        let stamp = Utc::now().max(self.updated_at);
        message.timestamp = Some(stamp);
        self.messages.push(message.clone());
        self.updated_at = stamp;
        message
    }

    /// Number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation has no turns yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended turn, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::MessageRole;

    #[test]
    fn new_conversation_is_empty_with_equal_instants() {
        let conv = Conversation::new(ConversationId::new());
        assert!(conv.is_empty());
        assert_eq!(conv.len(), 0);
        assert_eq!(conv.created_at, conv.updated_at);
        assert!(conv.last_message().is_none());
    }

    #[test]
    fn apply_stamps_and_refreshes_updated_at() {
        let mut conv = Conversation::new(ConversationId::new());
        let stored = conv.apply(ChatMessage::user("hi"));

        assert_eq!(stored.role, MessageRole::User);
        let stamp = stored.timestamp.unwrap();
        assert_eq!(conv.updated_at, stamp);
        assert!(conv.updated_at >= conv.created_at);
        assert_eq!(conv.last_message(), Some(&stored));
    }

    #[test]
    fn apply_overwrites_caller_timestamps() {
        let mut conv = Conversation::new(ConversationId::new());
        let mut message = ChatMessage::user("hi");
        message.timestamp = Some(DateTime::<Utc>::MIN_UTC);

        let stored = conv.apply(message);
        assert!(stored.timestamp.unwrap() >= conv.created_at);
    }

    #[test]
    fn stamps_never_decrease_across_appends() {
        let mut conv = Conversation::new(ConversationId::new());
        let mut previous = conv.created_at;
        for n in 0..5 {
            let stored = conv.apply(ChatMessage::user(format!("turn {n}")));
            let stamp = stored.timestamp.unwrap();
            assert!(stamp >= previous);
            previous = stamp;
        }
    }
}
