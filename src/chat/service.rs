//! Chat turn coordination.
//!
//! Drives one turn end to end: create or look up the conversation, append
//! the user turn, hand the full history to the completion backend, append
//! the assistant turn, return it. Store and backend are injected, so
//! isolated service instances coexist in tests.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::chat::conversation::Conversation;
use crate::chat::errors::{ChatError, ChatResult};
use crate::chat::ids::ConversationId;
use crate::chat::message::ChatMessage;
use crate::chat::store::ConversationStore;
use crate::llm::CompletionBackend;

/// Reply returned by [`ChatService::send_message`].
#[derive(Clone, Debug)]
pub struct ChatReply {
    /// The stored assistant turn, stamped by the store.
    pub message: ChatMessage,
    /// Thread the turn belongs to; newly created when the caller sent none.
    pub conversation_id: ConversationId,
}

/// Coordinator between the conversation store and a completion backend.
///
/// Turns are serialized per conversation id: a per-thread async mutex is
/// held across append, read, invoke, and the final append, so concurrent
/// sends to one thread execute in sequence and the model never sees an
/// interleaved history. Sends to different threads proceed independently.
pub struct ChatService {
    store: Arc<ConversationStore>,
    backend: Arc<dyn CompletionBackend>,
    turn_locks: DashMap<ConversationId, Arc<Mutex<()>>>,
}

impl ChatService {
    /// Create a service over an injected store and backend.
    #[must_use]
    pub fn new(store: Arc<ConversationStore>, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            store,
            backend,
            turn_locks: DashMap::new(),
        }
    }

    /// Run one chat turn.
    ///
    /// Without a thread id a fresh conversation is created; with one, the
    /// turn is appended there. On backend failure the user turn stays
    /// persisted and the assistant turn is never appended, so the caller
    /// can re-issue the send on the same thread id.
    ///
    /// # Errors
    /// [`ChatError::ConversationNotFound`] for a caller-supplied unknown
    /// id (no new thread is created in that case);
    /// [`ChatError::Generation`] when the backend fails or returns an
    /// unusable completion; [`ChatError::Validation`] when the history
    /// cannot be converted for the backend.
    pub async fn send_message(
        &self,
        text: impl Into<String>,
        conversation_id: Option<ConversationId>,
    ) -> ChatResult<ChatReply> {
        let id = match conversation_id {
            Some(existing) => existing,
            None => self.store.create(),
        };

        let lock = self.turn_lock(id);
        let guard = lock.lock().await;

        // A failed user append means the thread does not exist; drop the
        // lock entry the probe created.
        if let Err(err) = self.store.append(id, ChatMessage::user(text)) {
            drop(guard);
            self.turn_locks.remove(&id);
            return Err(err);
        }
        let history = self.store.read(id)?;
        debug!(
            "Sending {} turns to the backend for conversation {}",
            history.len(),
            id
        );

        let completion = self
            .backend
            .invoke(history)
            .await
            .map_err(ChatError::from_backend)?;

        let message = self.store.append(id, ChatMessage::assistant(completion))?;
        info!("Completed turn for conversation {}", id);

        Ok(ChatReply {
            message,
            conversation_id: id,
        })
    }

    /// Full ordered history of a conversation.
    ///
    /// # Errors
    /// [`ChatError::ConversationNotFound`] if the id is not registered.
    pub fn get_history(&self, conversation_id: ConversationId) -> ChatResult<Vec<ChatMessage>> {
        self.store.read(conversation_id)
    }

    /// Register an empty conversation and return its id.
    #[must_use]
    pub fn create_conversation(&self) -> ConversationId {
        self.store.create()
    }

    /// Snapshot of every conversation, oldest first.
    #[must_use]
    pub fn list_conversations(&self) -> Vec<Conversation> {
        self.store.list()
    }

    /// Remove a conversation if present; reports whether a removal
    /// occurred.
    pub fn delete_conversation(&self, conversation_id: ConversationId) -> bool {
        let removed = self.store.delete(conversation_id);
        self.turn_locks.remove(&conversation_id);
        removed
    }

    /// Remove every conversation.
    pub fn clear_conversations(&self) {
        self.store.clear_all();
        self.turn_locks.clear();
    }

    fn turn_lock(&self, id: ConversationId) -> Arc<Mutex<()>> {
        self.turn_locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
