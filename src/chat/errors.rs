//! Error types for the chat subsystem.

use thiserror::Error;

use crate::chat::ids::ConversationId;
use crate::llm::BackendError;

/// Chat subsystem error type.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Operation referenced a conversation id not present in the store.
    /// Always a caller error; never retried automatically.
    #[error("conversation {0} not found")]
    ConversationNotFound(ConversationId),
    /// The completion backend failed or returned an unusable result.
    /// The user turn stays persisted; the caller may re-issue the send.
    #[error("response generation failed: {0}")]
    Generation(#[source] BackendError),
    /// A history handed to the completion backend was structurally
    /// unusable. Fatal to the call, not worth retrying.
    #[error("invalid chat history: {0}")]
    Validation(String),
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience result alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;

impl ChatError {
    /// Classify a backend failure: structural history problems are
    /// validation errors, everything else is a generation failure.
    #[must_use]
    pub fn from_backend(error: BackendError) -> Self {
        match error {
            BackendError::History(reason) => Self::Validation(reason),
            other => Self::Generation(other),
        }
    }
}
