//! Deterministic completion backend for tests and offline runs.
//!
//! Echoes the final user turn instead of contacting a model runtime,
//! while enforcing the same history contract as the real backends.

use crate::chat::message::{ChatMessage, MessageRole};
use crate::llm::{BackendError, BackendResult, CompletionBackend, InvokeFuture};

/// Backend that answers every prompt with a canned echo.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

impl MockBackend {
    /// Create a new mock backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CompletionBackend for MockBackend {
    fn invoke(&self, history: Vec<ChatMessage>) -> InvokeFuture<'_, BackendResult<String>> {
        Box::pin(async move {
            let last = history
                .last()
                .ok_or_else(|| BackendError::History("history is empty".to_string()))?;
            if last.role != MessageRole::User {
                return Err(BackendError::History(format!(
                    "history must end with a user turn, got {}",
                    last.role
                )));
            }
            Ok(format!("Mock response to: {}", last.content))
        })
    }
}
