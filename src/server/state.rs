//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::chat::config::ChatConfig;
use crate::chat::errors::{ChatError, ChatResult};
use crate::chat::service::ChatService;
use crate::chat::store::ConversationStore;
use crate::llm::ollama::OllamaBackend;

/// Shared application state.
pub struct AppState {
    /// Coordinates chat turns against the in-memory store.
    pub chat: ChatService,
    /// Configuration the state was built from.
    pub config: ChatConfig,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the Ollama
    /// client cannot be created.
    pub fn new(config: ChatConfig) -> ChatResult<Arc<Self>> {
        config.validate()?;

        let backend = OllamaBackend::new(&config.llm).map_err(|e| {
            ChatError::InvalidConfig(format!("failed to create Ollama client: {e}"))
        })?;

        let store = Arc::new(ConversationStore::new());
        let chat = ChatService::new(store, Arc::new(backend));

        Ok(Arc::new(Self { chat, config }))
    }
}
