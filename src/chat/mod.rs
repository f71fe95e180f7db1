//! Conversational chat subsystem.
//!
//! This module holds the whole conversation lifecycle, organized into:
//! - `config`: Service and backend configuration
//! - `errors`: The error type shared across the subsystem
//! - `ids`: Conversation identifiers
//! - `message`: Chat messages and their roles
//! - `conversation`: An ordered message history with timestamps
//! - `store`: In-memory conversation storage
//! - `service`: Orchestration of a full chat turn against a backend

pub mod config;
pub mod conversation;
pub mod errors;
pub mod ids;
pub mod message;
pub mod service;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{ChatConfig, LlmConfig, ServerConfig};
pub use conversation::Conversation;
pub use errors::{ChatError, ChatResult};
pub use ids::ConversationId;
pub use message::{ChatMessage, MessageRole};
pub use service::{ChatReply, ChatService};
pub use store::ConversationStore;
