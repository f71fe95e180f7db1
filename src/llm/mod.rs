//! Completion backends: the boundary between conversation state and the
//! model runtime.
//!
//! A backend maps one ordered chat history to one completion string in a
//! single attempt. Retries and deadlines are the caller's business,
//! layered above this boundary; nothing here retries.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::chat::message::ChatMessage;

/// Rig-backed backend targeting an Ollama endpoint.
pub mod ollama;

/// Deterministic backend for tests and offline runs.
pub mod mock;

/// Boxed future type for backend operations.
pub type InvokeFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for completion backends.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The history was structurally unusable for conversion: empty, or
    /// not ending in a user turn.
    #[error("unusable history: {0}")]
    History(String),
    /// The completion request failed.
    #[error("completion request failed: {0}")]
    Request(#[from] rig::completion::CompletionError),
    /// HTTP client error from Rig.
    #[error("http client error: {0}")]
    HttpClient(#[from] rig::http_client::Error),
    /// The model produced no usable text.
    #[error("model returned an empty completion")]
    EmptyCompletion,
}

/// Convenience result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// A single-attempt mapping from an ordered history to a completion.
///
/// Role mapping into the provider's wire format is the backend's concern;
/// callers hand over the raw history and get text back.
pub trait CompletionBackend: Send + Sync {
    /// Produce one completion for `history`.
    ///
    /// The final element must be the user turn awaiting a reply.
    ///
    /// # Errors
    /// [`BackendError::History`] when the history cannot be converted;
    /// any other variant when the provider call fails or the reply is
    /// unusable.
    fn invoke(&self, history: Vec<ChatMessage>) -> InvokeFuture<'_, BackendResult<String>>;
}
