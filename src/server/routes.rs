//! HTTP route handlers for the parlance chat API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::conversation::Conversation;
use crate::chat::errors::ChatError;
use crate::chat::ids::ConversationId;
use crate::chat::message::ChatMessage;

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(send_message))
        .route(
            "/api/conversations",
            get(list_conversations).delete(clear_conversations),
        )
        .route("/api/conversations/{id}", delete(delete_conversation))
        .route(
            "/api/conversations/{id}/messages",
            get(conversation_messages),
        )
        .with_state(state)
}

/// Translate a chat error into the HTTP response it should travel as.
fn into_http(error: ChatError) -> (StatusCode, String) {
    let status = match &error {
        ChatError::ConversationNotFound(_) => StatusCode::NOT_FOUND,
        ChatError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ChatError::Generation(_) => StatusCode::BAD_GATEWAY,
        ChatError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "parlance",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.config.llm.model
    }))
}

/// Chat turn request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Conversation to continue. Omit to start a new one.
    pub conversation_id: Option<ConversationId>,
}

/// Chat turn response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The assistant's reply, as stored.
    pub message: ChatMessage,
    /// Conversation the turn belongs to.
    pub conversation_id: ConversationId,
}

/// Handle chat turn requests.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let reply = state
        .chat
        .send_message(request.message, request.conversation_id)
        .await
        .map_err(into_http)?;

    Ok(Json(ChatResponse {
        message: reply.message,
        conversation_id: reply.conversation_id,
    }))
}

/// Conversation list entry.
#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Number of stored messages.
    pub message_count: usize,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the conversation last changed.
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationSummary {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id,
            message_count: conversation.messages.len(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

/// List all conversations, oldest first.
async fn list_conversations(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ConversationSummary>> {
    let summaries = state
        .chat
        .list_conversations()
        .into_iter()
        .map(ConversationSummary::from)
        .collect();

    Json(summaries)
}

/// Return the full message history of one conversation.
async fn conversation_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, (StatusCode, String)> {
    let history = state
        .chat
        .get_history(ConversationId::from_uuid(id))
        .map_err(into_http)?;

    Ok(Json(history))
}

/// Deletion response.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether a conversation was actually removed.
    pub deleted: bool,
}

/// Delete one conversation.
async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Json<DeleteResponse> {
    let deleted = state
        .chat
        .delete_conversation(ConversationId::from_uuid(id));

    Json(DeleteResponse { deleted })
}

/// Remove every stored conversation.
async fn clear_conversations(State(state): State<Arc<AppState>>) -> StatusCode {
    state.chat.clear_conversations();
    StatusCode::NO_CONTENT
}
