//! Chat message model shared by the store, the coordinator, and the
//! completion backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a chat message.
///
/// Closed set: conversion at the completion boundary is a total match,
/// so an unrecognized role cannot reach a backend.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// End-user input.
    User,
    /// Model response.
    Assistant,
    /// Steering instruction folded into the provider preamble.
    System,
}

impl MessageRole {
    /// Stable string form for storage and the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            _ => Err(value.to_string()),
        }
    }
}

/// A single turn in a conversation.
///
/// Immutable once stored. The timestamp is stamped by the store at append
/// time; constructors leave it unset, and any caller-supplied value is
/// overwritten on append.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the turn.
    pub role: MessageRole,
    /// Content payload.
    pub content: String,
    /// Append instant, assigned by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// Build a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Build an assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Build a system turn.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            timestamp: None,
        }
    }
}
