//! Identifier type for conversation threads.
//!
//! Thin newtype over a random UUID: strongly typed at API boundaries,
//! transparent on the wire. Identifiers are generated fresh for every
//! conversation and are never recycled, including after deletion.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a conversation thread.
///
/// Random (`UUIDv4`), unique for the process lifetime, stable and
/// comparable as a map key. Rendered in canonical hyphenated form by
/// [`fmt::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ConversationId(pub Uuid);

impl Default for ConversationId {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationId {
    /// Generate a fresh identifier.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Extract the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ConversationId {
    #[inline]
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ConversationId> for Uuid {
    #[inline]
    fn from(value: ConversationId) -> Self {
        value.0
    }
}

impl AsRef<Uuid> for ConversationId {
    #[inline]
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for ConversationId {
    type Err = uuid::Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        let a = ConversationId::new();
        let b = ConversationId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let id = ConversationId::new();
        let parsed: ConversationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("not-a-uuid".parse::<ConversationId>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ConversationId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
