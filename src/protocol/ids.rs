//! Connection and room identifiers

use serde::{Deserialize, Serialize};

/// Unique identifier for a connection
///
/// Assigned by the transport when it accepts a connection, before any
/// signaling event for that connection reaches the coordinator. The
/// coordinator never mints ids itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(u64);

impl ClientId {
    /// Create a client id from the transport's raw id
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ClientId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Identifier for a room
///
/// Externally supplied and not pre-registered; the room comes into
/// existence on first join and disappears when its last member leaves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Create a room id
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the room name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}
