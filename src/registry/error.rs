//! Registry error types
//!
//! Error types for connection and room registry operations.

use crate::protocol::{ClientId, RoomId};

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A connection with this id is already registered
    ConnectionExists(ClientId),
    /// Connection id is not registered (or already evicted)
    UnknownConnection(ClientId),
    /// The connection is not a member of the named room
    NotInRoom(ClientId, RoomId),
    /// Another connection already holds the room's broadcaster slot
    BroadcasterActive { room: RoomId, holder: ClientId },
    /// The room is at its member limit
    RoomFull(RoomId),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::ConnectionExists(id) => {
                write!(f, "Connection already registered: {}", id)
            }
            RegistryError::UnknownConnection(id) => write!(f, "Unknown connection: {}", id),
            RegistryError::NotInRoom(id, room) => {
                write!(f, "Connection {} is not in room {}", id, room)
            }
            RegistryError::BroadcasterActive { room, holder } => {
                write!(f, "Room {} already has broadcaster {}", room, holder)
            }
            RegistryError::RoomFull(room) => write!(f, "Room is full: {}", room),
        }
    }
}

impl std::error::Error for RegistryError {}
