//! Per-connection state machine
//!
//! Tracks a signaling connection from transport accept to disconnect:
//! which room it is in, whether it declared itself broadcaster or viewer,
//! and whether it is still live.

use std::time::Instant;

use crate::protocol::{ClientId, RoomId};

/// Declared role of a connection within its room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// No ready event received yet
    Unassigned,
    /// Declared as the room's media source
    Broadcaster,
    /// Declared as a media recipient
    Viewer,
}

/// Connection lifecycle state, derived from room/role/liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Connected, not in any room
    Unassigned,
    /// In a room, no role declared
    RoomJoined,
    /// In a room as its broadcaster
    Broadcasting,
    /// In a room as a viewer
    Viewing,
    /// Disconnected; kept only until registry eviction completes
    Closed,
}

/// State of a single connection
///
/// Owned exclusively by the registry. Rooms reference connections by id
/// only and never hold this value.
#[derive(Debug)]
pub struct ConnectionState {
    /// Transport-assigned identity
    pub id: ClientId,

    /// Current room, if any
    pub room: Option<RoomId>,

    /// Declared role
    pub role: Role,

    /// When the transport accepted the connection
    pub connected_at: Instant,

    /// Cleared on disconnect
    live: bool,
}

impl ConnectionState {
    /// Create state for a freshly accepted connection
    pub fn new(id: ClientId) -> Self {
        Self {
            id,
            room: None,
            role: Role::Unassigned,
            connected_at: Instant::now(),
            live: true,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        if !self.live {
            return SessionPhase::Closed;
        }
        match (&self.room, self.role) {
            (None, _) => SessionPhase::Unassigned,
            (Some(_), Role::Unassigned) => SessionPhase::RoomJoined,
            (Some(_), Role::Broadcaster) => SessionPhase::Broadcasting,
            (Some(_), Role::Viewer) => SessionPhase::Viewing,
        }
    }

    /// Assign the connection to a room
    ///
    /// Joining the current room again is a no-op that preserves the role.
    /// Moving to a different room resets the role; the previous room is
    /// returned so the caller can clean up membership there.
    pub fn join_room(&mut self, room: RoomId) -> Option<RoomId> {
        if !self.live {
            return None;
        }
        if self.room.as_ref() == Some(&room) {
            return None;
        }
        let previous = self.room.replace(room);
        self.role = Role::Unassigned;
        previous
    }

    /// Declare the connection the room's broadcaster (idempotent)
    pub fn mark_broadcaster(&mut self) {
        if self.live && self.room.is_some() {
            self.role = Role::Broadcaster;
        }
    }

    /// Declare the connection a viewer (idempotent)
    pub fn mark_viewer(&mut self) {
        if self.live && self.room.is_some() {
            self.role = Role::Viewer;
        }
    }

    /// Drop any declared role, keeping room membership
    pub fn clear_role(&mut self) {
        self.role = Role::Unassigned;
    }

    /// Mark the connection closed, returning the room it was in
    ///
    /// Idempotent: a second close returns `None`.
    pub fn close(&mut self) -> Option<RoomId> {
        if !self.live {
            return None;
        }
        self.live = false;
        self.role = Role::Unassigned;
        self.room.take()
    }

    /// Whether the transport connection is still open
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Whether this connection holds the broadcaster role
    pub fn is_broadcaster(&self) -> bool {
        self.live && self.role == Role::Broadcaster
    }

    /// Time since the transport accepted the connection
    pub fn duration(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_lifecycle() {
        let mut state = ConnectionState::new(ClientId::new(1));
        assert_eq!(state.phase(), SessionPhase::Unassigned);
        assert!(state.is_live());

        assert_eq!(state.join_room(RoomId::new("r1")), None);
        assert_eq!(state.phase(), SessionPhase::RoomJoined);
        assert_eq!(state.role, Role::Unassigned);

        state.mark_broadcaster();
        assert_eq!(state.phase(), SessionPhase::Broadcasting);
        assert!(state.is_broadcaster());

        // Re-assertion changes nothing
        state.mark_broadcaster();
        assert_eq!(state.phase(), SessionPhase::Broadcasting);

        let room = state.close();
        assert_eq!(room, Some(RoomId::new("r1")));
        assert_eq!(state.phase(), SessionPhase::Closed);
        assert!(!state.is_broadcaster());

        // Second close is a no-op
        assert_eq!(state.close(), None);
    }

    #[test]
    fn test_rejoining_same_room_keeps_role() {
        let mut state = ConnectionState::new(ClientId::new(1));
        state.join_room(RoomId::new("r1"));
        state.mark_viewer();

        assert_eq!(state.join_room(RoomId::new("r1")), None);
        assert_eq!(state.role, Role::Viewer);
    }

    #[test]
    fn test_moving_rooms_resets_role() {
        let mut state = ConnectionState::new(ClientId::new(1));
        state.join_room(RoomId::new("r1"));
        state.mark_broadcaster();

        let previous = state.join_room(RoomId::new("r2"));
        assert_eq!(previous, Some(RoomId::new("r1")));
        assert_eq!(state.role, Role::Unassigned);
        assert_eq!(state.phase(), SessionPhase::RoomJoined);
    }

    #[test]
    fn test_ready_without_room_is_ignored() {
        let mut state = ConnectionState::new(ClientId::new(1));
        state.mark_broadcaster();
        assert_eq!(state.role, Role::Unassigned);
        assert_eq!(state.phase(), SessionPhase::Unassigned);
    }

    #[test]
    fn test_closed_connection_cannot_rejoin() {
        let mut state = ConnectionState::new(ClientId::new(1));
        state.join_room(RoomId::new("r1"));
        state.close();

        state.join_room(RoomId::new("r2"));
        assert_eq!(state.room, None);
        assert_eq!(state.phase(), SessionPhase::Closed);
    }
}
