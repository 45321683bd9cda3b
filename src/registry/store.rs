//! Signaling registry implementation
//!
//! The central registry that tracks live connections and room membership,
//! and answers broadcaster lookups for the router.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::protocol::{ClientId, RoomId};
use crate::session::{ConnectionState, Role};

use super::config::CoordinatorConfig;
use super::error::RegistryError;
use super::room::{RoomEntry, RoomStats};

/// What a connection left behind when it was evicted
#[derive(Debug)]
pub struct Departure {
    /// Room the connection was in, if any
    pub room: Option<RoomId>,
    /// The connection held the room's broadcaster slot
    pub was_broadcaster: bool,
    /// Members still in that room after eviction
    pub remaining: Vec<ClientId>,
}

/// Central registry for connections and rooms
///
/// Thread-safe via `RwLock`. Rooms hold member ids only; connection state
/// lives in the connection map and is evicted exactly once on disconnect.
///
/// Lock order is rooms map, then a room entry, then the connections map,
/// then a connection entry. Every room mutation holds the rooms map write
/// lock for the whole membership change, so a broadcaster lookup can never
/// observe a partially applied join or move.
pub struct SignalingRegistry {
    /// Map of connection id to connection state
    connections: RwLock<HashMap<ClientId, Arc<RwLock<ConnectionState>>>>,

    /// Map of room id to member set
    rooms: RwLock<HashMap<RoomId, Arc<RwLock<RoomEntry>>>>,

    /// Configuration
    config: CoordinatorConfig,
}

impl SignalingRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: CoordinatorConfig) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            rooms: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Register a freshly accepted connection
    ///
    /// Fails if the id is already present; the transport guarantees unique
    /// ids, so a collision indicates a transport bug rather than churn.
    pub async fn register(&self, id: ClientId) -> Result<(), RegistryError> {
        let mut connections = self.connections.write().await;

        if connections.contains_key(&id) {
            return Err(RegistryError::ConnectionExists(id));
        }
        connections.insert(id, Arc::new(RwLock::new(ConnectionState::new(id))));

        tracing::info!(client = %id, "Connection registered");
        Ok(())
    }

    /// Look up a connection's state handle
    pub async fn connection(&self, id: ClientId) -> Option<Arc<RwLock<ConnectionState>>> {
        self.connections.read().await.get(&id).cloned()
    }

    /// Whether the connection is registered and live
    pub async fn is_live(&self, id: ClientId) -> bool {
        match self.connection(id).await {
            Some(conn) => conn.read().await.is_live(),
            None => false,
        }
    }

    /// Room the connection is currently in
    pub async fn current_room(&self, id: ClientId) -> Option<RoomId> {
        let conn = self.connection(id).await?;
        let state = conn.read().await;
        state.room.clone()
    }

    /// Assign a connection to a room, creating the room if absent
    ///
    /// A connection already in a different room is moved atomically: there
    /// is no observable dual-membership state. The outcome names the room
    /// left behind (if any) so the caller can notify its members.
    pub async fn join_room(
        &self,
        room: &RoomId,
        id: ClientId,
    ) -> Result<JoinOutcome, RegistryError> {
        let conn_arc = self
            .connection(id)
            .await
            .ok_or(RegistryError::UnknownConnection(id))?;

        let mut rooms = self.rooms.write().await;
        let mut conn = conn_arc.write().await;

        if !conn.is_live() {
            return Err(RegistryError::UnknownConnection(id));
        }

        if conn.room.as_ref() == Some(room) {
            return Ok(JoinOutcome {
                left: None,
                was_broadcaster: false,
            });
        }

        // Capacity check before any state changes
        if self.config.max_room_members > 0 {
            if let Some(entry_arc) = rooms.get(room) {
                if entry_arc.read().await.len() >= self.config.max_room_members {
                    return Err(RegistryError::RoomFull(room.clone()));
                }
            }
        }

        let was_broadcaster = conn.is_broadcaster();
        let previous = conn.join_room(room.clone());
        drop(conn);

        if let Some(ref old) = previous {
            Self::remove_member(&mut rooms, old, id).await;
        }

        let entry_arc = rooms
            .entry(room.clone())
            .or_insert_with(|| Arc::new(RwLock::new(RoomEntry::new())))
            .clone();
        entry_arc.write().await.insert(id);

        tracing::info!(
            client = %id,
            room = %room,
            moved_from = ?previous.as_ref().map(|r| r.as_str()),
            "Joined room"
        );

        Ok(JoinOutcome {
            was_broadcaster: was_broadcaster && previous.is_some(),
            left: previous,
        })
    }

    /// Remove a connection from a room, keeping the connection registered
    ///
    /// Returns true when the connection was a member. The room entry is
    /// dropped once its member set becomes empty.
    pub async fn leave_room(&self, room: &RoomId, id: ClientId) -> bool {
        let mut rooms = self.rooms.write().await;

        let removed = Self::remove_member(&mut rooms, room, id).await;
        if removed {
            if let Some(conn_arc) = self.connections.read().await.get(&id).cloned() {
                let mut conn = conn_arc.write().await;
                if conn.room.as_ref() == Some(room) {
                    conn.room = None;
                    conn.clear_role();
                }
            }
            tracing::debug!(client = %id, room = %room, "Left room");
        }
        removed
    }

    /// Snapshot of a room's member ids (empty if the room does not exist)
    pub async fn members(&self, room: &RoomId) -> Vec<ClientId> {
        let rooms = self.rooms.read().await;

        match rooms.get(room) {
            Some(entry_arc) => entry_arc.read().await.members(),
            None => Vec::new(),
        }
    }

    /// Whether `id` is a live member of `room`
    pub async fn member_live(&self, room: &RoomId, id: ClientId) -> bool {
        let in_room = {
            let rooms = self.rooms.read().await;
            match rooms.get(room) {
                Some(entry_arc) => entry_arc.read().await.contains(id),
                None => false,
            }
        };

        in_room && self.is_live(id).await
    }

    /// Find the room's broadcaster, excluding the requester
    ///
    /// Linear scan of the member set; only a member whose role is explicitly
    /// `Broadcaster` counts. A room full of role-less connections has no
    /// broadcaster, no matter how many members are present.
    pub async fn find_broadcaster(&self, room: &RoomId, requester: ClientId) -> Option<ClientId> {
        let members = self.members(room).await;
        self.broadcaster_among(&members, Some(requester)).await
    }

    /// Grant the room's broadcaster slot to `id`
    ///
    /// Returns true when the slot was newly granted, false when `id`
    /// already held it (idempotent re-assertion). A slot held by any other
    /// member is a conflict and leaves all state untouched.
    pub async fn claim_broadcaster(
        &self,
        room: &RoomId,
        id: ClientId,
    ) -> Result<bool, RegistryError> {
        let conn_arc = self
            .connection(id)
            .await
            .ok_or(RegistryError::UnknownConnection(id))?;

        // Competing claims serialize on the rooms map write lock
        let rooms = self.rooms.write().await;

        let entry_arc = rooms
            .get(room)
            .ok_or_else(|| RegistryError::NotInRoom(id, room.clone()))?
            .clone();
        let members = entry_arc.read().await.members();
        if !members.contains(&id) {
            return Err(RegistryError::NotInRoom(id, room.clone()));
        }

        if let Some(holder) = self.broadcaster_among(&members, Some(id)).await {
            tracing::warn!(
                client = %id,
                room = %room,
                holder = %holder,
                "Broadcaster claim rejected: slot taken"
            );
            return Err(RegistryError::BroadcasterActive {
                room: room.clone(),
                holder,
            });
        }

        let mut conn = conn_arc.write().await;
        if !conn.is_live() {
            return Err(RegistryError::UnknownConnection(id));
        }
        if conn.role == Role::Broadcaster {
            return Ok(false);
        }
        conn.mark_broadcaster();

        tracing::info!(client = %id, room = %room, "Broadcaster slot claimed");
        Ok(true)
    }

    /// Give the broadcaster slot back, keeping room membership
    ///
    /// Returns true when `id` actually held the slot.
    pub async fn release_broadcaster(&self, room: &RoomId, id: ClientId) -> bool {
        let Some(conn_arc) = self.connection(id).await else {
            tracing::warn!(client = %id, room = %room, "Release from unknown connection");
            return false;
        };

        let mut conn = conn_arc.write().await;
        if conn.room.as_ref() != Some(room) || conn.role != Role::Broadcaster {
            tracing::warn!(
                client = %id,
                room = %room,
                role = ?conn.role,
                "Broadcaster release mismatch"
            );
            return false;
        }
        conn.clear_role();

        tracing::info!(client = %id, room = %room, "Broadcaster slot released");
        true
    }

    /// Declare a room member a viewer
    pub async fn assign_viewer(&self, room: &RoomId, id: ClientId) -> Result<(), RegistryError> {
        let conn_arc = self
            .connection(id)
            .await
            .ok_or(RegistryError::UnknownConnection(id))?;

        let mut conn = conn_arc.write().await;
        if !conn.is_live() {
            return Err(RegistryError::UnknownConnection(id));
        }
        if conn.room.as_ref() != Some(room) {
            return Err(RegistryError::NotInRoom(id, room.clone()));
        }
        conn.mark_viewer();
        Ok(())
    }

    /// Evict a connection and its room membership
    ///
    /// Idempotent: evicting an unknown or already-removed id returns `None`.
    /// Cleanup is part of this transition, so no dangling member id survives
    /// it, and later events from the evicted id cannot resurrect membership.
    pub async fn remove(&self, id: ClientId) -> Option<Departure> {
        let mut rooms = self.rooms.write().await;
        let mut connections = self.connections.write().await;

        let conn_arc = connections.remove(&id)?;
        let mut conn = conn_arc.write().await;
        let was_broadcaster = conn.is_broadcaster();
        let room = conn.close();
        drop(conn);

        let mut remaining = Vec::new();
        if let Some(ref room_id) = room {
            Self::remove_member(&mut rooms, room_id, id).await;
            if let Some(entry_arc) = rooms.get(room_id) {
                remaining = entry_arc.read().await.members();
            }
        }

        tracing::info!(
            client = %id,
            room = ?room.as_ref().map(|r| r.as_str()),
            was_broadcaster,
            "Connection removed"
        );

        Some(Departure {
            room,
            was_broadcaster,
            remaining,
        })
    }

    /// Number of registered connections
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Number of rooms with at least one member
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Point-in-time view of a room
    pub async fn room_stats(&self, room: &RoomId) -> Option<RoomStats> {
        let members = {
            let rooms = self.rooms.read().await;
            let members = rooms.get(room)?.read().await.members();
            members
        };
        let has_broadcaster = self.broadcaster_among(&members, None).await.is_some();

        Some(RoomStats {
            member_count: members.len(),
            has_broadcaster,
        })
    }

    /// First member (other than `skip`) whose role is explicitly broadcaster
    async fn broadcaster_among(
        &self,
        members: &[ClientId],
        skip: Option<ClientId>,
    ) -> Option<ClientId> {
        let connections = self.connections.read().await;

        for member in members {
            if Some(*member) == skip {
                continue;
            }
            if let Some(conn_arc) = connections.get(member) {
                if conn_arc.read().await.is_broadcaster() {
                    return Some(*member);
                }
            }
        }
        None
    }

    /// Drop a member from a room entry, removing the entry once empty
    async fn remove_member(
        rooms: &mut HashMap<RoomId, Arc<RwLock<RoomEntry>>>,
        room: &RoomId,
        id: ClientId,
    ) -> bool {
        let Some(entry_arc) = rooms.get(room).cloned() else {
            return false;
        };

        let mut entry = entry_arc.write().await;
        let removed = entry.remove(id);
        let empty = entry.is_empty();
        drop(entry);

        if empty {
            rooms.remove(room);
            tracing::debug!(room = %room, "Room dropped (empty)");
        }
        removed
    }
}

/// Result of a room assignment
#[derive(Debug, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Room the connection was moved out of, when re-assigned
    pub left: Option<RoomId>,
    /// The connection was the old room's broadcaster
    pub was_broadcaster: bool,
}

impl Default for SignalingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
