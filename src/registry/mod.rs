//! Connection and room registry
//!
//! The registry tracks every live connection, which room it is in, and
//! which member (if any) holds each room's broadcaster slot.
//!
//! # Architecture
//!
//! ```text
//!                       Arc<SignalingRegistry>
//!                 ┌────────────────────────────────┐
//!                 │ connections: HashMap<ClientId, │
//!                 │   ConnectionState {room, role} │
//!                 │ >                              │
//!                 │ rooms: HashMap<RoomId,         │
//!                 │   RoomEntry {member ids}       │
//!                 │ >                              │
//!                 └───────────────┬────────────────┘
//!                                 │
//!         ┌───────────────────────┼───────────────────────┐
//!         ▼                       ▼                       ▼
//!    join_room()          find_broadcaster()          remove()
//!    (atomic move)        (explicit-role scan)        (disconnect cleanup)
//! ```
//!
//! Rooms are created lazily on first join and dropped when their last
//! member leaves. Rooms store member ids only; each connection's state has
//! a single owner, so disconnect eviction can never leave a room pointing
//! at freed state.

pub mod config;
pub mod error;
pub mod room;
pub mod store;

pub use config::CoordinatorConfig;
pub use error::RegistryError;
pub use room::{RoomEntry, RoomStats};
pub use store::{Departure, JoinOutcome, SignalingRegistry};
