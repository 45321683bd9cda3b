//! Signaling coordinator for one-broadcaster WebRTC rooms
//!
//! This crate is the rendezvous half of a peer-to-peer streaming setup:
//! one broadcaster and any number of viewers meet in a named room and
//! exchange session offers, answers, and ICE candidates until they hold a
//! direct media connection. Media never touches this code; the crate only
//! routes negotiation envelopes and keeps room/presence state consistent.
//!
//! # Architecture
//!
//! ```text
//!   transport (WebSocket, TCP, ...)          signaling-rs
//!  ┌───────────────────────────────┐   ┌─────────────────────────┐
//!  │ conn 1 ──┐                    │   │       Coordinator       │
//!  │ conn 2 ──┼─ InboundEvent ─────┼──►│  ┌───────────────────┐  │
//!  │ conn 3 ──┘   (tagged with     │   │  │ SignalingRegistry │  │
//!  │              sender id)       │   │  │  connections      │  │
//!  │                               │   │  │  rooms            │  │
//!  │ conn N ◄── AddressedMessage ──┼───┤  └───────────────────┘  │
//!  └───────────────────────────────┘   └─────────────────────────┘
//! ```
//!
//! The transport owns the sockets and assigns each connection a unique id.
//! It pushes [`InboundEvent`]s into the coordinator's bounded event channel
//! and drains [`AddressedMessage`]s from the unbounded delivery channel,
//! forwarding each to its target connection. The coordinator never performs
//! I/O of its own.
//!
//! # Example
//!
//! ```no_run
//! use signaling_rs::{ClientEvent, Coordinator, CoordinatorConfig, InboundEvent, RoomId};
//!
//! # async fn example() {
//! let (coordinator, mut delivery) = Coordinator::new(CoordinatorConfig::default());
//! let (event_tx, event_rx) = coordinator.event_channel();
//!
//! tokio::spawn(async move { coordinator.run(event_rx).await });
//!
//! // The transport accepted connection 1, which joins a room
//! event_tx
//!     .send(InboundEvent::Connected { client: 1.into() })
//!     .await
//!     .unwrap();
//! event_tx
//!     .send(InboundEvent::Message {
//!         sender: 1.into(),
//!         event: ClientEvent::ViewerReady { room: RoomId::new("lobby") },
//!     })
//!     .await
//!     .unwrap();
//!
//! // Forward whatever the coordinator addresses to each connection
//! while let Some(message) = delivery.recv().await {
//!     println!("deliver to {}: {:?}", message.target, message.message);
//! }
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod coordinator;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod stats;

pub use coordinator::Coordinator;
pub use error::{Result, SignalingError};
pub use protocol::{
    AddressedMessage, ClientEvent, ClientId, InboundEvent, RoomId, ServerMessage, SignalTarget,
};
pub use registry::{CoordinatorConfig, RegistryError, RoomStats, SignalingRegistry};
pub use session::{ConnectionState, Role, SessionPhase};
pub use stats::{CoordinatorStats, StatsSnapshot};
