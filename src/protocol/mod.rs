//! Wire-facing signaling protocol
//!
//! This module defines:
//! - Connection and room identifiers
//! - Inbound client events (tagged with their sender by the transport)
//! - Outbound server messages (addressed to a single connection)
//!
//! Negotiation payloads are opaque `serde_json::Value`s relayed verbatim;
//! only envelope fields are interpreted, so the protocol is insulated from
//! SDP/ICE format evolution.

pub mod event;
pub mod ids;
pub mod message;

pub use event::{ClientEvent, InboundEvent, SignalTarget};
pub use ids::{ClientId, RoomId};
pub use message::{AddressedMessage, ServerMessage};
