//! Inbound events delivered by the transport
//!
//! Every event arrives tagged with the identity of the connection that
//! produced it. Negotiation payloads (SDP, ICE) are opaque JSON values;
//! the coordinator interprets envelope fields only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{ClientId, RoomId};

/// Addressing mode for answer/candidate relay
///
/// The mode is an explicit, required field of the envelope. It is never
/// inferred from which other fields happen to be populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "id", rename_all = "kebab-case")]
pub enum SignalTarget {
    /// Deliver to exactly one connection
    Peer(ClientId),
    /// Deliver to every room member except the sender
    Room,
}

/// A signaling event sent by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Assign the sender to a room (created lazily on first join)
    JoinRoom { room: RoomId },

    /// Claim the room's broadcaster slot
    BroadcasterReady { room: RoomId },

    /// Declare the sender a viewer and trigger broadcaster discovery
    ViewerReady { room: RoomId },

    /// Relay a session offer to a single viewer
    Offer {
        room: RoomId,
        target: ClientId,
        payload: Value,
    },

    /// Relay a session answer to a peer or the whole room
    Answer {
        room: RoomId,
        target: SignalTarget,
        payload: Value,
    },

    /// Relay an ICE candidate to a peer or the whole room
    Candidate {
        room: RoomId,
        target: SignalTarget,
        payload: Value,
    },

    /// Give up the broadcaster slot without dropping the connection
    BroadcasterDisconnected { room: RoomId },
}

impl ClientEvent {
    /// Room named in the event's envelope
    pub fn room(&self) -> &RoomId {
        match self {
            ClientEvent::JoinRoom { room }
            | ClientEvent::BroadcasterReady { room }
            | ClientEvent::ViewerReady { room }
            | ClientEvent::Offer { room, .. }
            | ClientEvent::Answer { room, .. }
            | ClientEvent::Candidate { room, .. }
            | ClientEvent::BroadcasterDisconnected { room } => room,
        }
    }
}

/// An event on the coordinator's inbound channel
///
/// Connection open/close events originate in the transport; everything else
/// is a client message tagged with its sender.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// The transport accepted a new connection
    Connected { client: ClientId },

    /// A connected client sent a signaling event
    Message { sender: ClientId, event: ClientEvent },

    /// The transport lost the connection
    Disconnected { client: ClientId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_names() {
        let event: ClientEvent = serde_json::from_str(r#"{"type":"join-room","room":"lobby"}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                room: RoomId::new("lobby")
            }
        );

        let event: ClientEvent = serde_json::from_str(
            r#"{"type":"offer","room":"lobby","target":7,"payload":{"sdp":"v=0"}}"#,
        )
        .unwrap();
        match event {
            ClientEvent::Offer { target, payload, .. } => {
                assert_eq!(target, ClientId::new(7));
                assert_eq!(payload["sdp"], "v=0");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_target_mode_is_required() {
        // No addressing mode: the envelope is rejected at parse time
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"type":"answer","room":"lobby","payload":{}}"#);
        assert!(result.is_err());

        let event: ClientEvent = serde_json::from_str(
            r#"{"type":"answer","room":"lobby","target":{"mode":"room"},"payload":{"sdp":"v=0"}}"#,
        )
        .unwrap();
        match event {
            ClientEvent::Answer { target, .. } => assert_eq!(target, SignalTarget::Room),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_missing_room_is_rejected() {
        let result: Result<ClientEvent, _> = serde_json::from_str(r#"{"type":"viewer-ready"}"#);
        assert!(result.is_err());
    }
}
