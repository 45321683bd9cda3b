//! Outbound messages emitted by the coordinator
//!
//! Room-wide notifications are fanned out by the coordinator itself, so the
//! delivery channel only ever carries messages addressed to exactly one
//! connection. The transport forwards each message to its target and needs
//! no knowledge of rooms.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{ClientId, RoomId};

/// A signaling message for a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// A broadcaster claimed the room the recipient is in
    BroadcasterAvailable,

    /// A viewer is waiting for the recipient's offer
    ViewerConnected { viewer_id: ClientId },

    /// No broadcaster is active in the room the recipient asked about
    NoBroadcaster { room: RoomId },

    /// Relayed session offer
    Offer {
        room: RoomId,
        sender: ClientId,
        payload: Value,
    },

    /// Relayed session answer
    Answer {
        room: RoomId,
        sender: ClientId,
        payload: Value,
    },

    /// Relayed ICE candidate
    Candidate {
        room: RoomId,
        sender: ClientId,
        payload: Value,
    },

    /// The room's broadcaster is gone; viewers must tear down their side
    BroadcasterDisconnected { room: RoomId },
}

/// A message paired with the connection it is for
///
/// This is what the coordinator pushes onto the delivery channel. Sends are
/// fire-and-forget: a message whose target disconnects before delivery is
/// simply dropped by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressedMessage {
    /// Connection to deliver to
    pub target: ClientId,
    /// Message body
    pub message: ServerMessage,
}

impl AddressedMessage {
    /// Address a message to a single connection
    pub fn to(target: ClientId, message: ServerMessage) -> Self {
        Self { target, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_names() {
        let json = serde_json::to_value(ServerMessage::ViewerConnected {
            viewer_id: ClientId::new(3),
        })
        .unwrap();
        assert_eq!(json["type"], "viewer-connected");
        assert_eq!(json["viewerId"], 3);

        let json = serde_json::to_value(ServerMessage::NoBroadcaster {
            room: RoomId::new("r2"),
        })
        .unwrap();
        assert_eq!(json["type"], "no-broadcaster");
        assert_eq!(json["room"], "r2");
    }

    #[test]
    fn test_relay_payload_passes_through() {
        let payload = serde_json::json!({"sdp": "v=0\r\no=- 42", "kind": "offer"});
        let message = ServerMessage::Offer {
            room: RoomId::new("r1"),
            sender: ClientId::new(1),
            payload: payload.clone(),
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["payload"], payload);
    }
}
