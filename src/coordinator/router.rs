//! Signaling coordinator
//!
//! Owns the registry and routes every inbound event to the right state
//! change and outbound deliveries. The transport talks to the coordinator
//! through two channels: a bounded inbound channel of tagged events and an
//! unbounded delivery channel of addressed messages, so routing never
//! blocks on transport I/O.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{Result, SignalingError};
use crate::protocol::{
    AddressedMessage, ClientEvent, ClientId, InboundEvent, RoomId, ServerMessage, SignalTarget,
};
use crate::registry::{CoordinatorConfig, RegistryError, SignalingRegistry};
use crate::stats::CoordinatorStats;

/// Which negotiation message a relay carries
#[derive(Debug, Clone, Copy)]
enum RelayKind {
    Answer,
    Candidate,
}

/// The signaling coordinator
///
/// One coordinator serves all rooms. Events from a single connection are
/// handled in delivery order; events from different connections interleave
/// arbitrarily, with the registry's locking keeping every room mutation
/// atomic.
pub struct Coordinator {
    registry: Arc<SignalingRegistry>,
    outbox: mpsc::UnboundedSender<AddressedMessage>,
    stats: Arc<CoordinatorStats>,
}

impl Coordinator {
    /// Create a coordinator and the receiving end of its delivery channel
    ///
    /// The transport drains the returned receiver and forwards each message
    /// to its target connection.
    pub fn new(config: CoordinatorConfig) -> (Self, mpsc::UnboundedReceiver<AddressedMessage>) {
        let (outbox, delivery) = mpsc::unbounded_channel();

        let coordinator = Self {
            registry: Arc::new(SignalingRegistry::with_config(config)),
            outbox,
            stats: Arc::new(CoordinatorStats::new()),
        };
        (coordinator, delivery)
    }

    /// Get a reference to the registry
    pub fn registry(&self) -> &Arc<SignalingRegistry> {
        &self.registry
    }

    /// Get a reference to the coordinator counters
    pub fn stats(&self) -> &Arc<CoordinatorStats> {
        &self.stats
    }

    /// Create the inbound event channel at the configured capacity
    pub fn event_channel(&self) -> (mpsc::Sender<InboundEvent>, mpsc::Receiver<InboundEvent>) {
        mpsc::channel(self.registry.config().event_capacity)
    }

    /// Drive the coordinator until the event channel closes
    ///
    /// A rejected event is logged and counted, never fatal; only the
    /// delivery channel closing (transport shutdown) stops the loop early.
    pub async fn run(&self, mut events: mpsc::Receiver<InboundEvent>) {
        while let Some(event) = events.recv().await {
            match self.handle(event).await {
                Ok(()) => {}
                Err(SignalingError::DeliveryClosed) => {
                    tracing::info!("Delivery channel closed, coordinator stopping");
                    return;
                }
                Err(error) => {
                    self.stats.record_rejection();
                    tracing::warn!(error = %error, "Event rejected");
                }
            }
        }
        tracing::info!("Event channel closed, coordinator stopped");
    }

    /// Handle a single inbound event
    pub async fn handle(&self, event: InboundEvent) -> Result<()> {
        match event {
            InboundEvent::Connected { client } => self.handle_connect(client).await,
            InboundEvent::Message { sender, event } => self.handle_message(sender, event).await,
            InboundEvent::Disconnected { client } => self.handle_disconnect(client).await,
        }
    }

    async fn handle_connect(&self, client: ClientId) -> Result<()> {
        self.registry.register(client).await?;
        self.stats.record_connection();
        Ok(())
    }

    async fn handle_message(&self, sender: ClientId, event: ClientEvent) -> Result<()> {
        // A message can race its own connection's disconnect; cleanup wins
        // and the stale event must not resurrect any state.
        if !self.registry.is_live(sender).await {
            tracing::debug!(client = %sender, "Dropping event from closed connection");
            return Ok(());
        }

        match event {
            ClientEvent::JoinRoom { room } => self.handle_join(sender, room).await,
            ClientEvent::BroadcasterReady { room } => {
                self.handle_broadcaster_ready(sender, room).await
            }
            ClientEvent::ViewerReady { room } => self.handle_viewer_ready(sender, room).await,
            ClientEvent::Offer {
                room,
                target,
                payload,
            } => self.handle_offer(sender, room, target, payload).await,
            ClientEvent::Answer {
                room,
                target,
                payload,
            } => {
                self.relay(RelayKind::Answer, sender, room, target, payload)
                    .await
            }
            ClientEvent::Candidate {
                room,
                target,
                payload,
            } => {
                self.relay(RelayKind::Candidate, sender, room, target, payload)
                    .await
            }
            ClientEvent::BroadcasterDisconnected { room } => {
                self.handle_broadcaster_gone(sender, room).await
            }
        }
    }

    /// Assign the sender to a room
    ///
    /// Moving out of a room where the sender was broadcaster notifies that
    /// room's remaining members, exactly as a disconnect would.
    async fn handle_join(&self, sender: ClientId, room: RoomId) -> Result<()> {
        let outcome = self.registry.join_room(&room, sender).await?;

        if let Some(old) = outcome.left {
            if outcome.was_broadcaster {
                self.broadcast(
                    &old,
                    sender,
                    ServerMessage::BroadcasterDisconnected { room: old.clone() },
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn handle_broadcaster_ready(&self, sender: ClientId, room: RoomId) -> Result<()> {
        self.ensure_membership(sender, &room).await?;

        // Re-assertion returns false and announces nothing new
        let granted = self.registry.claim_broadcaster(&room, sender).await?;
        if granted {
            self.broadcast(&room, sender, ServerMessage::BroadcasterAvailable)
                .await?;
        }
        Ok(())
    }

    /// Viewer declaration plus broadcaster discovery
    ///
    /// Exactly one message leaves this handler: `viewer-connected` to the
    /// broadcaster when one exists, otherwise `no-broadcaster` back to the
    /// requester.
    async fn handle_viewer_ready(&self, sender: ClientId, room: RoomId) -> Result<()> {
        self.ensure_membership(sender, &room).await?;
        self.registry.assign_viewer(&room, sender).await?;

        match self.registry.find_broadcaster(&room, sender).await {
            Some(broadcaster) => {
                self.deliver(broadcaster, ServerMessage::ViewerConnected { viewer_id: sender })
            }
            None => self.deliver(sender, ServerMessage::NoBroadcaster { room }),
        }
    }

    /// Forward an offer to a single viewer
    async fn handle_offer(
        &self,
        sender: ClientId,
        room: RoomId,
        target: ClientId,
        payload: Value,
    ) -> Result<()> {
        Self::check_payload(&payload)?;
        self.require_membership(sender, &room).await?;

        if self.registry.member_live(&room, target).await {
            self.deliver(
                target,
                ServerMessage::Offer {
                    room,
                    sender,
                    payload,
                },
            )
        } else {
            // Expected churn: the target's own cleanup supersedes the offer
            self.stats.record_miss();
            tracing::debug!(
                client = %sender,
                target = %target,
                room = %room,
                "Offer dropped: target gone"
            );
            Ok(())
        }
    }

    /// Forward an answer or candidate per its explicit addressing mode
    async fn relay(
        &self,
        kind: RelayKind,
        sender: ClientId,
        room: RoomId,
        target: SignalTarget,
        payload: Value,
    ) -> Result<()> {
        Self::check_payload(&payload)?;
        self.require_membership(sender, &room).await?;

        match target {
            SignalTarget::Peer(peer) => {
                if self.registry.member_live(&room, peer).await {
                    self.deliver(peer, Self::relay_message(kind, room, sender, payload))
                } else {
                    self.stats.record_miss();
                    tracing::debug!(
                        client = %sender,
                        target = %peer,
                        room = %room,
                        "Relay dropped: target gone"
                    );
                    Ok(())
                }
            }
            SignalTarget::Room => {
                for member in self.registry.members(&room).await {
                    if member != sender {
                        self.deliver(
                            member,
                            Self::relay_message(kind, room.clone(), sender, payload.clone()),
                        )?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Explicit broadcaster teardown without a transport disconnect
    async fn handle_broadcaster_gone(&self, sender: ClientId, room: RoomId) -> Result<()> {
        if self.registry.release_broadcaster(&room, sender).await {
            self.broadcast(
                &room,
                sender,
                ServerMessage::BroadcasterDisconnected { room: room.clone() },
            )
            .await?;
        }
        Ok(())
    }

    /// Transport-level disconnect: evict and notify
    ///
    /// Safe to call more than once; the second eviction finds nothing.
    async fn handle_disconnect(&self, client: ClientId) -> Result<()> {
        let Some(departure) = self.registry.remove(client).await else {
            return Ok(());
        };

        if departure.was_broadcaster {
            if let Some(room) = departure.room {
                for member in departure.remaining {
                    self.deliver(
                        member,
                        ServerMessage::BroadcasterDisconnected { room: room.clone() },
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Join the sender to `room` unless it is already a member
    async fn ensure_membership(&self, sender: ClientId, room: &RoomId) -> Result<()> {
        if self.registry.current_room(sender).await.as_ref() == Some(room) {
            return Ok(());
        }
        self.handle_join(sender, room.clone()).await
    }

    /// Require that the sender is a live member of the room it names
    async fn require_membership(&self, sender: ClientId, room: &RoomId) -> Result<()> {
        if self.registry.member_live(room, sender).await {
            Ok(())
        } else {
            Err(RegistryError::NotInRoom(sender, room.clone()).into())
        }
    }

    fn relay_message(
        kind: RelayKind,
        room: RoomId,
        sender: ClientId,
        payload: Value,
    ) -> ServerMessage {
        match kind {
            RelayKind::Answer => ServerMessage::Answer {
                room,
                sender,
                payload,
            },
            RelayKind::Candidate => ServerMessage::Candidate {
                room,
                sender,
                payload,
            },
        }
    }

    fn check_payload(payload: &Value) -> Result<()> {
        if payload.is_null() {
            return Err(SignalingError::InvalidPayload(
                "negotiation payload is null".into(),
            ));
        }
        Ok(())
    }

    /// Hand one message to the delivery channel
    fn deliver(&self, target: ClientId, message: ServerMessage) -> Result<()> {
        self.outbox
            .send(AddressedMessage::to(target, message))
            .map_err(|_| SignalingError::DeliveryClosed)?;
        self.stats.record_delivery();
        Ok(())
    }

    /// Deliver to every room member except the originator
    async fn broadcast(
        &self,
        room: &RoomId,
        except: ClientId,
        message: ServerMessage,
    ) -> Result<()> {
        for member in self.registry.members(room).await {
            if member != except {
                self.deliver(member, message.clone())?;
            }
        }
        Ok(())
    }
}
