//! Loopback signaling demo
//!
//! Run with: cargo run --example loopback
//!
//! Drives a complete broadcaster/viewer handshake through the coordinator
//! without a real transport: one task plays both clients, another prints
//! every message the coordinator addresses to them.

use signaling_rs::{
    ClientEvent, ClientId, Coordinator, CoordinatorConfig, InboundEvent, RoomId, SignalTarget,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("signaling_rs=debug".parse()?),
        )
        .init();

    let (coordinator, mut delivery) = Coordinator::new(CoordinatorConfig::default());
    let (event_tx, event_rx) = coordinator.event_channel();

    let coordinator = std::sync::Arc::new(coordinator);
    let worker = {
        let coordinator = std::sync::Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.run(event_rx).await })
    };

    let printer = tokio::spawn(async move {
        while let Some(message) = delivery.recv().await {
            println!("-> conn {}: {:?}", message.target, message.message);
        }
    });

    let room = RoomId::new("demo");
    let broadcaster = ClientId::new(1);
    let viewer = ClientId::new(2);

    // Broadcaster connects and claims the room
    event_tx.send(InboundEvent::Connected { client: broadcaster }).await?;
    event_tx
        .send(InboundEvent::Message {
            sender: broadcaster,
            event: ClientEvent::BroadcasterReady { room: room.clone() },
        })
        .await?;

    // Viewer connects, discovery points it at the broadcaster
    event_tx.send(InboundEvent::Connected { client: viewer }).await?;
    event_tx
        .send(InboundEvent::Message {
            sender: viewer,
            event: ClientEvent::ViewerReady { room: room.clone() },
        })
        .await?;

    // Negotiation round trip
    event_tx
        .send(InboundEvent::Message {
            sender: broadcaster,
            event: ClientEvent::Offer {
                room: room.clone(),
                target: viewer,
                payload: serde_json::json!({ "sdp": "v=0 (offer)" }),
            },
        })
        .await?;
    event_tx
        .send(InboundEvent::Message {
            sender: viewer,
            event: ClientEvent::Answer {
                room: room.clone(),
                target: SignalTarget::Peer(broadcaster),
                payload: serde_json::json!({ "sdp": "v=0 (answer)" }),
            },
        })
        .await?;
    event_tx
        .send(InboundEvent::Message {
            sender: viewer,
            event: ClientEvent::Candidate {
                room: room.clone(),
                target: SignalTarget::Peer(broadcaster),
                payload: serde_json::json!({ "candidate": "candidate:0 1 UDP ..." }),
            },
        })
        .await?;

    // Broadcaster leaves; the viewer is told to tear down
    event_tx.send(InboundEvent::Disconnected { client: broadcaster }).await?;

    drop(event_tx);
    worker.await?;
    println!("stats: {:?}", coordinator.stats().snapshot());

    drop(coordinator);
    printer.await?;
    Ok(())
}
