//! Event routing
//!
//! The coordinator consumes tagged events from the transport, applies them
//! to the registry, and emits addressed messages on its delivery channel.

pub mod router;

pub use router::Coordinator;
