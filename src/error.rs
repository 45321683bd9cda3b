//! Crate-level error types

use thiserror::Error;

use crate::registry::RegistryError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SignalingError>;

/// Errors that can occur while handling a client event.
///
/// None of these terminate a connection. The coordinator's event loop logs
/// the error, discards the offending event, and keeps serving; only a
/// transport-level disconnect closes a connection.
#[derive(Error, Debug)]
pub enum SignalingError {
    /// A registry state change was rejected
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Malformed envelope: a required field was missing, empty, or null
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The outbound delivery channel is closed (transport shut down)
    #[error("delivery channel closed")]
    DeliveryClosed,
}
