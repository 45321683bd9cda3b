//! Connection lifecycle state
//!
//! Each transport connection has one [`ConnectionState`] tracking its room,
//! declared role, and liveness.

pub mod state;

pub use state::{ConnectionState, Role, SessionPhase};
