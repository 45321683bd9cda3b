//! Statistics for the signaling coordinator

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-lifetime coordinator counters
///
/// Updated by the router on its hot path, so everything is a relaxed
/// atomic; readers take a [`snapshot`](CoordinatorStats::snapshot).
#[derive(Debug, Default)]
pub struct CoordinatorStats {
    /// Connections ever registered
    connections_total: AtomicU64,
    /// Messages handed to the delivery channel
    messages_routed: AtomicU64,
    /// Messages dropped because their target was unknown or closed
    routing_misses: AtomicU64,
    /// Events rejected (malformed envelope or state conflict)
    events_rejected: AtomicU64,
}

impl CoordinatorStats {
    /// Create a zeroed counter set
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_connection(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery(&self) {
        self.messages_routed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.routing_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejection(&self) {
        self.events_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough point-in-time view of the counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            messages_routed: self.messages_routed.load(Ordering::Relaxed),
            routing_misses: self.routing_misses.load(Ordering::Relaxed),
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`CoordinatorStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Connections ever registered
    pub connections_total: u64,
    /// Messages handed to the delivery channel
    pub messages_routed: u64,
    /// Messages dropped because their target was unknown or closed
    pub routing_misses: u64,
    /// Events rejected (malformed envelope or state conflict)
    pub events_rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_starts_zeroed() {
        let stats = CoordinatorStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_counters_accumulate() {
        let stats = CoordinatorStats::new();

        stats.record_connection();
        stats.record_delivery();
        stats.record_delivery();
        stats.record_miss();
        stats.record_rejection();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.connections_total, 1);
        assert_eq!(snapshot.messages_routed, 2);
        assert_eq!(snapshot.routing_misses, 1);
        assert_eq!(snapshot.events_rejected, 1);
    }
}
