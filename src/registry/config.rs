//! Coordinator configuration

/// Configuration options for the signaling coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Capacity of the inbound event channel
    ///
    /// Bounded so a flooding transport sees backpressure instead of
    /// unbounded memory growth.
    pub event_capacity: usize,

    /// Maximum members per room (0 = unlimited)
    pub max_room_members: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            event_capacity: 256,
            max_room_members: 0, // Unlimited
        }
    }
}

impl CoordinatorConfig {
    /// Set the inbound event channel capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Set the per-room member limit
    pub fn max_room_members(mut self, max: usize) -> Self {
        self.max_room_members = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();

        assert_eq!(config.event_capacity, 256);
        assert_eq!(config.max_room_members, 0);
    }

    #[test]
    fn test_builder_event_capacity() {
        let config = CoordinatorConfig::default().event_capacity(16);

        assert_eq!(config.event_capacity, 16);
    }

    #[test]
    fn test_builder_event_capacity_floor() {
        // A zero-capacity channel cannot exist
        let config = CoordinatorConfig::default().event_capacity(0);

        assert_eq!(config.event_capacity, 1);
    }

    #[test]
    fn test_builder_chaining() {
        let config = CoordinatorConfig::default()
            .event_capacity(64)
            .max_room_members(12);

        assert_eq!(config.event_capacity, 64);
        assert_eq!(config.max_room_members, 12);
    }
}
