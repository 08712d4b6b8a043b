//! Rule-set configuration.
//!
//! The engine models exactly one rule set; the knobs here are its constants,
//! exposed so tests and the offline runner can shrink matches.

use serde::{Deserialize, Serialize};

/// Constants of the rule set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Countdown a freshly placed bomb starts with.
    pub fuse_length: u8,

    /// The match ends once this many turns have been resolved.
    pub max_turns: u32,

    /// Bomb capacity every player starts with.
    pub initial_capacity: u8,

    /// Blast reach every player starts with, not counting the bomb cell.
    /// Hypersonic's "range 3" corresponds to 2 here.
    pub initial_range: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            fuse_length: 8,
            max_turns: 200,
            initial_capacity: 1,
            initial_range: 2,
        }
    }
}

impl RulesConfig {
    /// Set the bomb fuse length.
    #[must_use]
    pub fn with_fuse_length(mut self, turns: u8) -> Self {
        assert!(turns > 0, "Fuse length must be at least 1");
        self.fuse_length = turns;
        self
    }

    /// Set the turn limit.
    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    /// Set the starting bomb capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: u8) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the starting blast range.
    #[must_use]
    pub fn with_initial_range(mut self, range: u8) -> Self {
        self.initial_range = range;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RulesConfig::default();
        assert_eq!(config.fuse_length, 8);
        assert_eq!(config.max_turns, 200);
        assert_eq!(config.initial_capacity, 1);
        assert_eq!(config.initial_range, 2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RulesConfig::default()
            .with_fuse_length(3)
            .with_max_turns(20)
            .with_initial_capacity(2)
            .with_initial_range(4);

        assert_eq!(config.fuse_length, 3);
        assert_eq!(config.max_turns, 20);
        assert_eq!(config.initial_capacity, 2);
        assert_eq!(config.initial_range, 4);
    }

    #[test]
    #[should_panic(expected = "Fuse length must be at least 1")]
    fn test_zero_fuse_rejected() {
        let _ = RulesConfig::default().with_fuse_length(0);
    }

    #[test]
    fn test_serialization() {
        let config = RulesConfig::default().with_max_turns(50);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: RulesConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
