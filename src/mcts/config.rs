//! MCTS configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// UCB1 exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Maximum tree depth in turns (0 = unlimited).
    pub max_depth: u32,

    /// Turns simulated by a rollout before the heuristic scores the state.
    pub rollout_depth: u32,

    /// Maximum nodes to allocate in the tree.
    /// Prevents memory exhaustion on long budgets.
    pub max_nodes: usize,

    /// Iteration cap (0 = bounded by time only).
    /// With a cap and a generous budget, searches are reproducible.
    pub max_iterations: u32,

    /// Random seed for opponent sampling and rollouts.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// Per-turn discount (1.0 = no discount).
    /// Values < 1.0 pull distant outcomes toward neutral, so early deaths
    /// weigh more than late ones.
    pub gamma: f64,

    /// Slice of the time budget kept in reserve on top of the search's own
    /// estimate of its slowest unit of work. Absorbs scheduling jitter.
    pub time_reserve: Duration,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            max_depth: 12,
            rollout_depth: 8,
            max_nodes: 100_000,
            max_iterations: 0,
            seed: 42,
            gamma: 0.95,
            time_reserve: Duration::from_millis(2),
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with custom max depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Cap the number of iterations per search.
    #[must_use]
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    #[must_use]
    pub fn with_time_reserve(mut self, reserve: Duration) -> Self {
        self.time_reserve = reserve;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.max_depth, 12);
        assert_eq!(config.max_iterations, 0);
        assert_eq!(config.seed, 42);
        assert_eq!(config.time_reserve, Duration::from_millis(2));
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_exploration(2.0)
            .with_seed(123)
            .with_max_depth(50)
            .with_rollout_depth(3)
            .with_max_iterations(400)
            .with_gamma(1.0);

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.rollout_depth, 3);
        assert_eq!(config.max_iterations, 400);
        assert_eq!(config.gamma, 1.0);
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::default().with_time_reserve(Duration::from_millis(5));
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
