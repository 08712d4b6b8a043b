//! Counters for one search, for logging and tuning.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Iterations that completed and were backed up.
    pub iterations: u32,
    /// Iterations cut by the deadline and thrown away.
    pub aborted: u32,
    pub nodes_expanded: u32,
    /// Rollouts that reached a result or their depth limit.
    pub simulations: u32,
    /// Turns resolved inside rollouts, summed.
    pub rollout_turns: u64,
    pub max_depth: u16,
    pub time_us: u64,
}

impl SearchStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        match self.time_us {
            0 => 0.0,
            us => f64::from(self.iterations) * 1e6 / us as f64,
        }
    }

    /// Average rollout length in turns.
    #[must_use]
    pub fn mean_rollout_turns(&self) -> f64 {
        match self.simulations {
            0 => 0.0,
            n => self.rollout_turns as f64 / f64::from(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let stats = SearchStats {
            iterations: 1000,
            time_us: 500_000,
            simulations: 4,
            rollout_turns: 10,
            ..SearchStats::default()
        };

        assert_eq!(stats.iterations_per_second(), 2000.0);
        assert_eq!(stats.mean_rollout_turns(), 2.5);
        assert_eq!(SearchStats::new().iterations_per_second(), 0.0);
        assert_eq!(SearchStats::new().mean_rollout_turns(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut stats = SearchStats {
            iterations: 100,
            aborted: 1,
            ..SearchStats::default()
        };

        stats.reset();

        assert_eq!(stats, SearchStats::default());
    }
}
