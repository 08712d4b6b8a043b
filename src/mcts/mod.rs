//! Decision engine: time-budgeted Monte Carlo Tree Search.
//!
//! ## Overview
//!
//! - **Controlled-player tree**: nodes expand only for the player being
//!   controlled; each edge is one of its legal actions
//! - **Opponent modeling**: opponent actions are sampled per turn from an
//!   `OpponentPolicy` and resolved simultaneously with ours
//! - **Rollouts + heuristic**: leaves are scored by a short rollout and a
//!   pluggable `Heuristic`
//! - **Anytime**: the search polls a wall-clock deadline and always yields
//!   an action (stay, at worst)
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use hypersonic::core::{PlayerId, RulesConfig};
//! use hypersonic::mcts::{MCTSConfig, MCTSSearch};
//! use hypersonic::rules::TurnResolver;
//!
//! let rules = TurnResolver::new(RulesConfig::default());
//! let state = rules.standard_game(2).unwrap();
//!
//! let config = MCTSConfig::default().with_max_iterations(50);
//! let mut search = MCTSSearch::new(rules, config);
//! let action = search.choose_action(&state, PlayerId::new(0), Duration::from_millis(100));
//! println!("{action}");
//! ```

pub mod config;
pub mod heuristic;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

pub use config::MCTSConfig;
pub use heuristic::{DefaultHeuristic, Heuristic, HeuristicWeights, Reach};
pub use node::{Edge, MCTSNode, NodeId};
pub use policy::{
    discount, result_to_rewards, CautiousOpponent, OpponentPolicy, RandomSimulation,
    SafeRandomSimulation, SelectionPolicy, SimulationPolicy, UniformOpponent, DRAW_REWARD, UCB1,
};
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
