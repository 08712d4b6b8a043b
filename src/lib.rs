//! # hypersonic
//!
//! Turn simulation and a search-based decision engine for a Bomberman-style
//! grid battle.
//!
//! ## Design Principles
//!
//! 1. **Deterministic rules**: resolving a turn is a pure function of the
//!    state and the submitted actions. The rules consume no randomness.
//!
//! 2. **N-Player First**: rosters of one to four players; every per-player
//!    value lives in a `PlayerMap`.
//!
//! 3. **Anytime decisions**: the search always answers within its time
//!    budget, falling back to staying put.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so every
//!   hypothetical future explored by the search owns its own state.
//!
//! - **Controlled-player MCTS**: only expand nodes for the player we
//!   control; opponents are sampled and resolved simultaneously.
//!
//! ## Modules
//!
//! - `core`: cells, grid, players, entities, actions, state, RNG, errors
//! - `rules`: turn resolver, blast propagation, danger forecast
//! - `mcts`: Monte Carlo Tree Search decision engine
//! - `runner`: offline matches between controllers
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use hypersonic::{Match, MCTSConfig, RulesConfig, ScriptedController, SearchController, TurnResolver};
//!
//! let rules = TurnResolver::new(RulesConfig::default().with_max_turns(20));
//! let state = rules.standard_game(2).unwrap();
//!
//! let bot = SearchController::new(
//!     rules.clone(),
//!     MCTSConfig::default().with_max_iterations(30),
//!     Duration::from_millis(50),
//! );
//! let game = Match::new(rules, state, vec![Box::new(bot), Box::new(ScriptedController::default())]).unwrap();
//!
//! let outcome = game.run();
//! assert!(outcome.turns <= 20);
//! ```

pub mod core;
pub mod mcts;
pub mod rules;
pub mod runner;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, Bomb, Cell, Direction, Entity, GameRng, GameState, Grid, ItemKind,
    Player, PlayerId, PlayerMap, RulesConfig, Snapshot, Terrain, TurnActions,
};

pub use crate::core::{ActionParseError, GridError, StateError};

pub use crate::rules::{can_escape, safe_actions, Forecast, GameResult, RulesEngine, TurnResolver};

pub use crate::mcts::{DefaultHeuristic, Heuristic, MCTSConfig, MCTSSearch, SearchStats};

pub use crate::runner::{Controller, Match, MatchOutcome, RandomController, ScriptedController, SearchController};
