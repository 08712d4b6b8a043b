//! Game rules: the turn resolver and the analyses built on it.
//!
//! - `engine`: `TurnResolver`, the deterministic state transition, plus
//!   legal actions, terminal detection and ranking
//! - `blast`: blast coverage and chain-reaction fixed point
//! - `danger`: forecast of pending blasts and escape search

pub mod blast;
pub mod danger;
pub mod engine;

pub use blast::{blast_cells, detonate, Coverage, Detonation};
pub use danger::{can_escape, safe_actions, Forecast};
pub use engine::{ActionList, GameResult, RulesEngine, TurnResolver};
