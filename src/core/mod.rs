//! Core types: board geometry, players, entities, state, actions, RNG,
//! configuration and errors.
//!
//! Everything here is plain data. The rules that move a state forward live
//! in `rules`; the search that picks actions lives in `mcts`.

pub mod cell;
pub mod grid;
pub mod player;
pub mod entity;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod error;

pub use cell::{Cell, Direction};
pub use grid::{Grid, Terrain, STANDARD_LAYOUT, START_CELLS};
pub use player::{PlayerId, PlayerMap, MAX_PLAYERS};
pub use entity::{Bomb, Entity, ItemKind, Player};
pub use rng::GameRng;
pub use config::RulesConfig;
pub use action::{Action, ActionRecord, TurnActions};
pub use state::{GameState, Snapshot};
pub use error::{ActionParseError, GridError, StateError};
