//! Offline match runner.
//!
//! Drives a full match in-process: controllers pick actions, the turn
//! resolver produces the next state, and that state is fed straight back
//! in. Useful for testing bots against each other without a game server.

mod controller;
mod game;

pub use controller::{Controller, RandomController, ScriptedController, SearchController};
pub use game::{Match, MatchOutcome};
