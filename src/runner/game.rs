//! A whole match played in-process.
//!
//! Each `step` asks every living player's controller for an action,
//! records it, and feeds the resolver's output back in as the next state.
//! No protocol or server is involved.

use crate::core::{ActionRecord, GameState, PlayerId, StateError, TurnActions};
use crate::rules::{GameResult, RulesEngine, TurnResolver};

use super::controller::Controller;

/// Final report of a finished match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOutcome {
    pub result: GameResult,
    /// Best first: survivors, then the eliminated by elimination turn.
    pub ranking: Vec<PlayerId>,
    /// Turns resolved.
    pub turns: u32,
    /// Every submitted action, in resolution order.
    pub history: Vec<ActionRecord>,
    pub final_state: GameState,
}

/// A running match.
pub struct Match {
    rules: TurnResolver,
    state: GameState,
    controllers: Vec<Box<dyn Controller>>,
    history: Vec<ActionRecord>,
}

impl Match {
    /// One controller per roster slot, in player id order.
    pub fn new(
        rules: TurnResolver,
        state: GameState,
        controllers: Vec<Box<dyn Controller>>,
    ) -> Result<Self, StateError> {
        if controllers.len() != state.player_count() {
            return Err(StateError::PlayerCount(controllers.len()));
        }
        Ok(Self {
            rules,
            state,
            controllers,
            history: Vec::new(),
        })
    }

    /// Resolve one turn.
    ///
    /// Returns the result once the match is over; a finished match is not
    /// advanced any further.
    pub fn step(&mut self) -> Option<GameResult> {
        if let Some(result) = self.rules.is_terminal(&self.state) {
            return Some(result);
        }

        let turn = self.state.turn();
        let mut actions = TurnActions::with_value(self.state.player_count(), None);
        for id in self.state.players().player_ids() {
            if !self.state.player(id).alive {
                continue;
            }
            let action = self.controllers[id.index()].act(&self.rules, &self.state, id);
            self.history.push(ActionRecord::new(id, action, turn));
            actions[id] = Some(action);
        }

        let next = self.rules.resolve(&self.state, &actions);
        for player in next.players().values() {
            if !player.alive && self.state.player(player.id).alive {
                tracing::info!(player = %player.id, cell = %player.cell, turn, "player eliminated");
            }
        }
        self.state = next;

        let result = self.rules.is_terminal(&self.state);
        if let Some(result) = &result {
            tracing::info!(?result, turns = self.state.turn(), "match over");
        }
        result
    }

    /// Play until the match ends.
    pub fn run(mut self) -> MatchOutcome {
        let result = loop {
            if let Some(result) = self.step() {
                break result;
            }
        };

        MatchOutcome {
            ranking: self.rules.ranking(&self.state),
            turns: self.state.turn(),
            result,
            history: self.history,
            final_state: self.state,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    #[must_use]
    pub fn rules(&self) -> &TurnResolver {
        &self.rules
    }
}
