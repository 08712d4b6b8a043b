//! Who decides what a player does each turn.

use std::collections::VecDeque;
use std::time::Duration;

use crate::core::{Action, GameRng, GameState, PlayerId};
use crate::mcts::{MCTSConfig, MCTSSearch};
use crate::rules::{safe_actions, RulesEngine, TurnResolver};

/// Source of one player's actions during a match.
pub trait Controller {
    /// Action `player` submits for the turn about to be resolved.
    fn act(&mut self, rules: &TurnResolver, state: &GameState, player: PlayerId) -> Action;
}

/// Plays with the decision engine, one search per turn.
pub struct SearchController {
    search: MCTSSearch<TurnResolver>,
    budget: Duration,
}

impl SearchController {
    #[must_use]
    pub fn new(rules: TurnResolver, config: MCTSConfig, budget: Duration) -> Self {
        Self {
            search: MCTSSearch::new(rules, config),
            budget,
        }
    }

    /// Wrap an already configured search.
    #[must_use]
    pub fn from_search(search: MCTSSearch<TurnResolver>, budget: Duration) -> Self {
        Self { search, budget }
    }

    #[must_use]
    pub fn search(&self) -> &MCTSSearch<TurnResolver> {
        &self.search
    }
}

impl Controller for SearchController {
    fn act(&mut self, _rules: &TurnResolver, state: &GameState, player: PlayerId) -> Action {
        self.search.choose_action(state, player, self.budget)
    }
}

/// Replays a fixed list of actions, then stays forever.
#[derive(Clone, Debug, Default)]
pub struct ScriptedController {
    script: VecDeque<Action>,
}

impl ScriptedController {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Action>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Actions not played yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Controller for ScriptedController {
    fn act(&mut self, _rules: &TurnResolver, state: &GameState, player: PlayerId) -> Action {
        self.script
            .pop_front()
            .unwrap_or_else(|| Action::stay(state.player(player).cell))
    }
}

/// Random moves that never walk into an inescapable blast when avoidable.
#[derive(Clone, Debug)]
pub struct RandomController {
    rng: GameRng,
}

impl RandomController {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Controller for RandomController {
    fn act(&mut self, rules: &TurnResolver, state: &GameState, player: PlayerId) -> Action {
        let safe = safe_actions(rules, state, player);
        let pick = if safe.is_empty() {
            self.rng.choose(&rules.legal_actions(state, player)).copied()
        } else {
            self.rng.choose(&safe).copied()
        };
        pick.unwrap_or_else(|| Action::stay(state.player(player).cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cell, Grid, RulesConfig};

    fn setup() -> (TurnResolver, GameState) {
        let rules = TurnResolver::new(RulesConfig::default());
        let state = rules.new_game(Grid::new(3, 3), &[Cell::new(0, 0), Cell::new(2, 2)]).unwrap();
        (rules, state)
    }

    #[test]
    fn test_scripted_then_stay() {
        let (rules, state) = setup();
        let mut controller = ScriptedController::new([Action::move_to(Cell::new(0, 1))]);

        assert_eq!(
            controller.act(&rules, &state, PlayerId::new(0)),
            Action::move_to(Cell::new(0, 1))
        );
        assert_eq!(controller.remaining(), 0);
        assert_eq!(
            controller.act(&rules, &state, PlayerId::new(0)),
            Action::stay(Cell::new(0, 0))
        );
    }

    #[test]
    fn test_random_controller_is_legal_and_seeded() {
        let (rules, state) = setup();
        let legal = rules.legal_actions(&state, PlayerId::new(1));

        let mut a = RandomController::new(3);
        let mut b = RandomController::new(3);
        for _ in 0..10 {
            let action = a.act(&rules, &state, PlayerId::new(1));
            assert!(legal.contains(&action));
            assert_eq!(action, b.act(&rules, &state, PlayerId::new(1)));
        }
    }

    #[test]
    fn test_search_controller_acts() {
        let (rules, state) = setup();
        let config = MCTSConfig::default().with_max_iterations(20).with_rollout_depth(2);
        let mut controller = SearchController::new(rules.clone(), config, Duration::from_secs(10));

        let action = controller.act(&rules, &state, PlayerId::new(0));

        assert!(rules.legal_actions(&state, PlayerId::new(0)).contains(&action));
        assert_eq!(controller.search().stats().iterations, 20);
    }
}
