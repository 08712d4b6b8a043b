//! MCTS policies for selection, simulation, and opponent modeling.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: which edge to follow at a fully expanded node (UCB1)
//! - `SimulationPolicy`: what each player does during a rollout
//! - `OpponentPolicy`: what opponents do while descending the tree

use crate::core::{Action, GameRng, GameState, PlayerId, PlayerMap};
use crate::rules::{safe_actions, GameResult, RulesEngine};

use super::config::MCTSConfig;
use super::node::MCTSNode;

/// Reward every player gets when all players die together.
///
/// Lower than a typical living position, higher than an outright loss.
pub const DRAW_REWARD: f64 = 0.25;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Select the edge index to follow from a node.
    fn select(&self, node: &MCTSNode, player: PlayerId, config: &MCTSConfig) -> usize;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Balances exploitation (high reward) with exploration (low visits).
/// Formula: Q(a) + c * sqrt(ln(N) / n(a))
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn select(&self, node: &MCTSNode, player: PlayerId, config: &MCTSConfig) -> usize {
        let ln_parent = (node.visits.max(1) as f64).ln();

        node.edges
            .iter()
            .enumerate()
            .map(|(i, edge)| {
                let exploitation = edge.mean_reward(player);
                let exploration = if edge.visits == 0 {
                    f64::INFINITY
                } else {
                    config.exploration_constant * (ln_parent / edge.visits as f64).sqrt()
                };
                (i, exploitation + exploration)
            })
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy choosing every living player's action during a rollout.
pub trait SimulationPolicy<E: RulesEngine>: Send + Sync {
    /// Pick an action for `player`, or `None` to stay.
    fn rollout_action(
        &self,
        engine: &E,
        state: &GameState,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Action>;
}

/// Uniformly random legal actions.
#[derive(Clone, Debug, Default)]
pub struct RandomSimulation;

impl<E: RulesEngine> SimulationPolicy<E> for RandomSimulation {
    fn rollout_action(
        &self,
        engine: &E,
        state: &GameState,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Action> {
        rng.choose(&engine.legal_actions(state, player)).copied()
    }
}

/// Random actions among those that keep an escape route open.
///
/// Falls back to any legal action when nothing is safe. Much slower per
/// step than `RandomSimulation`, but rollouts stop committing suicide, which
/// makes their outcomes meaningful.
#[derive(Clone, Debug, Default)]
pub struct SafeRandomSimulation;

impl<E: RulesEngine> SimulationPolicy<E> for SafeRandomSimulation {
    fn rollout_action(
        &self,
        engine: &E,
        state: &GameState,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Action> {
        let safe = safe_actions(engine, state, player);
        if safe.is_empty() {
            return rng.choose(&engine.legal_actions(state, player)).copied();
        }
        rng.choose(&safe).copied()
    }
}

// =============================================================================
// Opponent Policy
// =============================================================================

/// Policy for sampling opponent actions during tree traversal.
pub trait OpponentPolicy<E: RulesEngine>: Send + Sync {
    /// Choose an action for an opponent.
    ///
    /// Returns `None` if no legal actions exist.
    fn choose_action(
        &self,
        engine: &E,
        state: &GameState,
        opponent: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Action>;
}

/// Uniform random opponent policy.
#[derive(Clone, Debug, Default)]
pub struct UniformOpponent;

impl<E: RulesEngine> OpponentPolicy<E> for UniformOpponent {
    fn choose_action(
        &self,
        engine: &E,
        state: &GameState,
        opponent: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Action> {
        rng.choose(&engine.legal_actions(state, opponent)).copied()
    }
}

/// Opponents that never walk into a blast they cannot escape.
#[derive(Clone, Debug, Default)]
pub struct CautiousOpponent;

impl<E: RulesEngine> OpponentPolicy<E> for CautiousOpponent {
    fn choose_action(
        &self,
        engine: &E,
        state: &GameState,
        opponent: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Action> {
        SafeRandomSimulation.rollout_action(engine, state, opponent, rng)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert a game result to per-player rewards.
pub fn result_to_rewards(result: &GameResult, player_count: usize) -> PlayerMap<f64> {
    PlayerMap::new(player_count, |player| match result {
        GameResult::Winner(winner) => {
            if *winner == player {
                1.0
            } else {
                0.0
            }
        }
        GameResult::Winners(winners) => {
            if winners.contains(&player) {
                1.0
            } else {
                0.0
            }
        }
        GameResult::Draw => DRAW_REWARD,
    })
}

/// Pull rewards `turns` turns away toward the neutral 0.5.
pub fn discount(mut rewards: PlayerMap<f64>, turns: u32, gamma: f64) -> PlayerMap<f64> {
    if gamma >= 1.0 {
        return rewards;
    }
    let factor = gamma.powi(turns.min(i32::MAX as u32) as i32);
    for (_, reward) in rewards.iter_mut() {
        *reward = 0.5 + factor * (*reward - 0.5);
    }
    rewards
}
