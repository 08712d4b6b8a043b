//! Core MCTS search algorithm.
//!
//! Nodes are only expanded for the controlled player. Every step down the
//! tree resolves one full turn: the controlled player's edge action plus
//! one sampled action per living opponent, applied simultaneously by the
//! rules engine.
//!
//! ## Time budget
//!
//! The deadline is polled before every descent step, before each player's
//! sampled action, before every resolve and before every leaf evaluation.
//! Each poll also times the work since the previous one and fails once the
//! slowest stretch seen so far would overrun the cutoff. An iteration that
//! hits it is discarded without backpropagation.

use std::time::{Duration, Instant};

use crate::core::{Action, GameRng, GameState, PlayerId, PlayerMap, TurnActions};
use crate::rules::RulesEngine;

use super::config::MCTSConfig;
use super::heuristic::{DefaultHeuristic, Heuristic};
use super::node::NodeId;
use super::policy::{
    discount, result_to_rewards, CautiousOpponent, OpponentPolicy, SafeRandomSimulation,
    SelectionPolicy, SimulationPolicy, UCB1,
};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Generic over the rules engine type. Owns the search tree and
/// configuration; a fresh tree is grown for every decision.
pub struct MCTSSearch<E: RulesEngine> {
    engine: E,
    config: MCTSConfig,
    tree: MCTSTree,

    /// RNG for opponent sampling; rollouts run on forks of it.
    rng: GameRng,

    selection: Box<dyn SelectionPolicy>,
    simulation: Box<dyn SimulationPolicy<E>>,
    opponent: Box<dyn OpponentPolicy<E>>,
    heuristic: Box<dyn Heuristic>,

    stats: SearchStats,
}

impl<E: RulesEngine + 'static> MCTSSearch<E> {
    /// Create a search with UCB1 selection, safe random rollouts, cautious
    /// opponents and the default heuristic.
    pub fn new(engine: E, config: MCTSConfig) -> Self {
        let rules = engine.config();
        let heuristic =
            DefaultHeuristic::default().with_baseline(rules.initial_capacity, rules.initial_range);

        Self {
            rng: GameRng::new(config.seed),
            tree: MCTSTree::with_capacity(1, config.max_nodes),
            engine,
            config,
            selection: Box::new(UCB1),
            simulation: Box::new(SafeRandomSimulation),
            opponent: Box::new(CautiousOpponent),
            heuristic: Box::new(heuristic),
            stats: SearchStats::default(),
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    pub fn with_simulation<S: SimulationPolicy<E> + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Set a custom opponent policy.
    pub fn with_opponent<O: OpponentPolicy<E> + 'static>(mut self, opponent: O) -> Self {
        self.opponent = Box::new(opponent);
        self
    }

    /// Set a custom leaf evaluator.
    pub fn with_heuristic<H: Heuristic + 'static>(mut self, heuristic: H) -> Self {
        self.heuristic = Box::new(heuristic);
        self
    }

    /// Pick the action to submit for `player` this turn.
    ///
    /// Never fails: when the search yields nothing (dead player, finished
    /// match, or not a single completed iteration) the player stays put.
    pub fn choose_action(&mut self, state: &GameState, player: PlayerId, budget: Duration) -> Action {
        match self.search(state, player, budget) {
            Some(action) => action,
            None => {
                let fallback = Action::stay(state.player(player).cell);
                tracing::warn!(%player, %fallback, aborted = self.stats.aborted, "search produced no action");
                fallback
            }
        }
    }

    /// Run a search for `player` within `budget`.
    ///
    /// Returns the most visited root action, or `None` if the player cannot
    /// act or no iteration completed.
    pub fn search(&mut self, state: &GameState, player: PlayerId, budget: Duration) -> Option<Action> {
        let start = Instant::now();
        let mut deadline = Deadline::new(start, start + budget.saturating_sub(self.config.time_reserve));
        self.stats.reset();
        self.tree.reset(state.player_count());

        let root = self.tree.root();
        self.expand_node(root, state, player);
        let root_node = self.tree.get(root);
        if root_node.is_terminal() || root_node.edges.is_empty() {
            return None;
        }
        if root_node.edges.len() == 1 {
            return Some(root_node.edges[0].action);
        }

        loop {
            if self.config.max_iterations > 0 && self.stats.iterations >= self.config.max_iterations {
                break;
            }
            if self.tree.len() >= self.config.max_nodes || deadline.passed() {
                break;
            }
            if self.iteration(state, player, &mut deadline) {
                self.stats.iterations += 1;
            } else {
                self.stats.aborted += 1;
                break;
            }
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        tracing::debug!(
            %player,
            iterations = self.stats.iterations,
            aborted = self.stats.aborted,
            nodes = self.tree.len(),
            depth = self.stats.max_depth,
            time_us = self.stats.time_us,
            line = ?self.tree.principal_variation(),
            "search finished"
        );

        self.best_action()
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    ///
    /// Returns `false` if the deadline interrupted it.
    fn iteration(&mut self, root_state: &GameState, player: PlayerId, deadline: &mut Deadline) -> bool {
        let mut state = root_state.clone();
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = self.tree.root();

        loop {
            if deadline.passed() {
                return false;
            }

            let node = self.tree.get(current);
            let depth = u32::from(node.depth);

            if let Some(rewards) = node.terminal.clone() {
                self.backpropagate(&path, discount(rewards, depth, self.config.gamma));
                return true;
            }

            if self.config.max_depth > 0 && depth >= self.config.max_depth {
                let rewards = self.heuristic.evaluate(&state);
                self.backpropagate(&path, discount(rewards, depth, self.config.gamma));
                return true;
            }

            if node.has_unexpanded() {
                let edge_idx = self.select_unexpanded(current);
                path.push((current, edge_idx));

                let action = self.tree.get(current).edges[edge_idx].action;
                let Some(next) = self.step(&state, player, action, deadline) else {
                    return false;
                };
                state = next;
                let child = self.expand_child(current, edge_idx, &state, player);

                if self.tree.get(child).is_terminal() {
                    current = child;
                    continue;
                }

                let Some((rewards, turns)) = self.rollout(&state, deadline) else {
                    return false;
                };
                self.stats.simulations += 1;
                self.backpropagate(&path, discount(rewards, depth + 1 + turns, self.config.gamma));
                return true;
            }

            let edge_idx = self.selection.select(node, player, &self.config);
            path.push((current, edge_idx));

            let action = self.tree.get(current).edges[edge_idx].action;
            let Some(next) = self.step(&state, player, action, deadline) else {
                return false;
            };
            state = next;
            current = self.tree.get(current).edges[edge_idx].child;
        }
    }

    /// Resolve one turn: `action` for the controlled player, sampled
    /// actions for every living opponent. `None` if the deadline passed.
    fn step(
        &mut self,
        state: &GameState,
        player: PlayerId,
        action: Action,
        deadline: &mut Deadline,
    ) -> Option<GameState> {
        let mut actions = TurnActions::with_value(state.player_count(), None);
        for opponent in state.alive_players().map(|p| p.id).filter(|&id| id != player) {
            if deadline.passed() {
                return None;
            }
            actions[opponent] = self.opponent.choose_action(&self.engine, state, opponent, &mut self.rng);
        }
        actions[player] = Some(action);
        if deadline.passed() {
            return None;
        }
        Some(self.engine.resolve(state, &actions))
    }

    /// Play `rollout_depth` turns with the simulation policy, then score.
    ///
    /// Returns the rewards and the number of turns played, or `None` if the
    /// deadline passed first.
    fn rollout(&mut self, state: &GameState, deadline: &mut Deadline) -> Option<(PlayerMap<f64>, u32)> {
        let mut rng = self.rng.fork();
        let mut state = state.clone();
        let mut turns = 0;

        loop {
            if let Some(result) = self.engine.is_terminal(&state) {
                self.stats.rollout_turns += u64::from(turns);
                return Some((result_to_rewards(&result, state.player_count()), turns));
            }
            if deadline.passed() {
                return None;
            }
            if turns >= self.config.rollout_depth {
                self.stats.rollout_turns += u64::from(turns);
                return Some((self.heuristic.evaluate(&state), turns));
            }

            let mut actions = TurnActions::with_value(state.player_count(), None);
            for id in state.alive_players().map(|p| p.id) {
                actions[id] = self.simulation.rollout_action(&self.engine, &state, id, &mut rng);
                if deadline.passed() {
                    return None;
                }
            }
            state = self.engine.resolve(&state, &actions);
            turns += 1;
        }
    }

    /// Mark a node terminal or give it one edge per legal action.
    fn expand_node(&mut self, node_id: NodeId, state: &GameState, player: PlayerId) {
        let player_count = state.player_count();

        if let Some(result) = self.engine.is_terminal(state) {
            self.tree.get_mut(node_id).terminal = Some(result_to_rewards(&result, player_count));
            return;
        }

        let actions = self.engine.legal_actions(state, player);
        if actions.is_empty() {
            // Controlled player is dead while others play on.
            self.tree.get_mut(node_id).terminal = Some(self.heuristic.evaluate(state));
            return;
        }

        self.tree.get_mut(node_id).open(actions, player_count);
        self.stats.nodes_expanded += 1;
    }

    /// Select an unexpanded edge randomly.
    fn select_unexpanded(&mut self, node_id: NodeId) -> usize {
        let unexpanded: Vec<usize> = self.tree.get(node_id).unexpanded_edges().collect();
        self.rng.choose(&unexpanded).copied().unwrap_or(0)
    }

    /// Create and expand the child behind an edge.
    fn expand_child(&mut self, parent_id: NodeId, edge_idx: usize, state: &GameState, player: PlayerId) -> NodeId {
        let child_id = self.tree.add_child(parent_id, edge_idx);
        self.stats.max_depth = self.stats.max_depth.max(self.tree.get(child_id).depth);
        self.expand_node(child_id, state, player);
        child_id
    }

    /// Backpropagate rewards through the path.
    fn backpropagate(&mut self, path: &[(NodeId, usize)], rewards: PlayerMap<f64>) {
        for &(node_id, edge_idx) in path.iter().rev() {
            let node = self.tree.get_mut(node_id);
            node.visits += 1;
            node.edges[edge_idx].record(&rewards);
        }
    }

    /// Most visited root action.
    fn best_action(&self) -> Option<Action> {
        let root = self.tree.root_node();
        if root.visits == 0 {
            return None;
        }
        root.most_visited().map(|e| e.action)
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    /// (action, visit count) pairs at the root of the last search.
    pub fn action_visits(&self) -> Vec<(Action, u32)> {
        self.tree
            .root_node()
            .edges
            .iter()
            .map(|e| (e.action, e.visits))
            .collect()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

/// Wall-clock cutoff for one search.
///
/// Every poll also times the stretch of work since the previous poll. A poll
/// fails as soon as the slowest stretch seen so far no longer fits before
/// the cutoff, so work started after a passing poll is expected to end in
/// time.
#[derive(Clone, Copy, Debug)]
struct Deadline {
    cutoff: Instant,
    last_poll: Instant,
    slowest: Duration,
}

impl Deadline {
    fn new(start: Instant, cutoff: Instant) -> Self {
        Self {
            cutoff,
            last_poll: start,
            slowest: Duration::ZERO,
        }
    }

    fn passed(&mut self) -> bool {
        let now = Instant::now();
        self.slowest = self.slowest.max(now.saturating_duration_since(self.last_poll));
        self.last_poll = now;
        now.checked_add(self.slowest).map_or(true, |end| end >= self.cutoff)
    }
}
