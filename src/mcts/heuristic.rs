//! Static evaluation of non-terminal states.
//!
//! The search scores a leaf with a `Heuristic`. Scores are per player and
//! squashed into `[0, 1]` so they mix with terminal rewards; dead players
//! always score 0.
//!
//! `DefaultHeuristic` combines:
//! - distance-discounted proximity to boxes and items (BFS over walkable
//!   cells, so walls and bombs count as detours)
//! - boxes a bomb dropped right now would hit
//! - upgrades collected and boxes destroyed so far
//! - survivability: a heavy penalty when no escape from pending blasts
//!   exists
//! - mobility: own reachable area, minus that of the opponents
//!
//! The weights are tuning, not rules; swap the heuristic to change them.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Bomb, Cell, GameState, Player, PlayerMap};
use crate::rules::{blast_cells, can_escape, Forecast};

/// Static evaluator used at rollout horizons and depth limits.
pub trait Heuristic: Send + Sync {
    /// Score every player of `state` in `[0, 1]`.
    fn evaluate(&self, state: &GameState) -> PlayerMap<f64>;
}

/// Weights for `DefaultHeuristic`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    pub box_proximity: f64,
    pub item_proximity: f64,
    /// Per box a bomb dropped on the current cell would destroy.
    pub bomb_potential: f64,
    /// Per point of capacity or range above the starting inventory.
    pub upgrades: f64,
    pub boxes_destroyed: f64,
    /// Subtracted when the player has no escape from pending blasts.
    pub trapped_penalty: f64,
    /// Per reachable cell.
    pub mobility: f64,
    /// Per cell reachable by the opponents, subtracted.
    pub opponent_mobility: f64,
    /// Multiplier per step of distance for proximity terms.
    pub proximity_decay: f64,
    /// BFS cut-off in steps.
    pub search_radius: u32,
    /// Raw score that squashes to about 0.73.
    pub scale: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            box_proximity: 1.0,
            item_proximity: 0.6,
            bomb_potential: 0.4,
            upgrades: 0.5,
            boxes_destroyed: 2.0,
            trapped_penalty: 8.0,
            mobility: 0.05,
            opponent_mobility: 0.03,
            proximity_decay: 0.8,
            search_radius: 10,
            scale: 4.0,
        }
    }
}

/// The stock evaluator. See the module docs for its terms.
#[derive(Clone, Debug)]
pub struct DefaultHeuristic {
    weights: HeuristicWeights,
    initial_capacity: u8,
    initial_range: u8,
}

impl Default for DefaultHeuristic {
    fn default() -> Self {
        Self::new(HeuristicWeights::default())
    }
}

impl DefaultHeuristic {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self {
            weights,
            initial_capacity: 1,
            initial_range: 2,
        }
    }

    /// Baseline inventory upgrades are measured against.
    #[must_use]
    pub fn with_baseline(mut self, capacity: u8, range: u8) -> Self {
        self.initial_capacity = capacity;
        self.initial_range = range;
        self
    }

    #[must_use]
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Unsquashed score of one living player.
    #[must_use]
    pub fn raw_score(&self, state: &GameState, forecast: &Forecast, reach: &Reach, player: &Player) -> f64 {
        let w = &self.weights;

        let upgrades = f64::from(player.capacity.saturating_sub(self.initial_capacity))
            + f64::from(player.range.saturating_sub(self.initial_range));
        let potential = if state.bomb_at(player.cell).is_none() {
            let trial = Bomb::new(player.id, player.cell, 1, player.range);
            blast_cells(state, &trial).iter().filter(|c| state.has_box(**c)).count()
        } else {
            0
        };
        let trapped = if can_escape(state, forecast, player.id) { 0.0 } else { 1.0 };

        w.box_proximity * reach.box_proximity
            + w.item_proximity * reach.item_proximity
            + w.bomb_potential * potential as f64
            + w.upgrades * upgrades
            + w.boxes_destroyed * f64::from(player.boxes_destroyed)
            + w.mobility * reach.cells as f64
            - w.trapped_penalty * trapped
    }
}

impl Heuristic for DefaultHeuristic {
    fn evaluate(&self, state: &GameState) -> PlayerMap<f64> {
        let forecast = Forecast::of(state);
        let reach = PlayerMap::new(state.player_count(), |id| {
            let player = state.player(id);
            if player.alive {
                Reach::explore(state, player.cell, &self.weights)
            } else {
                Reach::default()
            }
        });

        PlayerMap::new(state.player_count(), |id| {
            let player = state.player(id);
            if !player.alive {
                return 0.0;
            }
            let opponents: usize = state
                .alive_players()
                .filter(|p| p.id != id)
                .map(|p| reach[p.id].cells)
                .sum();
            let raw = self.raw_score(state, &forecast, &reach[id], player)
                - self.weights.opponent_mobility * opponents as f64;
            squash(raw, self.weights.scale)
        })
    }
}

/// Logistic squash into `(0, 1)`.
fn squash(raw: f64, scale: f64) -> f64 {
    1.0 / (1.0 + (-raw / scale.max(f64::EPSILON)).exp())
}

/// What one player can reach by walking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reach {
    /// Walkable cells within the search radius, start included.
    pub cells: usize,
    /// Sum of `decay^distance` over reachable boxes (distance to stand
    /// next to the box, plus one).
    pub box_proximity: f64,
    /// Sum of `decay^distance` over reachable items.
    pub item_proximity: f64,
}

impl Reach {
    /// Breadth-first walk from `start` over walkable cells.
    #[must_use]
    pub fn explore(state: &GameState, start: Cell, weights: &HeuristicWeights) -> Self {
        let mut distance: FxHashMap<Cell, u32> = FxHashMap::default();
        let mut boxes: FxHashMap<Cell, u32> = FxHashMap::default();
        let mut queue = VecDeque::from([start]);
        distance.insert(start, 0);

        while let Some(cell) = queue.pop_front() {
            let d = distance[&cell];
            for next in state.grid().neighbors(cell) {
                if state.has_box(next) {
                    boxes.entry(next).or_insert(d + 1);
                    continue;
                }
                if d >= weights.search_radius || distance.contains_key(&next) || !state.is_walkable(next) {
                    continue;
                }
                distance.insert(next, d + 1);
                queue.push_back(next);
            }
        }

        let decay = |d: u32| weights.proximity_decay.powi(d as i32);
        Self {
            cells: distance.len(),
            box_proximity: boxes.values().map(|&d| decay(d)).sum(),
            item_proximity: state
                .items()
                .filter_map(|(cell, _)| distance.get(&cell))
                .map(|&d| decay(d))
                .sum(),
        }
    }
}
