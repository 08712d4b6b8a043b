//! Danger forecast and escape search.
//!
//! A `Forecast` answers "when will this cell be covered by a blast?" for
//! every bomb already on the board, assuming nobody places another bomb
//! and boxes stay where they are. Time is counted in resolves from the
//! forecast state: a bomb with countdown 1 explodes at time 1.
//!
//! `can_escape` then runs a time-aware BFS over `(cell, time)` pairs to
//! decide whether a player can still reach a cell no blast will ever
//! cover. Heuristics, opponent models and rollouts all use it to stay out
//! of suicidal positions.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::blast::{blast_cells, Coverage};
use super::engine::{ActionList, RulesEngine};
use crate::core::{Cell, GameState, PlayerId, TurnActions};

/// Explosion schedule of the bombs on the board.
#[derive(Clone, Debug, Default)]
pub struct Forecast {
    bomb_times: FxHashMap<Cell, u8>,
    /// Ascending, deduplicated hit times per covered cell.
    hits: FxHashMap<Cell, SmallVec<[u8; 2]>>,
    horizon: u8,
}

impl Forecast {
    /// Forecast every bomb in `state`, chain reactions included.
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        let mut bombs: Vec<(Cell, u8, Coverage)> = state
            .bombs()
            .map(|b| (b.cell, b.countdown.max(1), blast_cells(state, b)))
            .collect();
        let index: FxHashMap<Cell, usize> = bombs.iter().enumerate().map(|(i, b)| (b.0, i)).collect();

        // Relax explosion times until no bomb can be set off earlier.
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..bombs.len() {
                let time = bombs[i].1;
                for c in 1..bombs[i].2.len() {
                    let Some(&j) = index.get(&bombs[i].2[c]) else {
                        continue;
                    };
                    if bombs[j].1 > time {
                        bombs[j].1 = time;
                        changed = true;
                    }
                }
            }
        }

        let mut forecast = Forecast::default();
        for (cell, time, coverage) in bombs {
            forecast.bomb_times.insert(cell, time);
            forecast.horizon = forecast.horizon.max(time);
            for covered in coverage {
                let times = forecast.hits.entry(covered).or_default();
                if let Err(at) = times.binary_search(&time) {
                    times.insert(at, time);
                }
            }
        }
        forecast
    }

    /// Time at which the bomb on `cell` explodes.
    #[must_use]
    pub fn explodes_at(&self, cell: Cell) -> Option<u8> {
        self.bomb_times.get(&cell).copied()
    }

    /// True if a blast covers `cell` at `time`.
    #[must_use]
    pub fn is_hit(&self, cell: Cell, time: u8) -> bool {
        self.hits.get(&cell).is_some_and(|t| t.contains(&time))
    }

    /// Earliest time a blast covers `cell`.
    #[must_use]
    pub fn first_hit(&self, cell: Cell) -> Option<u8> {
        self.hits.get(&cell).and_then(|t| t.first().copied())
    }

    /// True if no blast covers `cell` after `time`.
    #[must_use]
    pub fn is_clear_after(&self, cell: Cell, time: u8) -> bool {
        self.hits.get(&cell).map_or(true, |t| t.iter().all(|&hit| hit <= time))
    }

    /// Time of the last forecast explosion (0 if there are no bombs).
    #[must_use]
    pub fn horizon(&self) -> u8 {
        self.horizon
    }

    /// Whether a player may step onto `cell` at `time`. Bomb cells open up
    /// once their bomb has exploded.
    fn is_passable(&self, state: &GameState, cell: Cell, time: u8) -> bool {
        if state.grid().is_wall(cell) || state.has_box(cell) {
            return false;
        }
        self.explodes_at(cell).map_or(true, |exploded| exploded < time)
    }
}

/// Can `player` reach a cell that no forecast blast will cover, without
/// being hit on the way?
///
/// Dead players cannot escape. Boxes are treated as permanent.
#[must_use]
pub fn can_escape(state: &GameState, forecast: &Forecast, player: PlayerId) -> bool {
    let player = state.player(player);
    if !player.alive {
        return false;
    }
    if forecast.is_clear_after(player.cell, 0) {
        return true;
    }

    let mut queue = VecDeque::from([(player.cell, 0u8)]);
    let mut seen: FxHashSet<(Cell, u8)> = FxHashSet::default();
    seen.insert((player.cell, 0));

    while let Some((cell, time)) = queue.pop_front() {
        let next_time = time + 1;
        if next_time > forecast.horizon() {
            continue;
        }
        for next in std::iter::once(cell).chain(state.grid().neighbors(cell)) {
            if next != cell && !forecast.is_passable(state, next, next_time) {
                continue;
            }
            if forecast.is_hit(next, next_time) {
                continue;
            }
            if forecast.is_clear_after(next, next_time) {
                return true;
            }
            if seen.insert((next, next_time)) {
                queue.push_back((next, next_time));
            }
        }
    }

    false
}

/// Legal actions after which `player` survives the turn and can still
/// escape every pending blast, assuming all other players stay put.
///
/// May be empty when every option is fatal.
pub fn safe_actions<R: RulesEngine + ?Sized>(rules: &R, state: &GameState, player: PlayerId) -> ActionList {
    rules
        .legal_actions(state, player)
        .into_iter()
        .filter(|&action| {
            let mut actions = TurnActions::with_value(state.player_count(), None);
            actions[player] = Some(action);
            let next = rules.resolve(state, &actions);
            can_escape(&next, &Forecast::of(&next), player)
        })
        .collect()
}
