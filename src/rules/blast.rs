//! Blast coverage and chain reactions.
//!
//! A blast covers its bomb's cell plus up to `range` cells in each axis
//! direction. The board edge and walls stop a ray before the blocked cell;
//! a box stops it after covering the box. Bombs and items never stop a ray.
//!
//! ## Chain reactions
//!
//! `detonate` grows the triggered set to a fixed point: any live bomb
//! covered by a triggered blast is triggered too. Coverage is computed
//! against the boxes standing *before* any destruction, so the result is
//! the same union of blasts whatever order bombs are discovered in.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use crate::core::{Bomb, Cell, Direction, GameState, PlayerId};

/// Cells covered by a single blast. Range-2 blasts fit inline.
pub type Coverage = SmallVec<[Cell; 9]>;

/// Cells covered by `bomb` in `state`, bomb cell first.
#[must_use]
pub fn blast_cells(state: &GameState, bomb: &Bomb) -> Coverage {
    let mut cells = Coverage::new();
    cells.push(bomb.cell);

    for direction in Direction::ALL {
        for distance in 1..=i32::from(bomb.range) {
            let cell = bomb.cell.step(direction, distance);
            if !state.grid().contains(cell) || state.grid().is_wall(cell) {
                break;
            }
            cells.push(cell);
            if state.has_box(cell) {
                break;
            }
        }
    }

    cells
}

/// Outcome of one chain of detonations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Detonation {
    /// Cells of every bomb that explodes, initial triggers included.
    pub bombs: BTreeSet<Cell>,

    /// Union of all blasts, each cell with the distinct owners whose
    /// blasts reached it (ascending id).
    pub covered: BTreeMap<Cell, SmallVec<[PlayerId; 4]>>,
}

impl Detonation {
    /// True if any exploding blast reached `cell`.
    #[must_use]
    pub fn covers(&self, cell: Cell) -> bool {
        self.covered.contains_key(&cell)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bombs.is_empty()
    }
}

/// Explode the bombs on `triggered` cells and everything they chain into.
///
/// Cells without a live bomb are ignored. `state` is only read; removing
/// bombs and applying destruction is the caller's job.
pub fn detonate(state: &GameState, triggered: impl IntoIterator<Item = Cell>) -> Detonation {
    let mut result = Detonation::default();
    let mut pending: Vec<Cell> = triggered
        .into_iter()
        .filter(|cell| state.bomb_at(*cell).is_some())
        .collect();

    while let Some(cell) = pending.pop() {
        if !result.bombs.insert(cell) {
            continue;
        }
        let Some(bomb) = state.bomb_at(cell) else {
            continue;
        };

        for covered in blast_cells(state, bomb) {
            let owners = result.covered.entry(covered).or_default();
            if let Err(at) = owners.binary_search(&bomb.owner) {
                owners.insert(at, bomb.owner);
            }
            if covered != cell && state.bomb_at(covered).is_some() && !result.bombs.contains(&covered) {
                tracing::trace!(from = %cell, to = %covered, "chain reaction");
                pending.push(covered);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Grid, RulesConfig};

    fn state_with(rows: &[&str], bombs: &[Bomb]) -> GameState {
        let grid = Grid::from_rows(rows).unwrap();
        let start = grid.iter().find(|(_, t)| *t == crate::core::Terrain::Open).unwrap().0;
        let mut state = GameState::new(grid, &[start], &RulesConfig::default()).unwrap();
        for bomb in bombs {
            state.bombs.insert(bomb.cell, *bomb);
        }
        state
    }

    fn bomb(row: i32, col: i32, countdown: u8, range: u8) -> Bomb {
        Bomb::new(PlayerId::new(0), Cell::new(row, col), countdown, range)
    }

    #[test]
    fn test_open_cross() {
        let state = state_with(&[".....", ".....", "....."], &[]);
        let cells = blast_cells(&state, &bomb(1, 2, 8, 2));

        assert_eq!(cells.len(), 1 + 1 + 2 + 1 + 2);
        assert_eq!(cells[0], Cell::new(1, 2));
        assert!(cells.contains(&Cell::new(1, 0)));
        assert!(cells.contains(&Cell::new(1, 4)));
        assert!(cells.contains(&Cell::new(0, 2)));
        assert!(!cells.contains(&Cell::new(0, 1)));
    }

    #[test]
    fn test_wall_excluded_box_included() {
        let state = state_with(&["X.0.0.."], &[]);
        let cells = blast_cells(&state, &bomb(0, 1, 8, 4));

        assert!(!cells.contains(&Cell::new(0, 0)));
        assert!(cells.contains(&Cell::new(0, 2)));
        assert!(!cells.contains(&Cell::new(0, 3)));
        assert!(!cells.contains(&Cell::new(0, 4)));
    }

    #[test]
    fn test_bombs_do_not_stop_rays() {
        let state = state_with(&["....."], &[bomb(0, 1, 5, 1)]);
        let cells = blast_cells(&state, &bomb(0, 0, 8, 3));
        assert!(cells.contains(&Cell::new(0, 3)));
    }

    #[test]
    fn test_chain_fixed_point() {
        let bombs = [bomb(0, 0, 1, 2), bomb(0, 2, 5, 2), bomb(0, 4, 7, 2), bomb(2, 4, 7, 1)];
        let state = state_with(&[".....", ".....", "....."], &bombs);

        let result = detonate(&state, [Cell::new(0, 0)]);

        assert_eq!(result.bombs.len(), 4);
        assert!(result.covers(Cell::new(2, 3)));
    }

    #[test]
    fn test_chain_is_order_independent() {
        let bombs = [bomb(0, 0, 1, 2), bomb(0, 2, 1, 2), bomb(2, 2, 6, 2)];
        let state = state_with(&["...", "...", "..."], &bombs);

        let forward = detonate(&state, [Cell::new(0, 0), Cell::new(0, 2)]);
        let backward = detonate(&state, [Cell::new(0, 2), Cell::new(0, 0)]);

        assert_eq!(forward, backward);
        assert!(forward.bombs.contains(&Cell::new(2, 2)));
    }

    #[test]
    fn test_box_shields_bomb_behind_it() {
        let state = state_with(&[".0.."], &[bomb(0, 0, 1, 3), bomb(0, 2, 6, 1)]);
        let result = detonate(&state, [Cell::new(0, 0)]);

        assert_eq!(result.bombs.len(), 1);
        assert!(result.covers(Cell::new(0, 1)));
        assert!(!result.covers(Cell::new(0, 2)));
    }

    #[test]
    fn test_owners_recorded_once() {
        let mut other = bomb(0, 5, 1, 2);
        other.owner = PlayerId::new(1);
        let state = state_with(&["...0..."], &[other, bomb(0, 1, 1, 2), bomb(0, 2, 4, 1)]);

        let result = detonate(&state, [Cell::new(0, 5), Cell::new(0, 1)]);

        assert_eq!(result.bombs.len(), 3);
        assert_eq!(
            result.covered[&Cell::new(0, 3)].as_slice(),
            &[PlayerId::new(0), PlayerId::new(1)]
        );
    }

    #[test]
    fn test_trigger_without_bomb_ignored() {
        let state = state_with(&["..."], &[]);
        assert!(detonate(&state, [Cell::new(0, 1)]).is_empty());
    }
}
