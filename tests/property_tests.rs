//! Property tests for the turn resolver.
//!
//! Random legal play on the standard board, checking determinism, that
//! inputs are never mutated, and the bookkeeping invariants that must hold
//! after every turn.

use std::collections::BTreeMap;

use proptest::prelude::*;

use hypersonic::core::{GameState, PlayerId, RulesConfig, TurnActions};
use hypersonic::rules::{RulesEngine, TurnResolver};

/// Turn actions picked from each living player's legal list by index.
fn pick(rules: &TurnResolver, state: &GameState, choices: &[usize]) -> TurnActions {
    TurnActions::new(state.player_count(), |id| {
        let legal = rules.legal_actions(state, id);
        if legal.is_empty() {
            return None;
        }
        Some(legal[choices[id.index()] % legal.len()])
    })
}

fn players_and_turns() -> impl Strategy<Value = (usize, Vec<Vec<usize>>)> {
    (1usize..=4).prop_flat_map(|players| {
        (
            Just(players),
            prop::collection::vec(prop::collection::vec(0usize..10, players), 1..40),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_resolve_deterministic_and_pure((players, turns) in players_and_turns()) {
        let rules = TurnResolver::new(RulesConfig::default().with_fuse_length(4));
        let mut state = rules.standard_game(players).unwrap();

        for choices in &turns {
            if rules.is_terminal(&state).is_some() {
                break;
            }
            let actions = pick(&rules, &state, choices);
            let before = state.clone();

            let first = rules.resolve(&state, &actions);
            let second = rules.resolve(&state, &actions);

            prop_assert_eq!(&state, &before);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.turn(), state.turn() + 1);
            state = first;
        }
    }

    #[test]
    fn test_bookkeeping_invariants((players, turns) in players_and_turns()) {
        let rules = TurnResolver::new(RulesConfig::default().with_fuse_length(3));
        let mut state = rules.standard_game(players).unwrap();

        for choices in &turns {
            if rules.is_terminal(&state).is_some() {
                break;
            }
            let previous = state.clone();
            state = rules.resolve(&state, &pick(&rules, &state, choices));

            let mut live: BTreeMap<PlayerId, u8> = BTreeMap::new();
            for bomb in state.bombs() {
                *live.entry(bomb.owner).or_default() += 1;
                prop_assert!(bomb.countdown > 0);
                prop_assert!(state.grid().contains(bomb.cell));
            }

            for player in state.players().values() {
                prop_assert_eq!(player.bombs_placed, live.get(&player.id).copied().unwrap_or(0));
                prop_assert!(player.bombs_placed <= player.capacity);

                let was = previous.player(player.id);
                prop_assert!(player.capacity >= was.capacity);
                prop_assert!(player.range >= was.range);
                prop_assert!(player.boxes_destroyed >= was.boxes_destroyed);
                if player.alive {
                    prop_assert!(player.cell == was.cell || player.cell.is_adjacent(was.cell));
                    prop_assert!(!state.has_box(player.cell));
                    prop_assert!(!state.grid().is_wall(player.cell));
                } else if was.alive {
                    prop_assert_eq!(player.eliminated_on, Some(state.turn()));
                }
            }

            prop_assert!(state.box_count() <= previous.box_count());
        }
    }
}
