//! Throughput of the turn resolver and the decision engine.
//!
//! Run with: cargo bench --bench resolve

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hypersonic::core::{Action, GameState, PlayerId, RulesConfig, TurnActions};
use hypersonic::mcts::{MCTSConfig, MCTSSearch};
use hypersonic::rules::{Forecast, RulesEngine, TurnResolver};

/// Standard board a few turns in, with a bomb from every player.
fn midgame(rules: &TurnResolver, players: usize) -> GameState {
    let state = rules.standard_game(players).unwrap();
    let bombs = TurnActions::new(players, |id| {
        let actions = rules.legal_actions(&state, id);
        actions.iter().rev().find(|a| a.place_bomb).copied()
    });
    let state = rules.resolve(&state, &bombs);
    rules.resolve(&state, &TurnActions::with_value(players, None))
}

fn bench_resolve(c: &mut Criterion) {
    let rules = TurnResolver::new(RulesConfig::default());
    let mut group = c.benchmark_group("resolve");

    for players in [2usize, 4] {
        let state = midgame(&rules, players);
        let actions = TurnActions::new(players, |id| Some(Action::stay(state.player(id).cell)));

        group.bench_with_input(BenchmarkId::from_parameter(format!("{players}_players")), &players, |b, _| {
            b.iter(|| black_box(rules.resolve(black_box(&state), &actions)));
        });
    }

    group.finish();
}

fn bench_forecast(c: &mut Criterion) {
    let rules = TurnResolver::new(RulesConfig::default());
    let state = midgame(&rules, 4);

    c.bench_function("forecast_4_players", |b| {
        b.iter(|| black_box(Forecast::of(black_box(&state))));
    });
}

fn bench_search(c: &mut Criterion) {
    let rules = TurnResolver::new(RulesConfig::default());
    let state = midgame(&rules, 2);
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for iterations in [100u32, 400] {
        group.bench_with_input(BenchmarkId::from_parameter(iterations), &iterations, |b, &iterations| {
            b.iter(|| {
                let config = MCTSConfig::default().with_max_iterations(iterations);
                let mut search = MCTSSearch::new(rules.clone(), config);
                black_box(search.choose_action(&state, PlayerId::new(0), Duration::from_secs(10)))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_forecast, bench_search);
criterion_main!(benches);
