//! Tick throughput benchmarks.
//!
//! Run with: cargo bench --bench tick_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hex_skirmish::battle::library::{heavy_punch, light_punch, move_towards};
use hex_skirmish::battle::{process_tick, Character, Faction, GameState, Position};
use hex_skirmish::core::BattleConfig;

/// Two lines of `per_side` brawlers facing each other across the board
fn create_test_state(per_side: i32) -> GameState {
    let mut characters = Vec::new();
    for i in 0..per_side {
        let r = i - per_side / 2;
        characters.push(
            Character::new(
                format!("f{}", i),
                format!("Friendly {}", i),
                Faction::Friendly,
                Position::new(-4, r),
                100,
                i as u32,
            )
            .equip(&heavy_punch())
            .equip(&light_punch())
            .equip(&move_towards()),
        );
        characters.push(
            Character::new(
                format!("e{}", i),
                format!("Enemy {}", i),
                Faction::Enemy,
                Position::new(4, r - 4),
                100,
                (per_side + i) as u32,
            )
            .equip(&light_punch())
            .equip(&move_towards()),
        );
    }

    let config = BattleConfig::default().with_grid_radius(8).with_seed(42);
    GameState::new(characters, &config).expect("bench roster is valid")
}

fn bench_single_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_tick");

    for per_side in [2, 4, 8].iter() {
        let state = create_test_state(*per_side);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_per_side", per_side)),
            per_side,
            |b, _| {
                b.iter(|| {
                    let outcome = process_tick(black_box(&state)).expect("tick succeeds");
                    black_box(outcome)
                });
            },
        );
    }

    group.finish();
}

fn bench_full_battle(c: &mut Criterion) {
    let state = create_test_state(4);

    c.bench_function("full_battle_4v4", |b| {
        b.iter(|| {
            let mut current = state.clone();
            while !current.is_finished() && current.tick < 300 {
                current = process_tick(&current).expect("tick succeeds").state;
            }
            black_box(current)
        });
    });
}

criterion_group!(benches, bench_single_tick, bench_full_battle);
criterion_main!(benches);
