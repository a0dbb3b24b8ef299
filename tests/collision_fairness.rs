//! Collision arbitration fairness
//!
//! One draw per contested cell, and over many seeds every contestant wins
//! about equally often.

use hex_skirmish::battle::{
    resolve_movement, Action, ActionKind, ActionType, Character, Faction, MovementBehavior,
    Position, Skill,
};
use hex_skirmish::core::{init_rng, next_random};

const TRIALS: u64 = 10_000;

fn mover(id: &str, at: Position, to: Position, slot: u32) -> Character {
    let step = Skill::new("step", "Step", ActionType::Move)
        .with_behavior(MovementBehavior::Towards)
        .with_tick_cost(0);
    let mut c = Character::new(id, id, Faction::Friendly, at, 100, slot);
    c.current_action = Some(Action::from_skill(
        ActionKind::Move {
            behavior: MovementBehavior::Towards,
        },
        &step,
        to,
        None,
        0,
    ));
    c
}

/// Wins per contestant over `TRIALS` seeds
fn tally(contestants: usize) -> Vec<u64> {
    let roster: Vec<Character> = Position::ORIGIN
        .neighbors()
        .iter()
        .take(contestants)
        .enumerate()
        .map(|(i, cell)| mover(&format!("m{}", i), *cell, Position::ORIGIN, i as u32))
        .collect();

    let mut wins = vec![0u64; contestants];
    for seed in 0..TRIALS {
        let result = resolve_movement(&roster, 0, &init_rng(seed));
        let winner = result
            .characters
            .iter()
            .position(|c| c.position == Position::ORIGIN)
            .expect("exactly one mover enters the cell");
        wins[winner] += 1;
    }
    wins
}

/// Allowed deviation from the mean: three binomial standard deviations
fn tolerance(p: f64) -> f64 {
    3.0 * (TRIALS as f64 * p * (1.0 - p)).sqrt()
}

#[test]
fn test_two_way_split_is_even() {
    let wins = tally(2);
    let expected = TRIALS as f64 / 2.0;
    for w in wins {
        assert!(
            (w as f64 - expected).abs() < tolerance(0.5),
            "{} wins vs {} expected",
            w,
            expected
        );
    }
}

#[test]
fn test_three_way_split_is_even() {
    let wins = tally(3);
    let expected = TRIALS as f64 / 3.0;
    for w in wins {
        assert!((w as f64 - expected).abs() < tolerance(1.0 / 3.0));
    }
}

#[test]
fn test_exactly_one_draw_regardless_of_count() {
    for contestants in 2..=6 {
        let roster: Vec<Character> = Position::ORIGIN
            .neighbors()
            .iter()
            .take(contestants)
            .enumerate()
            .map(|(i, cell)| mover(&format!("m{}", i), *cell, Position::ORIGIN, i as u32))
            .collect();

        let rng = init_rng(contestants as u64);
        let result = resolve_movement(&roster, 0, &rng);
        assert_eq!(result.rng_state, next_random(&rng).1);
        assert_eq!(
            result
                .characters
                .iter()
                .filter(|c| c.position == Position::ORIGIN)
                .count(),
            1
        );
    }
}

#[test]
fn test_stationary_blocker_consumes_no_rng() {
    for contestants in 1..=5 {
        let mut roster = vec![Character::new(
            "blocker",
            "Blocker",
            Faction::Enemy,
            Position::ORIGIN,
            100,
            0,
        )];
        roster.extend(
            Position::ORIGIN
                .neighbors()
                .iter()
                .take(contestants)
                .enumerate()
                .map(|(i, cell)| mover(&format!("m{}", i), *cell, Position::ORIGIN, i as u32 + 1)),
        );

        let rng = init_rng(99);
        let result = resolve_movement(&roster, 0, &rng);
        assert_eq!(result.rng_state, rng);
        assert_eq!(result.characters, roster);
    }
}
