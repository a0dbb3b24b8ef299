//! Headless Battle Runner
//!
//! Runs the built-in skirmish to completion and prints a summary.

use std::path::PathBuf;

use clap::Parser;
use hex_skirmish::battle::library::{
    charge, heavy_punch, kick, light_punch, mend, move_away, move_towards, regroup,
};
use hex_skirmish::battle::{
    process_tick, BattleStatus, Character, Faction, GameEvent, GameState, Position,
};
use hex_skirmish::core::BattleConfig;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Battle Runner - deterministic hex skirmish
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run the built-in skirmish and output a battle summary")]
struct Args {
    /// Battle config file (TOML); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for collision arbitration
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before giving up (reported as active)
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every event as it happens
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BattleResult {
    status: BattleStatus,
    ticks: u64,
    seed: u64,
    damage_dealt: i64,
    healing_done: i64,
    interrupts: usize,
    collisions: usize,
    deaths: Vec<String>,
    survivors: Vec<Survivor>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Survivor {
    letter: String,
    id: String,
    faction: Faction,
    hp: i32,
    max_hp: i32,
    position: Position,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }

    let mut state = GameState::new(create_skirmish(), &config)?;

    if args.verbose {
        eprintln!("=== Battle Started (seed {}) ===", config.seed);
        for c in &state.characters {
            eprintln!(
                "  {} {} ({:?}) at ({},{}) hp={}",
                c.letter(),
                c.name,
                c.faction,
                c.position.q,
                c.position.r,
                c.hp
            );
        }
        eprintln!();
    }

    while !state.is_finished() && state.tick < config.max_ticks {
        let outcome = process_tick(&state)?;

        if args.verbose {
            for event in &outcome.events {
                eprintln!(
                    "  [{}] {}: {}",
                    event.tick(),
                    event.type_name(),
                    serde_json::to_string(event)?
                );
            }
        }
        state = outcome.state;
    }

    let result = summarize(&state, config.seed);

    match args.format.as_str() {
        "text" => print_text(&result),
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

/// Three friendlies against three enemies across the board
fn create_skirmish() -> Vec<Character> {
    vec![
        Character::new("vanguard", "Vanguard", Faction::Friendly, Position::new(-3, 0), 120, 0)
            .equip(&kick())
            .equip(&light_punch())
            .equip(&charge())
            .equip(&move_towards()),
        Character::new("medic", "Medic", Faction::Friendly, Position::new(-4, 1), 80, 1)
            .equip(&mend())
            .equip(&move_away())
            .equip(&light_punch())
            .equip(&regroup())
            .equip(&move_towards()),
        Character::new("brawler", "Brawler", Faction::Friendly, Position::new(-3, -1), 100, 2)
            .equip(&heavy_punch())
            .equip(&light_punch())
            .equip(&move_towards()),
        Character::new("ogre", "Ogre", Faction::Enemy, Position::new(3, 0), 150, 3)
            .equip(&heavy_punch())
            .equip(&move_towards()),
        Character::new("goblin", "Goblin", Faction::Enemy, Position::new(3, -1), 70, 4)
            .equip(&light_punch())
            .equip(&light_punch())
            .equip(&move_away())
            .equip(&move_towards()),
        Character::new("shaman", "Shaman", Faction::Enemy, Position::new(4, 0), 70, 5)
            .equip(&mend())
            .equip(&kick())
            .equip(&regroup())
            .equip(&move_towards()),
    ]
}

fn summarize(state: &GameState, seed: u64) -> BattleResult {
    let mut result = BattleResult {
        status: state.battle_status,
        ticks: state.tick,
        seed,
        damage_dealt: 0,
        healing_done: 0,
        interrupts: 0,
        collisions: 0,
        deaths: Vec::new(),
        survivors: Vec::new(),
    };

    for event in &state.history {
        match event {
            GameEvent::Damage { damage, .. } => result.damage_dealt += *damage as i64,
            GameEvent::Heal { healing, .. } => result.healing_done += *healing as i64,
            GameEvent::Interrupt { .. } => result.interrupts += 1,
            GameEvent::Movement { collided: true, .. } => result.collisions += 1,
            GameEvent::Death { character_id, .. } => result.deaths.push(character_id.to_string()),
            _ => {}
        }
    }

    result.survivors = state
        .characters
        .iter()
        .map(|c| Survivor {
            letter: c.letter(),
            id: c.id.to_string(),
            faction: c.faction,
            hp: c.hp,
            max_hp: c.max_hp,
            position: c.position,
        })
        .collect();

    result
}

fn print_text(result: &BattleResult) {
    println!("Battle Result");
    println!("=============");
    println!("Status: {:?}", result.status);
    println!("Ticks: {}", result.ticks);
    println!("Damage dealt: {}", result.damage_dealt);
    println!("Healing done: {}", result.healing_done);
    println!("Interrupts: {}", result.interrupts);
    println!("Collisions: {}", result.collisions);
    println!("Deaths: {}", result.deaths.join(", "));
    println!();
    println!("Survivors:");
    for s in &result.survivors {
        println!(
            "  {} {} ({:?}) {}/{} at ({},{})",
            s.letter, s.id, s.faction, s.hp, s.max_hp, s.position.q, s.position.r
        );
    }
    println!();
    println!("Seed: {}", result.seed);
}
