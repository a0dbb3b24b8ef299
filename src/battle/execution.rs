//! Battle execution loop
//!
//! Each tick: decide -> apply -> interrupts -> heal -> combat -> movement ->
//! cleanup -> cooldowns -> deaths -> status

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::battle::character::{Character, CharacterId, Faction};
use crate::battle::charge::resolve_charges;
use crate::battle::decision::{compute_decisions_with_sink, Decision, DiagnosticSink, TracingSink};
use crate::battle::event::GameEvent;
use crate::battle::hex::HexGrid;
use crate::battle::movement::resolve_movement;
use crate::battle::resolution::{
    resolve_combat, resolve_deaths, resolve_healing, resolve_interrupts, ResolutionResult,
};
use crate::core::config::BattleConfig;
use crate::core::error::{EngineError, Result};
use crate::core::rng::{init_rng, RngState};
use crate::core::types::Tick;

/// Battle status after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    #[default]
    Active,
    Victory,
    Defeat,
    Draw,
}

impl BattleStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, BattleStatus::Active)
    }
}

/// Complete battle state, owned by the caller between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub characters: Vec<Character>,
    /// The tick the next `process_tick` call will run
    pub tick: Tick,
    pub battle_status: BattleStatus,
    pub history: Vec<GameEvent>,
    pub rng_state: RngState,
    pub grid: HexGrid,
}

impl GameState {
    /// Validate a roster and set up tick 0
    pub fn new(characters: Vec<Character>, config: &BattleConfig) -> Result<Self> {
        config.validate()?;
        let grid = HexGrid::new(config.grid_radius);

        let mut ids = AHashSet::new();
        let mut cells = AHashSet::new();
        for character in &characters {
            if !ids.insert(character.id.clone()) {
                return Err(EngineError::DuplicateCharacter(character.id.clone()));
            }
            if !grid.contains(character.position) {
                return Err(EngineError::OffGrid {
                    character_id: character.id.clone(),
                    position: character.position,
                });
            }
            if !cells.insert(character.position) {
                return Err(EngineError::OccupiedCell {
                    character_id: character.id.clone(),
                    position: character.position,
                });
            }
        }

        Ok(Self {
            battle_status: check_battle_status(&characters),
            characters,
            tick: 0,
            history: Vec::new(),
            rng_state: init_rng(config.seed),
            grid,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.battle_status.is_finished()
    }

    pub fn character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| &c.id == id)
    }
}

/// New state plus the events produced by one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

/// Classify the roster: victory when only friendlies remain, defeat when only
/// enemies remain, draw when nobody does
pub fn check_battle_status(characters: &[Character]) -> BattleStatus {
    let living = |faction: Faction| {
        characters
            .iter()
            .filter(|c| c.faction == faction && c.is_alive())
            .count()
    };

    match (living(Faction::Friendly), living(Faction::Enemy)) {
        (0, 0) => BattleStatus::Draw,
        (_, 0) => BattleStatus::Victory,
        (0, _) => BattleStatus::Defeat,
        _ => BattleStatus::Active,
    }
}

/// Commit each decision as the character's current action
pub fn apply_decisions(characters: &[Character], decisions: &[Decision]) -> Vec<Character> {
    let mut updated = characters.to_vec();

    for decision in decisions {
        if let Some(character) = updated.iter_mut().find(|c| c.id == decision.character_id) {
            character.current_action = Some(decision.action.clone());
        }
    }

    updated
}

/// Start the cooldown of every skill chosen this tick
///
/// Runs after `decrement_cooldowns`, so a cooldown of N blocks the next N
/// decisions even when the skill resolved on the tick it was chosen.
pub fn start_cooldowns(characters: &[Character], decisions: &[Decision]) -> Vec<Character> {
    let mut updated = characters.to_vec();

    for decision in decisions {
        let Some(skill) = &decision.action.skill else {
            continue;
        };
        let cooldown = skill.cooldown.unwrap_or(0);
        if cooldown == 0 {
            continue;
        }
        if let Some(instance) = updated
            .iter_mut()
            .find(|c| c.id == decision.character_id)
            .and_then(|c| c.skill_mut(&skill.instance_id))
        {
            instance.cooldown_remaining = cooldown;
        }
    }

    updated
}

/// Drop every action that resolved this tick
pub fn clear_resolved_actions(characters: &[Character], tick: Tick) -> Vec<Character> {
    characters
        .iter()
        .cloned()
        .map(|mut c| {
            if c.current_action.as_ref().is_some_and(|a| a.resolves_at(tick)) {
                c.current_action = None;
            }
            c
        })
        .collect()
}

/// Tick down cooldowns, paused while a character is mid-action
pub fn decrement_cooldowns(characters: &[Character]) -> Vec<Character> {
    characters
        .iter()
        .cloned()
        .map(|mut c| {
            if c.current_action.is_none() {
                for skill in &mut c.skills {
                    skill.cooldown_remaining = skill.cooldown_remaining.saturating_sub(1);
                }
            }
            c
        })
        .collect()
}

/// Fold one resolver's output into the running tick
fn absorb(
    result: ResolutionResult,
    characters: &mut Vec<Character>,
    events: &mut Vec<GameEvent>,
    rng: &mut RngState,
) {
    *characters = result.characters;
    events.extend(result.events);
    *rng = result.rng_state;
}

/// Run one tick, reporting diagnostics through `tracing`
pub fn process_tick(state: &GameState) -> Result<TickOutcome> {
    process_tick_with_sink(state, &mut TracingSink)
}

/// Run one tick with an explicit diagnostic sink
pub fn process_tick_with_sink(
    state: &GameState,
    sink: &mut dyn DiagnosticSink,
) -> Result<TickOutcome> {
    let tick = state.tick;
    let _span = tracing::debug_span!("tick", tick).entered();

    // ===== PHASE 1: DECISION =====
    let decisions = compute_decisions_with_sink(state, sink)?;
    let mut characters = apply_decisions(&state.characters, &decisions);
    let mut events = vec![GameEvent::Tick { tick }];
    let mut rng = state.rng_state.clone();

    // ===== PHASE 2: INTERRUPTS =====
    // Cancellation has to land before any other action resolves this tick
    let result = resolve_interrupts(&characters, tick, &rng);
    absorb(result, &mut characters, &mut events, &mut rng);

    // ===== PHASE 3: HEALING =====
    let result = resolve_healing(&characters, tick, &rng);
    absorb(result, &mut characters, &mut events, &mut rng);

    // ===== PHASE 4: COMBAT =====
    let result = resolve_combat(&characters, tick, &rng);
    absorb(result, &mut characters, &mut events, &mut rng);

    // ===== PHASE 5: MOVEMENT =====
    let result = resolve_charges(&characters, tick, &state.grid, &rng);
    absorb(result, &mut characters, &mut events, &mut rng);
    let result = resolve_movement(&characters, tick, &rng);
    absorb(result, &mut characters, &mut events, &mut rng);

    // ===== PHASE 6: CLEANUP =====
    let characters = clear_resolved_actions(&characters, tick);
    let characters = decrement_cooldowns(&characters);
    let characters = start_cooldowns(&characters, &decisions);
    let (characters, deaths) = resolve_deaths(&characters, tick);
    events.extend(deaths);

    let battle_status = check_battle_status(&characters);
    tracing::debug!(
        decisions = decisions.len(),
        events = events.len(),
        survivors = characters.len(),
        ?battle_status,
        "tick resolved"
    );

    let mut history = state.history.clone();
    history.extend(events.iter().cloned());

    Ok(TickOutcome {
        state: GameState {
            characters,
            tick: tick + 1,
            battle_status,
            history,
            rng_state: rng,
            grid: state.grid,
        },
        events,
    })
}
