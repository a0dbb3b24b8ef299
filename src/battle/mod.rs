//! Battle system - tick-based skirmish on a hex board
//!
//! Characters scan an ordered skill list every time they are free, lock in
//! one action, and everything resolving on the same tick lands together.
//!
//! Key properties:
//! - Fixed phase order (heal, combat, movement) models simultaneity
//! - Slot order breaks every tie between actors
//! - The only randomness is collision arbitration, drawn from threaded state
//! - The decision trace and the live decision share one evaluator

pub mod action;
pub mod character;
pub mod charge;
pub mod decision;
pub mod event;
pub mod execution;
pub mod hex;
pub mod library;
pub mod movement;
pub mod pathfinding;
pub mod resolution;
pub mod skill;
pub mod targeting;
pub mod triggers;

// Re-exports for convenient access
pub use action::{Action, ActionKind};
pub use character::{slot_letter, Character, CharacterId, Faction};
pub use charge::resolve_charges;
pub use decision::{
    compute_decisions, compute_decisions_with_sink, evaluate_skills_for_character,
    evaluate_skills_for_character_with_sink, CharacterEvaluationResult, Decision, Diagnostic,
    DiagnosticSink, RejectionReason, SkillEvaluationResult, SkillStatus, TracingSink,
};
pub use event::GameEvent;
pub use execution::{
    apply_decisions, check_battle_status, clear_resolved_actions, decrement_cooldowns,
    process_tick, process_tick_with_sink, start_cooldowns, BattleStatus, GameState, TickOutcome,
};
pub use hex::{HexDirection, HexGrid, Position};
pub use movement::{
    compute_charge_destination, compute_group_move_destination, compute_move_destination,
    compute_multi_step_destination, escape_routes, resolve_movement,
};
pub use pathfinding::find_path;
pub use resolution::{
    resolve_combat, resolve_deaths, resolve_healing, resolve_interrupts, ResolutionResult,
};
pub use skill::{
    ActionType, Criterion, FilterCondition, MovementBehavior, Skill, SkillFilter, TargetKind,
    Trigger, TriggerCondition,
};
pub use targeting::{build_pool, filter_pool, resolve_target, select_target, TargetSelection};
pub use triggers::{evaluate_trigger, evaluate_triggers, TriggerResults};
