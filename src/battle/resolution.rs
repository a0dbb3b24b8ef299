//! Effect resolution for healing, attacks and interrupts
//!
//! Every resolver reads a roster snapshot and returns a new one. Actions land
//! on whoever occupies the locked target cell when they resolve: a vacated
//! cell is a miss and a newcomer takes the hit.

use crate::battle::action::ActionKind;
use crate::battle::character::{slot_order, Character};
use crate::battle::event::GameEvent;
use crate::battle::hex::Position;
use crate::core::rng::RngState;
use crate::core::types::Tick;

/// Output of one resolver
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionResult {
    pub characters: Vec<Character>,
    pub events: Vec<GameEvent>,
    pub rng_state: RngState,
}

/// Index of the character standing on `cell`
fn occupant_index(characters: &[Character], cell: Position) -> Option<usize> {
    characters.iter().position(|c| c.position == cell)
}

/// Slot-ordered indices of characters whose action matches and resolves now
fn resolving(
    characters: &[Character],
    tick: Tick,
    matches: impl Fn(&ActionKind) -> bool,
) -> Vec<usize> {
    slot_order(characters)
        .into_iter()
        .filter(|&i| {
            characters[i]
                .current_action
                .as_ref()
                .is_some_and(|a| a.resolves_at(tick) && matches(&a.kind))
        })
        .collect()
}

pub fn resolve_healing(
    characters: &[Character],
    tick: Tick,
    rng_state: &RngState,
) -> ResolutionResult {
    let mut updated = characters.to_vec();
    let mut events = Vec::new();

    for idx in resolving(characters, tick, |k| matches!(k, ActionKind::Heal { .. })) {
        let Some(action) = updated[idx].current_action.clone() else {
            continue;
        };
        let ActionKind::Heal { healing } = action.kind else {
            continue;
        };
        let Some(target_idx) = occupant_index(&updated, action.target_cell) else {
            tracing::debug!(tick, healer = %updated[idx].id, "heal target cell empty");
            continue;
        };

        let target = &mut updated[target_idx];
        let before = target.hp;
        target.hp = target.hp.saturating_add(healing).min(target.max_hp).max(before);
        events.push(GameEvent::Heal {
            tick,
            source_id: characters[idx].id.clone(),
            target_id: target.id.clone(),
            healing: target.hp - before,
            resulting_hp: target.hp,
        });
    }

    ResolutionResult {
        characters: updated,
        events,
        rng_state: rng_state.clone(),
    }
}

pub fn resolve_combat(
    characters: &[Character],
    tick: Tick,
    rng_state: &RngState,
) -> ResolutionResult {
    let mut updated = characters.to_vec();
    let mut events = Vec::new();

    for idx in resolving(characters, tick, |k| matches!(k, ActionKind::Attack { .. })) {
        let Some(action) = updated[idx].current_action.clone() else {
            continue;
        };
        let ActionKind::Attack { damage } = action.kind else {
            continue;
        };
        let Some(target_idx) = occupant_index(&updated, action.target_cell) else {
            tracing::debug!(tick, attacker = %updated[idx].id, "attack missed, cell vacated");
            continue;
        };

        let target = &mut updated[target_idx];
        target.hp = target.hp.saturating_sub(damage);
        events.push(GameEvent::Damage {
            tick,
            source_id: characters[idx].id.clone(),
            target_id: target.id.clone(),
            damage,
            resulting_hp: target.hp,
        });
    }

    ResolutionResult {
        characters: updated,
        events,
        rng_state: rng_state.clone(),
    }
}

/// Cancel the current action of whoever stands on each interrupt's target cell
///
/// Interrupts are processed in slot order; one cancelled by an earlier
/// interrupt this tick never fires.
pub fn resolve_interrupts(
    characters: &[Character],
    tick: Tick,
    rng_state: &RngState,
) -> ResolutionResult {
    let mut updated = characters.to_vec();
    let mut events = Vec::new();

    for idx in resolving(characters, tick, |k| matches!(k, ActionKind::Interrupt)) {
        let Some(action) = updated[idx].current_action.clone() else {
            continue;
        };
        if !matches!(action.kind, ActionKind::Interrupt) {
            continue;
        }
        let Some(target_idx) = occupant_index(&updated, action.target_cell) else {
            continue;
        };
        if target_idx == idx {
            continue;
        }

        let cancelled = updated[target_idx]
            .current_action
            .take()
            .and_then(|a| a.kind.action_type());
        events.push(GameEvent::Interrupt {
            tick,
            source_id: characters[idx].id.clone(),
            target_id: updated[target_idx].id.clone(),
            cancelled,
        });
    }

    ResolutionResult {
        characters: updated,
        events,
        rng_state: rng_state.clone(),
    }
}

/// Remove every character at or below zero hp, one death event each
pub fn resolve_deaths(characters: &[Character], tick: Tick) -> (Vec<Character>, Vec<GameEvent>) {
    let events = slot_order(characters)
        .into_iter()
        .filter(|&i| !characters[i].is_alive())
        .map(|i| GameEvent::Death {
            tick,
            character_id: characters[i].id.clone(),
        })
        .collect();

    let survivors = characters.iter().filter(|c| c.is_alive()).cloned().collect();
    (survivors, events)
}
