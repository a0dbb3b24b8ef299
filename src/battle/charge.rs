//! Charge: greedy multi-hex rush followed by an adjacency-gated hit

use crate::battle::action::ActionKind;
use crate::battle::character::{slot_order, Character};
use crate::battle::event::GameEvent;
use crate::battle::hex::HexGrid;
use crate::battle::movement::{compute_charge_destination, occupied_cells};
use crate::battle::resolution::ResolutionResult;
use crate::core::rng::RngState;
use crate::core::types::Tick;

/// Resolve every charge completing this tick, in slot order
///
/// Chargers chase the target character's current position and fall back to
/// the locked cell when the target has left the roster. Earlier chargers'
/// new positions block later ones.
pub fn resolve_charges(
    characters: &[Character],
    tick: Tick,
    grid: &HexGrid,
    rng_state: &RngState,
) -> ResolutionResult {
    let mut updated = characters.to_vec();
    let mut events = Vec::new();

    for idx in slot_order(characters) {
        let Some(action) = updated[idx].current_action.clone() else {
            continue;
        };
        let ActionKind::Charge { damage, distance } = action.kind else {
            continue;
        };
        if !action.resolves_at(tick) {
            continue;
        }

        let charger_id = updated[idx].id.clone();
        let target_idx = action
            .target_character
            .as_ref()
            .and_then(|id| updated.iter().position(|c| &c.id == id));
        let goal = target_idx
            .map(|t| updated[t].position)
            .unwrap_or(action.target_cell);

        let obstacles = occupied_cells(&updated, &[&charger_id]);
        let from = updated[idx].position;
        let to = compute_charge_destination(from, goal, distance, &obstacles, grid);
        updated[idx].position = to;

        let hit_idx = target_idx.filter(|&t| to.is_adjacent(&updated[t].position));
        let resulting_hp = hit_idx.map(|t| {
            updated[t].hp = updated[t].hp.saturating_sub(damage);
            updated[t].hp
        });

        tracing::debug!(
            tick,
            charger = %charger_id,
            ?from,
            ?to,
            hit = hit_idx.is_some(),
            "charge resolved"
        );

        events.push(GameEvent::Charge {
            tick,
            character_id: charger_id.clone(),
            target_id: target_idx.map(|t| updated[t].id.clone()),
            from,
            to,
            hit: hit_idx.is_some(),
            damage: hit_idx.map(|_| damage),
            resulting_hp,
        });

        if let (Some(t), Some(hp)) = (hit_idx, resulting_hp) {
            events.push(GameEvent::Damage {
                tick,
                source_id: charger_id,
                target_id: updated[t].id.clone(),
                damage,
                resulting_hp: hp,
            });
        }
    }

    ResolutionResult {
        characters: updated,
        events,
        rng_state: rng_state.clone(),
    }
}
