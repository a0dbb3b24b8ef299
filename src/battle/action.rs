//! Committed actions
//!
//! An action is locked at decision time: its target cell never changes after
//! the decision phase, only the occupant of that cell may.

use serde::{Deserialize, Serialize};

use crate::battle::character::CharacterId;
use crate::battle::hex::Position;
use crate::battle::skill::{ActionType, MovementBehavior, Skill};
use crate::core::types::Tick;

/// What the action will do when it resolves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    Attack { damage: i32 },
    Heal { healing: i32 },
    Move { behavior: MovementBehavior },
    Charge { damage: i32, distance: u32 },
    Interrupt,
    Idle,
}

impl ActionKind {
    /// The skill action type, `None` for idle
    pub fn action_type(&self) -> Option<ActionType> {
        match self {
            ActionKind::Attack { .. } => Some(ActionType::Attack),
            ActionKind::Heal { .. } => Some(ActionType::Heal),
            ActionKind::Move { .. } => Some(ActionType::Move),
            ActionKind::Charge { .. } => Some(ActionType::Charge),
            ActionKind::Interrupt => Some(ActionType::Interrupt),
            ActionKind::Idle => None,
        }
    }

    /// The kind a skill commits to, or why its fields are inconsistent
    pub fn for_skill(skill: &Skill) -> Result<ActionKind, String> {
        skill.check_action_fields()?;

        let kind = match skill.action_type {
            ActionType::Attack => ActionKind::Attack {
                damage: skill.damage.unwrap_or_default(),
            },
            ActionType::Heal => ActionKind::Heal {
                healing: skill.healing.unwrap_or_default(),
            },
            ActionType::Move => ActionKind::Move {
                behavior: skill.behavior.unwrap_or(MovementBehavior::Towards),
            },
            ActionType::Charge => ActionKind::Charge {
                damage: skill.damage.unwrap_or_default(),
                distance: skill.travel_distance(),
            },
            ActionType::Interrupt => ActionKind::Interrupt,
        };
        Ok(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub kind: ActionKind,
    /// Snapshot of the skill as it was when chosen; `None` for idle
    pub skill: Option<Skill>,
    pub target_cell: Position,
    pub target_character: Option<CharacterId>,
    pub started_at_tick: Tick,
    pub resolves_at_tick: Tick,
}

impl Action {
    /// Synthetic action for a character with no usable skill
    pub fn idle(position: Position, tick: Tick) -> Self {
        Self {
            kind: ActionKind::Idle,
            skill: None,
            target_cell: position,
            target_character: None,
            started_at_tick: tick,
            resolves_at_tick: tick,
        }
    }

    /// Build the action a validated skill commits to
    ///
    /// `kind` must already agree with the skill's fields.
    pub fn from_skill(
        kind: ActionKind,
        skill: &Skill,
        target_cell: Position,
        target_character: Option<CharacterId>,
        tick: Tick,
    ) -> Self {
        Self {
            kind,
            skill: Some(skill.clone()),
            target_cell,
            target_character,
            started_at_tick: tick,
            resolves_at_tick: tick + skill.tick_cost,
        }
    }

    pub fn resolves_at(&self, tick: Tick) -> bool {
        self.resolves_at_tick == tick
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.kind, ActionKind::Idle)
    }
}
