//! Battle events: the append-only record consumed by animation and log views
//!
//! Serialized as `{"type": "...", "tick": N, ...}` with camelCase fields.

use serde::{Deserialize, Serialize};

use crate::battle::character::CharacterId;
use crate::battle::hex::Position;
use crate::battle::skill::ActionType;
use crate::core::types::Tick;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GameEvent {
    Tick {
        tick: Tick,
    },
    Damage {
        tick: Tick,
        source_id: CharacterId,
        target_id: CharacterId,
        damage: i32,
        resulting_hp: i32,
    },
    Heal {
        tick: Tick,
        source_id: CharacterId,
        target_id: CharacterId,
        /// Amount actually restored after clamping at max hp
        healing: i32,
        resulting_hp: i32,
    },
    Death {
        tick: Tick,
        character_id: CharacterId,
    },
    Movement {
        tick: Tick,
        character_id: CharacterId,
        from: Position,
        to: Position,
        collided: bool,
    },
    Charge {
        tick: Tick,
        character_id: CharacterId,
        target_id: Option<CharacterId>,
        from: Position,
        to: Position,
        hit: bool,
        /// Populated only on contact
        damage: Option<i32>,
        /// Populated only on contact
        resulting_hp: Option<i32>,
    },
    Interrupt {
        tick: Tick,
        source_id: CharacterId,
        target_id: CharacterId,
        /// The cancelled action type; `None` when the target was idle
        cancelled: Option<ActionType>,
    },
}

impl GameEvent {
    pub fn tick(&self) -> Tick {
        match self {
            GameEvent::Tick { tick }
            | GameEvent::Damage { tick, .. }
            | GameEvent::Heal { tick, .. }
            | GameEvent::Death { tick, .. }
            | GameEvent::Movement { tick, .. }
            | GameEvent::Charge { tick, .. }
            | GameEvent::Interrupt { tick, .. } => *tick,
        }
    }

    /// Short name matching the serialized `type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            GameEvent::Tick { .. } => "tick",
            GameEvent::Damage { .. } => "damage",
            GameEvent::Heal { .. } => "heal",
            GameEvent::Death { .. } => "death",
            GameEvent::Movement { .. } => "movement",
            GameEvent::Charge { .. } => "charge",
            GameEvent::Interrupt { .. } => "interrupt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_event_wire_shape() {
        let event = GameEvent::Damage {
            tick: 3,
            source_id: "hero".into(),
            target_id: "goblin".into(),
            damage: 10,
            resulting_hp: 90,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "damage");
        assert_eq!(json["tick"], 3);
        assert_eq!(json["sourceId"], "hero");
        assert_eq!(json["targetId"], "goblin");
        assert_eq!(json["resultingHp"], 90);
    }

    #[test]
    fn test_movement_event_wire_shape() {
        let event = GameEvent::Movement {
            tick: 1,
            character_id: "a".into(),
            from: Position::new(1, 0),
            to: Position::new(1, 0),
            collided: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "movement");
        assert_eq!(json["characterId"], "a");
        assert_eq!(json["from"]["q"], 1);
        assert_eq!(json["collided"], true);
    }

    #[test]
    fn test_type_name_matches_tag() {
        let event = GameEvent::Interrupt {
            tick: 0,
            source_id: "a".into(),
            target_id: "b".into(),
            cancelled: Some(ActionType::Heal),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.type_name());
        assert_eq!(json["cancelled"], "heal");
        assert_eq!(event.tick(), 0);
    }
}
