//! Combatants on the hex board

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::action::Action;
use crate::battle::hex::Position;
use crate::battle::skill::Skill;

/// Unique identifier for characters within one battle
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CharacterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CharacterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Friendly,
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub faction: Faction,
    pub position: Position,
    /// May drop below zero within a tick; removal happens at tick end
    pub hp: i32,
    pub max_hp: i32,
    /// Deterministic ordering key, also the display letter
    pub slot_position: u32,
    pub skills: Vec<Skill>,
    pub current_action: Option<Action>,
}

impl Character {
    pub fn new(
        id: impl Into<CharacterId>,
        name: impl Into<String>,
        faction: Faction,
        position: Position,
        max_hp: i32,
        slot_position: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            faction,
            position,
            hp: max_hp,
            max_hp,
            slot_position,
            skills: Vec::new(),
            current_action: None,
        }
    }

    /// Equip a copy of a skill definition as a new instance
    ///
    /// The instance id is unique per character even when the same definition
    /// is equipped twice.
    pub fn equip(mut self, definition: &Skill) -> Self {
        let ordinal = self
            .skills
            .iter()
            .filter(|s| s.id == definition.id)
            .count();
        let instance = definition
            .clone()
            .with_instance_id(format!("{}:{}:{}", self.id, definition.id, ordinal));
        self.skills.push(instance);
        self
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_idle(&self) -> bool {
        self.current_action.is_none()
    }

    /// Mid-action, hence interruptible
    pub fn is_channeling(&self) -> bool {
        self.current_action.is_some()
    }

    pub fn is_full_hp(&self) -> bool {
        self.hp >= self.max_hp
    }

    pub fn is_enemy_of(&self, other: &Character) -> bool {
        self.faction != other.faction
    }

    pub fn is_ally_of(&self, other: &Character) -> bool {
        self.faction == other.faction && self.id != other.id
    }

    /// Is this character's current action aimed at `id`?
    pub fn is_targeting(&self, id: &CharacterId) -> bool {
        self.current_action
            .as_ref()
            .and_then(|a| a.target_character.as_ref())
            .is_some_and(|target| target == id)
    }

    /// Display letter derived from the slot: 0 → A, 25 → Z, 26 → AA
    pub fn letter(&self) -> String {
        slot_letter(self.slot_position)
    }

    pub fn skill_mut(&mut self, instance_id: &str) -> Option<&mut Skill> {
        self.skills.iter_mut().find(|s| s.instance_id == instance_id)
    }
}

/// Spreadsheet-style letters for a slot ordinal
pub fn slot_letter(slot: u32) -> String {
    let mut n = slot as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Indices of `characters` ordered by ascending slot position
pub fn slot_order(characters: &[Character]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..characters.len()).collect();
    order.sort_by_key(|&i| (characters[i].slot_position, characters[i].id.clone()));
    order
}
