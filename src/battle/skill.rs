//! Skills: the declarative rules a character scans each decision phase
//!
//! A skill is a value. Each character owns its own copies, so duplicate
//! instances of one definition keep independent cooldowns.

use serde::{Deserialize, Serialize};

use crate::core::types::{Percent, Tick};

/// What a skill does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Attack,
    Heal,
    Move,
    Charge,
    Interrupt,
}

/// Direction of a movement skill relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementBehavior {
    Towards,
    Away,
    /// Legacy mode from older skill sets; no longer resolved.
    Hold,
}

impl MovementBehavior {
    pub fn is_deprecated(&self) -> bool {
        matches!(self, MovementBehavior::Hold)
    }
}

/// Which characters a skill may target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Enemy,
    Ally,
    #[serde(rename = "self")]
    SelfTarget,
    /// The whole living enemy group (movement only)
    Enemies,
    /// The whole living ally group (movement only)
    Allies,
}

impl TargetKind {
    pub fn is_plural(&self) -> bool {
        matches!(self, TargetKind::Enemies | TargetKind::Allies)
    }
}

/// How a single target is picked from the filtered pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    #[default]
    Nearest,
    Furthest,
    LowestHp,
    HighestHp,
    MostEnemiesNearby,
}

/// Atomic trigger predicate, evaluated from the skill owner's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TriggerCondition {
    EnemyInRange(u32),
    AllyInRange(u32),
    HpBelow(Percent),
    HpAbove(Percent),
    AllyHpBelow(Percent),
    Channeling,
    Idle,
    TargetingMe,
    TargetingAlly,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger {
    pub condition: TriggerCondition,
    #[serde(default)]
    pub negated: bool,
}

impl Trigger {
    pub fn new(condition: TriggerCondition) -> Self {
        Self {
            condition,
            negated: false,
        }
    }

    pub fn not(condition: TriggerCondition) -> Self {
        Self {
            condition,
            negated: true,
        }
    }
}

/// Per-candidate predicate applied before criterion selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterCondition {
    HpBelow(Percent),
    HpAbove(Percent),
    Channeling,
    Idle,
    TargetingMe,
    TargetingAlly,
    InRange(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillFilter {
    pub condition: FilterCondition,
    #[serde(default)]
    pub negated: bool,
}

impl SkillFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self {
            condition,
            negated: false,
        }
    }

    pub fn not(condition: FilterCondition) -> Self {
        Self {
            condition,
            negated: true,
        }
    }
}

/// An equipped skill instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub instance_id: String,
    pub name: String,
    pub action_type: ActionType,

    pub damage: Option<i32>,
    pub healing: Option<i32>,
    pub behavior: Option<MovementBehavior>,
    /// Max hex distance to the target for attack/heal/charge/interrupt
    pub range: u32,
    /// Hexes travelled by move and charge
    pub distance: Option<u32>,
    pub tick_cost: Tick,

    pub cooldown: Option<u32>,
    pub cooldown_remaining: u32,

    pub triggers: Vec<Trigger>,
    pub filter: Option<SkillFilter>,
    pub target: TargetKind,
    pub criterion: Criterion,
    pub enabled: bool,
}

impl Skill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, action_type: ActionType) -> Self {
        let id = id.into();
        Self {
            instance_id: id.clone(),
            id,
            name: name.into(),
            action_type,
            damage: None,
            healing: None,
            behavior: None,
            range: 1,
            distance: None,
            tick_cost: 1,
            cooldown: None,
            cooldown_remaining: 0,
            triggers: Vec::new(),
            filter: None,
            target: TargetKind::Enemy,
            criterion: Criterion::Nearest,
            enabled: true,
        }
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_healing(mut self, healing: i32) -> Self {
        self.healing = Some(healing);
        self
    }

    pub fn with_behavior(mut self, behavior: MovementBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_tick_cost(mut self, tick_cost: Tick) -> Self {
        self.tick_cost = tick_cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn with_filter(mut self, filter: SkillFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_target(mut self, target: TargetKind, criterion: Criterion) -> Self {
        self.target = target;
        self.criterion = criterion;
        self
    }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_on_cooldown(&self) -> bool {
        self.cooldown_remaining > 0
    }

    /// Uses a movement behavior that is no longer supported
    pub fn has_deprecated_behavior(&self) -> bool {
        self.behavior.is_some_and(|b| b.is_deprecated())
    }

    /// Hexes travelled per resolution (move and charge), at least 1
    pub fn travel_distance(&self) -> u32 {
        self.distance.unwrap_or(1).max(1)
    }

    /// Check the action-defining fields agree with `action_type`
    ///
    /// Returns a description of the first conflict found.
    pub fn check_action_fields(&self) -> Result<(), String> {
        let has_damage = self.damage.is_some();
        let has_healing = self.healing.is_some();
        let has_behavior = self.behavior.is_some();

        match self.action_type {
            ActionType::Attack => {
                if has_damage && has_behavior {
                    return Err("attack defines both damage and a movement behavior".into());
                }
                if !has_damage {
                    return Err("attack defines no damage".into());
                }
                if has_healing {
                    return Err("attack defines healing".into());
                }
            }
            ActionType::Heal => {
                if !has_healing {
                    return Err("heal defines no healing".into());
                }
                if has_damage || has_behavior {
                    return Err("heal defines damage or a movement behavior".into());
                }
            }
            ActionType::Move => {
                if !has_behavior {
                    return Err("move defines no movement behavior".into());
                }
                if has_damage || has_healing {
                    return Err("move defines damage or healing".into());
                }
            }
            ActionType::Charge => {
                if !has_damage {
                    return Err("charge defines no damage".into());
                }
                if self.distance.is_none() {
                    return Err("charge defines no distance".into());
                }
                if has_behavior || has_healing {
                    return Err("charge defines a movement behavior or healing".into());
                }
            }
            ActionType::Interrupt => {
                if has_damage || has_healing || has_behavior {
                    return Err("interrupt defines damage, healing or a movement behavior".into());
                }
            }
        }

        if self.damage.is_some_and(|d| d <= 0) {
            return Err("damage must be positive".into());
        }
        if self.healing.is_some_and(|h| h <= 0) {
            return Err("healing must be positive".into());
        }

        if self.target.is_plural() && self.action_type != ActionType::Move {
            return Err(format!(
                "{:?} targets a group; only movement may",
                self.action_type
            ));
        }

        Ok(())
    }
}
