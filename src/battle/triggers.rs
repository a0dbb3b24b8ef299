//! Skill trigger evaluation
//!
//! Triggers gate whether a skill is considered at all. A skill's triggers are
//! AND-combined; an empty set always passes.

use crate::battle::character::Character;
use crate::battle::skill::{Trigger, TriggerCondition};
use crate::core::types::{hp_above_percent, hp_below_percent};

/// Result of evaluating a skill's trigger set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerResults {
    pub failed: Vec<Trigger>,
}

impl TriggerResults {
    pub fn passed(&self) -> bool {
        self.failed.is_empty()
    }
}

fn living_enemies<'a>(
    evaluator: &'a Character,
    all: &'a [Character],
) -> impl Iterator<Item = &'a Character> + 'a {
    all.iter()
        .filter(move |c| c.is_alive() && c.is_enemy_of(evaluator))
}

fn living_allies<'a>(
    evaluator: &'a Character,
    all: &'a [Character],
) -> impl Iterator<Item = &'a Character> + 'a {
    all.iter()
        .filter(move |c| c.is_alive() && c.is_ally_of(evaluator))
}

/// Evaluate the un-negated condition
fn evaluate_condition(
    condition: &TriggerCondition,
    evaluator: &Character,
    all: &[Character],
) -> bool {
    match condition {
        TriggerCondition::EnemyInRange(range) => living_enemies(evaluator, all)
            .any(|e| evaluator.position.distance(&e.position) <= *range),

        TriggerCondition::AllyInRange(range) => living_allies(evaluator, all)
            .any(|a| evaluator.position.distance(&a.position) <= *range),

        TriggerCondition::HpBelow(pct) => hp_below_percent(evaluator.hp, evaluator.max_hp, *pct),

        TriggerCondition::HpAbove(pct) => hp_above_percent(evaluator.hp, evaluator.max_hp, *pct),

        TriggerCondition::AllyHpBelow(pct) => {
            living_allies(evaluator, all).any(|a| hp_below_percent(a.hp, a.max_hp, *pct))
        }

        TriggerCondition::Channeling => living_enemies(evaluator, all).any(|e| e.is_channeling()),

        TriggerCondition::Idle => living_enemies(evaluator, all).any(|e| e.is_idle()),

        TriggerCondition::TargetingMe => {
            living_enemies(evaluator, all).any(|e| e.is_targeting(&evaluator.id))
        }

        TriggerCondition::TargetingAlly => living_enemies(evaluator, all).any(|e| {
            living_allies(evaluator, all).any(|ally| e.is_targeting(&ally.id))
        }),

        TriggerCondition::Always => true,
    }
}

/// Evaluate a single trigger, honoring negation
pub fn evaluate_trigger(trigger: &Trigger, evaluator: &Character, all: &[Character]) -> bool {
    evaluate_condition(&trigger.condition, evaluator, all) != trigger.negated
}

/// Evaluate every trigger of a skill, collecting the failures
pub fn evaluate_triggers(
    triggers: &[Trigger],
    evaluator: &Character,
    all: &[Character],
) -> TriggerResults {
    TriggerResults {
        failed: triggers
            .iter()
            .filter(|t| !evaluate_trigger(t, evaluator, all))
            .copied()
            .collect(),
    }
}
