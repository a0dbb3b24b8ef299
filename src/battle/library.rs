//! Shared skill definitions
//!
//! Definitions are templates. `Character::equip` copies one into a fresh
//! instance, so cooldowns never leak between characters or duplicate slots.

use crate::battle::skill::{
    ActionType, Criterion, FilterCondition, MovementBehavior, Skill, SkillFilter, TargetKind,
    Trigger, TriggerCondition,
};

/// Instant jab
pub fn light_punch() -> Skill {
    Skill::new("light_punch", "Light Punch", ActionType::Attack)
        .with_damage(10)
        .with_tick_cost(0)
}

/// Slow wind-up with reach; interruptible while channeling
pub fn heavy_punch() -> Skill {
    Skill::new("heavy_punch", "Heavy Punch", ActionType::Attack)
        .with_damage(25)
        .with_range(2)
        .with_tick_cost(2)
        .with_cooldown(3)
}

/// Heal the most wounded ally once someone drops under 75%
pub fn mend() -> Skill {
    Skill::new("mend", "Mend", ActionType::Heal)
        .with_healing(20)
        .with_range(5)
        .with_tick_cost(2)
        .with_cooldown(2)
        .with_trigger(Trigger::new(TriggerCondition::AllyHpBelow(75)))
        .with_target(TargetKind::Ally, Criterion::LowestHp)
}

pub fn move_towards() -> Skill {
    Skill::new("move_towards", "Advance", ActionType::Move)
        .with_behavior(MovementBehavior::Towards)
        .with_target(TargetKind::Enemy, Criterion::Nearest)
}

/// Back off from the nearest enemy when badly hurt
pub fn move_away() -> Skill {
    Skill::new("move_away", "Retreat", ActionType::Move)
        .with_behavior(MovementBehavior::Away)
        .with_trigger(Trigger::new(TriggerCondition::HpBelow(30)))
        .with_target(TargetKind::Enemy, Criterion::Nearest)
}

/// Close ranks with the rest of the team
pub fn regroup() -> Skill {
    Skill::new("regroup", "Regroup", ActionType::Move)
        .with_behavior(MovementBehavior::Towards)
        .with_distance(2)
        .with_trigger(Trigger::not(TriggerCondition::AllyInRange(2)))
        .with_target(TargetKind::Allies, Criterion::Nearest)
}

/// Zero-cost interrupt, only ever aimed at a channeling enemy
pub fn kick() -> Skill {
    Skill::new("kick", "Kick", ActionType::Interrupt)
        .with_tick_cost(0)
        .with_cooldown(4)
        .with_filter(SkillFilter::new(FilterCondition::Channeling))
}

pub fn charge() -> Skill {
    Skill::new("charge", "Charge", ActionType::Charge)
        .with_damage(20)
        .with_distance(3)
        .with_range(4)
        .with_tick_cost(1)
        .with_cooldown(3)
        .with_trigger(Trigger::not(TriggerCondition::EnemyInRange(1)))
}

/// Every built-in definition
pub fn all_skills() -> Vec<Skill> {
    vec![
        light_punch(),
        heavy_punch(),
        mend(),
        move_towards(),
        move_away(),
        regroup(),
        kick(),
        charge(),
    ]
}

/// Look up a built-in definition by id
pub fn skill_by_id(id: &str) -> Option<Skill> {
    all_skills().into_iter().find(|s| s.id == id)
}
