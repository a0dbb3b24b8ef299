//! Target pools, filters and selection criteria
//!
//! Pool → filter → criterion. Filters run before the criterion so a filtered
//! skill never picks a target the filter would have excluded.

use std::cmp::Ordering;

use crate::battle::character::Character;
use crate::battle::decision::RejectionReason;
use crate::battle::skill::{Criterion, FilterCondition, SkillFilter, TargetKind};
use crate::core::types::{hp_above_percent, hp_below_percent};

/// Radius used by `Criterion::MostEnemiesNearby`
pub const CROWD_RADIUS: u32 = 2;

/// Outcome of target resolution for one skill
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelection<'a> {
    Single(&'a Character),
    Group(Vec<&'a Character>),
}

/// Living candidates for a target kind, in roster order
pub fn build_pool<'a>(
    evaluator: &'a Character,
    all: &'a [Character],
    kind: TargetKind,
) -> Vec<&'a Character> {
    match kind {
        TargetKind::SelfTarget => vec![evaluator],
        TargetKind::Enemy | TargetKind::Enemies => all
            .iter()
            .filter(|c| c.is_alive() && c.is_enemy_of(evaluator))
            .collect(),
        TargetKind::Ally | TargetKind::Allies => all
            .iter()
            .filter(|c| c.is_alive() && c.is_ally_of(evaluator))
            .collect(),
    }
}

fn filter_matches(
    condition: &FilterCondition,
    candidate: &Character,
    evaluator: &Character,
    all: &[Character],
) -> bool {
    match condition {
        FilterCondition::HpBelow(pct) => hp_below_percent(candidate.hp, candidate.max_hp, *pct),
        FilterCondition::HpAbove(pct) => hp_above_percent(candidate.hp, candidate.max_hp, *pct),
        FilterCondition::Channeling => candidate.is_channeling(),
        FilterCondition::Idle => candidate.is_idle(),
        FilterCondition::TargetingMe => candidate.is_targeting(&evaluator.id),
        FilterCondition::TargetingAlly => all
            .iter()
            .filter(|c| c.is_alive() && c.is_ally_of(evaluator))
            .any(|ally| candidate.is_targeting(&ally.id)),
        FilterCondition::InRange(range) => {
            evaluator.position.distance(&candidate.position) <= *range
        }
    }
}

/// Narrow a pool with an optional filter
pub fn filter_pool<'a>(
    pool: Vec<&'a Character>,
    filter: Option<&SkillFilter>,
    evaluator: &Character,
    all: &[Character],
) -> Vec<&'a Character> {
    let Some(filter) = filter else {
        return pool;
    };

    pool.into_iter()
        .filter(|c| filter_matches(&filter.condition, c, evaluator, all) != filter.negated)
        .collect()
}

fn enemies_near(candidate: &Character, evaluator: &Character, all: &[Character]) -> usize {
    all.iter()
        .filter(|c| {
            c.is_alive()
                && c.is_enemy_of(evaluator)
                && c.id != candidate.id
                && c.position.distance(&candidate.position) <= CROWD_RADIUS
        })
        .count()
}

/// Ordering where the preferred candidate sorts first
fn compare_candidates(
    a: &Character,
    b: &Character,
    criterion: Criterion,
    evaluator: &Character,
    all: &[Character],
) -> Ordering {
    let primary = match criterion {
        Criterion::Nearest => evaluator
            .position
            .distance(&a.position)
            .cmp(&evaluator.position.distance(&b.position)),
        Criterion::Furthest => evaluator
            .position
            .distance(&b.position)
            .cmp(&evaluator.position.distance(&a.position)),
        Criterion::LowestHp => a.hp.cmp(&b.hp),
        Criterion::HighestHp => b.hp.cmp(&a.hp),
        Criterion::MostEnemiesNearby => {
            enemies_near(b, evaluator, all).cmp(&enemies_near(a, evaluator, all))
        }
    };

    primary
        .then_with(|| a.position.cmp(&b.position))
        .then_with(|| a.slot_position.cmp(&b.slot_position))
}

/// Pick one target from a (filtered) pool
pub fn select_target<'a>(
    pool: &[&'a Character],
    criterion: Criterion,
    evaluator: &Character,
    all: &[Character],
) -> Option<&'a Character> {
    pool.iter()
        .copied()
        .min_by(|a, b| compare_candidates(a, b, criterion, evaluator, all))
}

/// Resolve the target of a skill, or the soft rejection explaining why not
pub fn resolve_target<'a>(
    kind: TargetKind,
    criterion: Criterion,
    filter: Option<&SkillFilter>,
    evaluator: &'a Character,
    all: &'a [Character],
) -> Result<TargetSelection<'a>, RejectionReason> {
    let pool = build_pool(evaluator, all, kind);
    if pool.is_empty() {
        return Err(RejectionReason::NoTarget);
    }

    let filtered = filter_pool(pool, filter, evaluator, all);
    if filtered.is_empty() {
        return Err(RejectionReason::FilterFailed);
    }

    if kind.is_plural() {
        return Ok(TargetSelection::Group(filtered));
    }

    select_target(&filtered, criterion, evaluator, all)
        .map(TargetSelection::Single)
        .ok_or(RejectionReason::NoTarget)
}
