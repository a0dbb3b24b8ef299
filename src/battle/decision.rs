//! Decision engine: per-character top-to-bottom skill scan
//!
//! Live decisions and the explainability trace run the same scan. The trace
//! mode only records what the action mode already computes, so the skill a
//! trace marks selected is always the skill the live engine commits to.

use serde::{Deserialize, Serialize};

use crate::battle::action::{Action, ActionKind};
use crate::battle::character::{slot_order, Character, CharacterId};
use crate::battle::execution::GameState;
use crate::battle::movement::{compute_group_move_destination, compute_multi_step_destination};
use crate::battle::skill::{ActionType, MovementBehavior, Skill, Trigger};
use crate::battle::targeting::{resolve_target, TargetSelection};
use crate::battle::triggers::evaluate_triggers;
use crate::core::error::{EngineError, Result};

/// Why a skill was passed over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RejectionReason {
    Disabled,
    OnCooldown { remaining: u32 },
    TriggerFailed { failed_triggers: Vec<Trigger> },
    NoTarget,
    FilterFailed,
    OutOfRange { distance: u32, range: u32 },
    TargetFullHp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SkillStatus {
    Selected,
    Rejected { reason: RejectionReason },
    /// Listed after the selected skill; never evaluated
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEvaluationResult {
    pub skill_id: String,
    pub instance_id: String,
    pub skill_name: String,
    pub status: SkillStatus,
    /// Chosen target when one was resolved, even if a later check rejected it
    pub target_id: Option<CharacterId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEvaluationResult {
    pub character_id: CharacterId,
    pub is_mid_action: bool,
    pub skill_evaluations: Vec<SkillEvaluationResult>,
    pub selected_skill_index: Option<usize>,
    /// Action a decision would commit to, or the one already in progress
    pub action: Option<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub character_id: CharacterId,
    pub action: Action,
}

/// Non-fatal problem with a character's configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub character_id: CharacterId,
    pub skill_id: String,
    pub instance_id: String,
    pub message: String,
}

/// Receives diagnostics raised during decision making
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at warn level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            character = %diagnostic.character_id,
            skill = %diagnostic.instance_id,
            "{}",
            diagnostic.message
        );
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

enum SkillOutcome {
    Selected {
        action: Action,
        target_id: Option<CharacterId>,
    },
    Rejected {
        reason: RejectionReason,
        target_id: Option<CharacterId>,
    },
}

impl SkillOutcome {
    fn rejected(reason: RejectionReason) -> Self {
        SkillOutcome::Rejected {
            reason,
            target_id: None,
        }
    }
}

/// Steps 1-8 of the scan for a single skill
fn evaluate_skill(
    skill: &Skill,
    character: &Character,
    state: &GameState,
    sink: &mut dyn DiagnosticSink,
) -> Result<SkillOutcome> {
    if !skill.enabled {
        return Ok(SkillOutcome::rejected(RejectionReason::Disabled));
    }

    if skill.has_deprecated_behavior() {
        sink.report(Diagnostic {
            character_id: character.id.clone(),
            skill_id: skill.id.clone(),
            instance_id: skill.instance_id.clone(),
            message: format!(
                "skill '{}' uses the deprecated hold movement behavior and is treated as disabled",
                skill.name
            ),
        });
        return Ok(SkillOutcome::rejected(RejectionReason::Disabled));
    }

    let kind = ActionKind::for_skill(skill).map_err(|reason| EngineError::InvalidSkill {
        character_id: character.id.clone(),
        skill_id: skill.instance_id.clone(),
        reason,
    })?;

    if skill.is_on_cooldown() {
        return Ok(SkillOutcome::rejected(RejectionReason::OnCooldown {
            remaining: skill.cooldown_remaining,
        }));
    }

    let triggers = evaluate_triggers(&skill.triggers, character, &state.characters);
    if !triggers.passed() {
        return Ok(SkillOutcome::rejected(RejectionReason::TriggerFailed {
            failed_triggers: triggers.failed,
        }));
    }

    let selection = match resolve_target(
        skill.target,
        skill.criterion,
        skill.filter.as_ref(),
        character,
        &state.characters,
    ) {
        Ok(selection) => selection,
        Err(reason) => return Ok(SkillOutcome::rejected(reason)),
    };

    let tick = state.tick;
    let outcome = match selection {
        TargetSelection::Group(group) => {
            let behavior = skill.behavior.unwrap_or(MovementBehavior::Towards);
            let destination = compute_group_move_destination(
                character,
                &group,
                behavior,
                skill.travel_distance(),
                &state.characters,
                &state.grid,
            );
            SkillOutcome::Selected {
                action: Action::from_skill(kind, skill, destination, None, tick),
                target_id: None,
            }
        }
        TargetSelection::Single(target) => {
            let target_id = Some(target.id.clone());

            if let ActionKind::Move { behavior } = kind {
                let destination = compute_multi_step_destination(
                    character,
                    target,
                    behavior,
                    skill.travel_distance(),
                    &state.characters,
                    &state.grid,
                );
                return Ok(SkillOutcome::Selected {
                    action: Action::from_skill(kind, skill, destination, target_id.clone(), tick),
                    target_id,
                });
            }

            let distance = character.position.distance(&target.position);
            if distance > skill.range {
                return Ok(SkillOutcome::Rejected {
                    reason: RejectionReason::OutOfRange {
                        distance,
                        range: skill.range,
                    },
                    target_id,
                });
            }

            if skill.action_type == ActionType::Heal && target.is_full_hp() {
                return Ok(SkillOutcome::Rejected {
                    reason: RejectionReason::TargetFullHp,
                    target_id,
                });
            }

            SkillOutcome::Selected {
                action: Action::from_skill(kind, skill, target.position, target_id.clone(), tick),
                target_id,
            }
        }
    };

    Ok(outcome)
}

struct Scan {
    action: Action,
    selected_index: Option<usize>,
    evaluations: Vec<SkillEvaluationResult>,
}

fn trace_entry(
    skill: &Skill,
    status: SkillStatus,
    target_id: Option<CharacterId>,
) -> SkillEvaluationResult {
    SkillEvaluationResult {
        skill_id: skill.id.clone(),
        instance_id: skill.instance_id.clone(),
        skill_name: skill.name.clone(),
        status,
        target_id,
    }
}

/// The single scan behind both live decisions and the trace
fn scan_skills(
    character: &Character,
    state: &GameState,
    trace: bool,
    sink: &mut dyn DiagnosticSink,
) -> Result<Scan> {
    let mut evaluations = Vec::new();

    for (index, skill) in character.skills.iter().enumerate() {
        match evaluate_skill(skill, character, state, sink)? {
            SkillOutcome::Selected { action, target_id } => {
                tracing::debug!(
                    tick = state.tick,
                    character = %character.id,
                    skill = %skill.instance_id,
                    target = ?target_id,
                    "skill selected"
                );
                if trace {
                    evaluations.push(trace_entry(skill, SkillStatus::Selected, target_id));
                    evaluations.extend(
                        character.skills[index + 1..]
                            .iter()
                            .map(|s| trace_entry(s, SkillStatus::Skipped, None)),
                    );
                }
                return Ok(Scan {
                    action,
                    selected_index: Some(index),
                    evaluations,
                });
            }
            SkillOutcome::Rejected { reason, target_id } => {
                if trace {
                    let status = SkillStatus::Rejected { reason };
                    evaluations.push(trace_entry(skill, status, target_id));
                }
            }
        }
    }

    tracing::debug!(tick = state.tick, character = %character.id, "no usable skill, idling");
    Ok(Scan {
        action: Action::idle(character.position, state.tick),
        selected_index: None,
        evaluations,
    })
}

/// Decisions for every idle character, in slot order
pub fn compute_decisions(state: &GameState) -> Result<Vec<Decision>> {
    compute_decisions_with_sink(state, &mut TracingSink)
}

pub fn compute_decisions_with_sink(
    state: &GameState,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<Decision>> {
    let mut decisions = Vec::new();

    for idx in slot_order(&state.characters) {
        let character = &state.characters[idx];
        if !character.is_alive() || !character.is_idle() {
            continue;
        }

        let scan = scan_skills(character, state, false, sink)?;
        decisions.push(Decision {
            character_id: character.id.clone(),
            action: scan.action,
        });
    }

    Ok(decisions)
}

/// Full per-skill trace for one character
pub fn evaluate_skills_for_character(
    character: &Character,
    state: &GameState,
) -> Result<CharacterEvaluationResult> {
    evaluate_skills_for_character_with_sink(character, state, &mut TracingSink)
}

pub fn evaluate_skills_for_character_with_sink(
    character: &Character,
    state: &GameState,
    sink: &mut dyn DiagnosticSink,
) -> Result<CharacterEvaluationResult> {
    if !character.is_idle() {
        return Ok(CharacterEvaluationResult {
            character_id: character.id.clone(),
            is_mid_action: true,
            skill_evaluations: Vec::new(),
            selected_skill_index: None,
            action: character.current_action.clone(),
        });
    }

    let scan = scan_skills(character, state, true, sink)?;
    Ok(CharacterEvaluationResult {
        character_id: character.id.clone(),
        is_mid_action: false,
        skill_evaluations: scan.evaluations,
        selected_skill_index: scan.selected_index,
        action: Some(scan.action),
    })
}
