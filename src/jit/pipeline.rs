//! Adjustment pipeline: baseline -> trend -> soreness -> capacity ->
//! disruption -> auxiliaries -> warmup

use super::disruption::{most_severe_active, Severity};
use super::soreness::{worst_primary_soreness, SorenessLevel, SorenessModifier};
use super::trend::analyze_trend;
use super::{AppliedModifiers, AuxiliaryWork, JitInput, JitOutput};
use crate::error::{PlanError, PlanResult};
use crate::formula::calculator::uniform_sets;
use crate::formula::{calculate_sets, PlannedSet};
use crate::lifts::MuscleGroup;
use crate::math::round_to_increment;
use crate::strategy::StrategyTag;
use crate::volume::{capacity_check, remaining_capacity, Capacity};
use crate::warmup::session_warmup;

/// At most this many assigned accessories are prescribed per session
const MAX_AUXILIARIES: usize = 2;

/// Formula baseline for the session; errors on malformed input
pub fn baseline_sets(input: &JitInput) -> PlanResult<Vec<PlannedSet>> {
    let sets = calculate_sets(
        input.lift,
        input.intensity_type,
        input.block,
        input.one_rep_max,
        &input.formula_config,
    )?;
    if sets.is_empty() {
        return Err(PlanError::InvalidConfig(format!(
            "{} prescription has no sets",
            input.intensity_type
        )));
    }
    Ok(sets)
}

/// Run every adjustment stage over the formula baseline.
///
/// The result is a candidate; callers pass it through
/// [`enforce`](super::constraints::enforce) before use.
pub fn run_pipeline(input: &JitInput) -> PlanResult<JitOutput> {
    let lift = input.lift;
    let tuning = &input.tuning;
    let increment = input.increment();

    let baseline = baseline_sets(input)?;
    let template = &baseline[0];
    let base_count = baseline.len() as u32;
    let base_weight = template.weight_kg;

    let (level, sore_muscle) = worst_primary_soreness(lift, &input.soreness);
    let soreness = SorenessModifier::lookup(level, input.biological_sex);
    let recovery_mode = soreness.recovery_mode;
    let disruption = most_severe_active(&input.disruptions, lift, input.session_date);

    let mut rationale = Vec::new();
    let mut warnings = Vec::new();
    let mut count = base_count;
    let mut multiplier = 1.0;
    let mut skipped = false;
    let mut trend = None;
    let mut volume_cap = None;

    if recovery_mode {
        warnings.push(format!(
            "Severe {} soreness: recovery session only, accessories skipped",
            muscle_label(sore_muscle)
        ));
        rationale.push(format!(
            "Recovery mode: {} x {} at {:.0}% of the planned weight",
            tuning.recovery_sets,
            tuning.recovery_reps,
            tuning.recovery_weight_fraction * 100.0
        ));
        if let Some(d) = disruption {
            rationale.push(format!("{} noted; recovery mode already in effect", d.summary()));
        }
    } else {
        if let Some(suggestion) = analyze_trend(
            &input.rpe_history,
            lift,
            input.intensity_type,
            tuning.trend_deviation_threshold,
            tuning.trend_adjustment,
        ) {
            multiplier *= suggestion.multiplier;
            trend = Some(suggestion.direction);
            rationale.push(suggestion.rationale);
        }

        if !soreness.is_noop() {
            count = count.saturating_sub(soreness.set_reduction).max(1);
            multiplier *= soreness.intensity_multiplier;
            if let Some(warning) = &soreness.warning {
                rationale.push(format!("{} ({})", warning, muscle_label(sore_muscle)));
            }
        }

        match capacity_check(lift, &input.weekly_volume, &input.volume_landmarks) {
            Capacity::Exhausted { muscle } => {
                skipped = true;
                warnings.push(format!(
                    "{} has reached its weekly MRV: {} skipped",
                    muscle.name(),
                    lift
                ));
            }
            Capacity::Limited { max_sets, muscle } if count > max_sets => {
                count = max_sets;
                volume_cap = Some(max_sets);
                warnings.push(format!(
                    "{} approaching weekly MRV: capped at {} sets",
                    muscle.name(),
                    max_sets
                ));
            }
            _ => {}
        }

        if let Some(d) = disruption {
            // a disruption replaces every adjustment above
            count = base_count;
            multiplier = 1.0;
            skipped = false;
            trend = None;
            volume_cap = None;
            rationale.clear();
            warnings.clear();

            match d.severity {
                Severity::Major => {
                    skipped = true;
                    warnings.push(format!("{}: {} and accessories skipped", d.summary(), lift));
                }
                Severity::Moderate => {
                    count = base_count.div_ceil(2).max(1);
                    multiplier = tuning.moderate_disruption_multiplier;
                    rationale.push(format!(
                        "{}: {} sets at {:.0}% of the planned load",
                        d.summary(),
                        count,
                        multiplier * 100.0
                    ));
                }
                Severity::Minor => {
                    rationale.push(format!("{}: planned load kept, train with care", d.summary()));
                }
            }
        }
    }

    let sets = if skipped {
        Vec::new()
    } else if recovery_mode {
        let weight = round_to_increment(base_weight * tuning.recovery_weight_fraction, increment)
            .max(tuning.bar_weight_kg);
        uniform_sets(
            tuning.recovery_sets,
            weight,
            tuning.recovery_reps,
            None,
            tuning.recovery_rpe,
        )
    } else {
        let weight = round_to_increment(base_weight * multiplier, increment);
        uniform_sets(count, weight, template.reps, template.rep_range, template.rpe_target)
    };

    let disruption_severity = disruption.map(|d| d.severity);
    let major_disruption = !recovery_mode && disruption_severity == Some(Severity::Major);
    let main_sets = sets.len() as u32;

    let mut auxiliary_work = Vec::new();
    for exercise in input.auxiliary_exercises.iter().take(MAX_AUXILIARIES) {
        if recovery_mode {
            auxiliary_work.push(AuxiliaryWork::skipped(exercise, "recovery mode"));
        } else if major_disruption {
            auxiliary_work.push(AuxiliaryWork::skipped(exercise, "major disruption"));
        } else if let Some(muscle) = auxiliary_capacity_exhausted(input, main_sets) {
            warnings.push(format!(
                "{} has no capacity left after the main lift: {} skipped",
                muscle.name(),
                exercise
            ));
            auxiliary_work.push(AuxiliaryWork::skipped(
                exercise,
                format!("{} near weekly MRV", muscle.name()),
            ));
        } else {
            auxiliary_work.push(AuxiliaryWork {
                exercise: exercise.clone(),
                sets: auxiliary_sets(input, level),
                skipped: false,
                skip_reason: None,
            });
        }
    }

    let warmup_sets = match sets.first() {
        Some(first) => session_warmup(
            first.weight_kg,
            &input.warmup,
            recovery_mode,
            increment,
            tuning.bar_weight_kg,
        )?,
        None => Vec::new(),
    };

    tracing::info!(
        "JIT {} {}: {} sets at {:?} (skipped: {}, recovery: {})",
        lift,
        input.intensity_type,
        sets.len(),
        sets.first().map(|s| s.weight_kg),
        skipped,
        recovery_mode
    );

    Ok(JitOutput {
        lift,
        intensity_type: input.intensity_type,
        block: input.block,
        sets,
        warmup_sets,
        auxiliary_work,
        rest: input.rest.prescribe(input.intensity_type, recovery_mode),
        modifiers: AppliedModifiers {
            trend,
            soreness_level: level,
            recovery_mode,
            volume_cap,
            disruption: disruption_severity,
            intensity_multiplier: if recovery_mode {
                tuning.recovery_weight_fraction
            } else {
                multiplier
            },
            constraint_corrections: 0,
        },
        rationale,
        warnings,
        skipped,
        strategy: StrategyTag::Formula,
        comparison: None,
    })
}

fn muscle_label(muscle: Option<MuscleGroup>) -> &'static str {
    muscle.map(|m| m.name()).unwrap_or("primary muscle")
}

/// First primary muscle whose remaining capacity can't take the main sets
/// plus one more
fn auxiliary_capacity_exhausted(input: &JitInput, main_sets: u32) -> Option<MuscleGroup> {
    input.lift.primary_muscles().find(|muscle| {
        let remaining = remaining_capacity(&input.weekly_volume, *muscle, &input.volume_landmarks);
        remaining < main_sets as f64 + 1.0
    })
}

/// Accessory baseline with soreness reductions
pub fn auxiliary_sets(input: &JitInput, level: SorenessLevel) -> Vec<PlannedSet> {
    let tuning = &input.tuning;
    let (reduction, multiplier) = match level {
        SorenessLevel::Fresh | SorenessLevel::Mild | SorenessLevel::Severe => (0, 1.0),
        SorenessLevel::Moderate => (1, 1.0),
        SorenessLevel::Sore => (1, 0.95),
    };
    let weight = round_to_increment(
        input.one_rep_max * tuning.auxiliary_percent * multiplier,
        input.increment(),
    );
    uniform_sets(
        tuning.auxiliary_sets.saturating_sub(reduction).max(1),
        weight,
        tuning.auxiliary_reps,
        None,
        tuning.auxiliary_rpe,
    )
}
