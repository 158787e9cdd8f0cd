//! Hard constraints applied to every candidate, whichever strategy produced it.
//!
//! Violations are corrected in place and reported as warnings, never as errors.

use super::pipeline::baseline_sets;
use super::{JitInput, JitOutput};
use crate::error::PlanResult;
use crate::formula::calculator::renumber;
use crate::math::round_to_increment;
use crate::volume::{capacity_check, Capacity};
use crate::warmup::session_warmup;

/// Correct `candidate` against the session input.
///
/// - capacity exhaustion forces a skip
/// - no set below the weight floor (a fraction of the formula baseline)
/// - at least one working set unless skipped
/// - warmups recomputed from the final working weight
/// - every weight rounded to the configured increment
pub fn enforce(mut candidate: JitOutput, input: &JitInput) -> PlanResult<JitOutput> {
    let increment = input.increment();
    let tuning = &input.tuning;
    let baseline = baseline_sets(input)?;
    let base = &baseline[0];
    let mut corrections = 0;

    if let Capacity::Exhausted { muscle } =
        capacity_check(input.lift, &input.weekly_volume, &input.volume_landmarks)
    {
        if !candidate.skipped || !candidate.sets.is_empty() {
            candidate.warnings.push(format!(
                "{} has reached its weekly MRV: {} skipped",
                muscle.name(),
                input.lift
            ));
            corrections += 1;
        }
        candidate.skipped = true;
        for aux in candidate.auxiliary_work.iter_mut().filter(|a| !a.skipped) {
            aux.sets.clear();
            aux.skipped = true;
            aux.skip_reason = Some(format!("{} at weekly MRV", muscle.name()));
        }
    }

    if candidate.skipped {
        candidate.sets.clear();
    } else {
        if candidate.sets.is_empty() {
            candidate.sets.push(base.clone());
            candidate
                .warnings
                .push("No working sets were proposed: one baseline set reinstated".to_string());
            corrections += 1;
        }

        let floor = round_to_increment(base.weight_kg * tuning.weight_floor_fraction, increment);
        let mut raised = 0;
        for set in candidate.sets.iter_mut() {
            set.weight_kg = round_to_increment(set.weight_kg, increment);
            // also catches NaN
            if !(set.weight_kg >= floor) {
                set.weight_kg = floor;
                raised += 1;
            }
        }
        if raised > 0 {
            candidate.warnings.push(format!(
                "{} set(s) raised to the {} kg floor ({:.0}% of the planned weight)",
                raised,
                floor,
                tuning.weight_floor_fraction * 100.0
            ));
            corrections += 1;
        }
        renumber(&mut candidate.sets);
    }

    for aux in candidate.auxiliary_work.iter_mut() {
        for set in aux.sets.iter_mut() {
            set.weight_kg = round_to_increment(set.weight_kg, increment);
        }
        renumber(&mut aux.sets);
    }

    candidate.warmup_sets = match candidate.sets.first() {
        Some(first) => session_warmup(
            first.weight_kg,
            &input.warmup,
            candidate.modifiers.recovery_mode,
            increment,
            tuning.bar_weight_kg,
        )?,
        None => Vec::new(),
    };

    if corrections > 0 {
        tracing::warn!(
            "Constraint enforcer made {} correction(s) to {} {}",
            corrections,
            input.lift,
            input.intensity_type
        );
    }
    candidate.modifiers.constraint_corrections += corrections;
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jit::run_pipeline;
    use crate::lifts::{Block, IntensityType, Lift, MuscleGroup};
    use crate::warmup::WarmupSet;
    use chrono::NaiveDate;

    fn input() -> JitInput {
        JitInput::new(
            NaiveDate::from_ymd_opt(2026, 5, 11).unwrap(),
            Lift::Squat,
            IntensityType::Heavy,
            Some(Block::One),
            140.0,
        )
    }

    #[test]
    fn test_clean_candidate_unchanged() {
        let input = input();
        let candidate = run_pipeline(&input).unwrap();
        let enforced = enforce(candidate.clone(), &input).unwrap();
        assert_eq!(enforced, candidate);
    }

    #[test]
    fn test_exhausted_capacity_forces_skip() {
        let mut input = input();
        let candidate = run_pipeline(&input).unwrap();
        input.weekly_volume.insert(MuscleGroup::Quads, 25.0);
        let out = enforce(candidate, &input).unwrap();
        assert!(out.skipped);
        assert!(out.sets.is_empty());
        assert!(out.warmup_sets.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.modifiers.constraint_corrections, 1);
    }

    #[test]
    fn test_weight_floor() {
        let input = input();
        let mut candidate = run_pipeline(&input).unwrap();
        for set in candidate.sets.iter_mut() {
            set.weight_kg = 10.0;
        }
        let out = enforce(candidate, &input).unwrap();
        // 40% of 112.5
        assert!(out.sets.iter().all(|s| s.weight_kg == 45.0));
        assert!(out.warnings[0].contains("floor"));
        assert!(out.warmup_sets.iter().all(|w| w.weight_kg < 45.0));
    }

    #[test]
    fn test_nan_weight_raised_to_floor() {
        let input = input();
        let mut candidate = run_pipeline(&input).unwrap();
        candidate.sets[0].weight_kg = f64::NAN;
        let out = enforce(candidate, &input).unwrap();
        assert_eq!(out.sets[0].weight_kg, 45.0);
    }

    #[test]
    fn test_zero_sets_reinstated() {
        let input = input();
        let mut candidate = run_pipeline(&input).unwrap();
        candidate.sets.clear();
        let out = enforce(candidate, &input).unwrap();
        assert_eq!(out.sets.len(), 1);
        assert_eq!(out.sets[0].weight_kg, 112.5);
        assert_eq!(out.sets[0].set_number, 1);
        assert!(!out.warmup_sets.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_explicit_skip_respected() {
        let input = input();
        let mut candidate = run_pipeline(&input).unwrap();
        candidate.skipped = true;
        let out = enforce(candidate, &input).unwrap();
        assert!(out.sets.is_empty());
        assert!(out.warmup_sets.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_warmup_always_recomputed() {
        let input = input();
        let mut candidate = run_pipeline(&input).unwrap();
        let expected = candidate.warmup_sets.clone();
        candidate.warmup_sets = vec![WarmupSet {
            set_number: 1,
            weight_kg: 200.0,
            reps: 1,
            percent: 1.5,
        }];
        let out = enforce(candidate, &input).unwrap();
        assert_eq!(out.warmup_sets, expected);
    }

    #[test]
    fn test_weights_rounded() {
        let input = input();
        let mut candidate = run_pipeline(&input).unwrap();
        for set in candidate.sets.iter_mut() {
            set.weight_kg = 101.3;
        }
        let out = enforce(candidate, &input).unwrap();
        assert!(out.sets.iter().all(|s| s.weight_kg == 102.5));
    }
}
