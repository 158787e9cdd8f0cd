//! Training-max progression between programs

use super::config::FormulaConfig;
use crate::error::{PlanError, PlanResult};
use crate::lifts::Lift;
use crate::math::round_to_increment;

/// Training max for the next program.
///
/// Uses the gap to a fresh estimate when one exists, otherwise the
/// progressive-overload increment; the change is clamped to the lift's bounds.
pub fn next_training_max(
    lift: Lift,
    current_max: f64,
    estimated_max: Option<f64>,
    config: &FormulaConfig,
) -> PlanResult<f64> {
    if !(current_max > 0.0) {
        return Err(PlanError::NonPositiveWeight(current_max));
    }
    let bounds = config.training_max_increase.for_lift(lift);
    let delta = estimated_max
        .map(|estimate| estimate - current_max)
        .unwrap_or(config.progressive_overload_increment_kg)
        .clamp(bounds.min_kg, bounds.max_kg);

    Ok(round_to_increment(current_max + delta, config.rounding_increment_kg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_increment_without_estimate() {
        let cfg = FormulaConfig::default();
        assert_eq!(next_training_max(Lift::Squat, 140.0, None, &cfg).unwrap(), 142.5);
    }

    #[test]
    fn test_large_estimate_is_capped() {
        let cfg = FormulaConfig::default();
        // squat max increase is 10 kg
        assert_eq!(
            next_training_max(Lift::Squat, 140.0, Some(165.0), &cfg).unwrap(),
            150.0
        );
    }

    #[test]
    fn test_regressed_estimate_still_gets_minimum() {
        let cfg = FormulaConfig::default();
        assert_eq!(
            next_training_max(Lift::Deadlift, 200.0, Some(190.0), &cfg).unwrap(),
            202.5
        );
    }

    #[test]
    fn test_rejects_zero_max() {
        let cfg = FormulaConfig::default();
        assert!(next_training_max(Lift::Bench, 0.0, None, &cfg).is_err());
    }
}
