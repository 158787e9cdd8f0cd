//! Set calculator: lift + intensity + block + max -> planned sets

use serde::{Deserialize, Serialize};

use super::config::{FixedPrescription, FormulaConfig};
use crate::error::{PlanError, PlanResult};
use crate::lifts::{Block, IntensityType, Lift};
use crate::math::round_to_increment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub min: u32,
    pub max: u32,
}

/// One planned working set. `set_number` is 1-based and contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSet {
    pub set_number: u32,
    pub weight_kg: f64,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_range: Option<RepRange>,
    pub rpe_target: f64,
}

/// Build `count` identical sets numbered from 1
pub fn uniform_sets(
    count: u32,
    weight_kg: f64,
    reps: u32,
    rep_range: Option<RepRange>,
    rpe_target: f64,
) -> Vec<PlannedSet> {
    (1..=count)
        .map(|set_number| PlannedSet {
            set_number,
            weight_kg,
            reps,
            rep_range,
            rpe_target,
        })
        .collect()
}

/// Renumber sets 1..=n after sets were dropped or added
pub fn renumber(sets: &mut [PlannedSet]) {
    for (i, set) in sets.iter_mut().enumerate() {
        set.set_number = i as u32 + 1;
    }
}

/// Formula prescription for one session.
///
/// `block` is ignored for deload sessions and required otherwise.
pub fn calculate_sets(
    lift: Lift,
    intensity: IntensityType,
    block: Option<Block>,
    one_rep_max: f64,
    config: &FormulaConfig,
) -> PlanResult<Vec<PlannedSet>> {
    if !(one_rep_max > 0.0) || !one_rep_max.is_finite() {
        return Err(PlanError::NonPositiveWeight(one_rep_max));
    }
    let increment = config.rounding_increment_kg;

    let sets = match intensity {
        IntensityType::Deload => {
            let d = &config.deload;
            let weight = round_to_increment(one_rep_max * d.percent, increment);
            uniform_sets(d.sets, weight, d.reps, None, d.rpe_target)
        }
        IntensityType::Heavy | IntensityType::Explosive => {
            let block = block.ok_or(PlanError::MissingBlock(intensity.name()))?;
            let b = config.block(block);
            let p = if intensity == IntensityType::Heavy { &b.heavy } else { &b.explosive };
            fixed_sets(p, one_rep_max, increment)
        }
        IntensityType::Rep => {
            let block = block.ok_or(PlanError::MissingBlock(intensity.name()))?;
            let p = &config.block(block).rep;
            let weight = round_to_increment(one_rep_max * p.percent, increment);
            let count = ((p.sets_min + p.sets_max) as f64 / 2.0).round() as u32;
            let range = RepRange { min: p.reps_min, max: p.reps_max };
            uniform_sets(count.max(1), weight, p.reps_min, Some(range), p.rpe_target)
        }
    };

    tracing::debug!(
        "Formula {} {} block {:?}: {} sets at {}",
        lift,
        intensity,
        block.map(|b| b.number()),
        sets.len(),
        sets.first().map(|s| s.weight_kg).unwrap_or(0.0)
    );

    Ok(sets)
}

fn fixed_sets(p: &FixedPrescription, one_rep_max: f64, increment: f64) -> Vec<PlannedSet> {
    let weight = round_to_increment(one_rep_max * p.percent, increment);
    let range = p
        .reps_max
        .filter(|max| *max > p.reps)
        .map(|max| RepRange { min: p.reps, max });
    uniform_sets(p.sets, weight, p.reps, range, p.rpe_target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_block1_heavy_squat() {
        let sets = calculate_sets(
            Lift::Squat,
            IntensityType::Heavy,
            Some(Block::One),
            140.0,
            &FormulaConfig::default(),
        )
        .unwrap();
        assert_eq!(sets.len(), 2);
        for set in &sets {
            assert_eq!(set.weight_kg, 112.5);
            assert_eq!(set.reps, 5);
            assert_eq!(set.rpe_target, 8.5);
            assert!(set.rep_range.is_none());
        }
    }

    #[test]
    fn test_heavy_rep_ceiling_adds_range() {
        let sets = calculate_sets(
            Lift::Bench,
            IntensityType::Heavy,
            Some(Block::Two),
            100.0,
            &FormulaConfig::default(),
        )
        .unwrap();
        assert_eq!(sets[0].weight_kg, 85.0);
        assert_eq!(sets[0].rep_range, Some(RepRange { min: 3, max: 4 }));
    }

    #[test]
    fn test_rep_day_uses_midpoint_sets() {
        let sets = calculate_sets(
            Lift::Deadlift,
            IntensityType::Rep,
            Some(Block::One),
            200.0,
            &FormulaConfig::default(),
        )
        .unwrap();
        // round((2 + 3) / 2) = 3
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].weight_kg, 140.0);
        assert_eq!(sets[0].reps, 8);
        assert_eq!(sets[0].rep_range, Some(RepRange { min: 8, max: 12 }));
    }

    #[test]
    fn test_deload_ignores_block() {
        let sets = calculate_sets(
            Lift::Squat,
            IntensityType::Deload,
            None,
            140.0,
            &FormulaConfig::default(),
        )
        .unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].weight_kg, 55.0);
        assert_eq!(sets[0].reps, 5);
    }

    #[test]
    fn test_missing_block_is_invalid() {
        let result = calculate_sets(
            Lift::Squat,
            IntensityType::Explosive,
            None,
            140.0,
            &FormulaConfig::default(),
        );
        assert_eq!(result, Err(PlanError::MissingBlock("explosive")));
    }

    #[test]
    fn test_non_positive_max_is_invalid() {
        let result = calculate_sets(
            Lift::Squat,
            IntensityType::Heavy,
            Some(Block::One),
            0.0,
            &FormulaConfig::default(),
        );
        assert!(matches!(result, Err(PlanError::NonPositiveWeight(_))));
    }

    fn intensity_strategy() -> impl Strategy<Value = IntensityType> {
        prop::sample::select(vec![
            IntensityType::Heavy,
            IntensityType::Explosive,
            IntensityType::Rep,
            IntensityType::Deload,
        ])
    }

    proptest! {
        #[test]
        fn set_numbers_are_contiguous(
            intensity in intensity_strategy(),
            block in prop::sample::select(Block::ALL.to_vec()),
            max in 20.0f64..400.0,
        ) {
            let sets = calculate_sets(
                Lift::Squat,
                intensity,
                Some(block),
                max,
                &FormulaConfig::default(),
            ).unwrap();
            let numbers: Vec<u32> = sets.iter().map(|s| s.set_number).collect();
            let expected: Vec<u32> = (1..=sets.len() as u32).collect();
            prop_assert_eq!(numbers, expected);
        }
    }
}
