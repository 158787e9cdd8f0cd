//! Weight and rep arithmetic shared by every planner stage

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

/// Empty Olympic bar; nothing is ever prescribed below it.
pub const DEFAULT_BAR_WEIGHT_KG: f64 = 20.0;

/// Smallest plate jump most gyms can load (2 × 1.25 kg)
pub const DEFAULT_ROUNDING_KG: f64 = 2.5;

/// Highest rep count the 1RM estimate is trusted for
pub const MAX_ESTIMATION_REPS: u32 = 12;

const LB_PER_KG: f64 = 2.204_62;

/// Round a weight to the nearest multiple of `increment`.
///
/// Idempotent: rounding an already-rounded value returns it unchanged.
/// A non-positive increment leaves the weight untouched.
pub fn round_to_increment(weight: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return weight;
    }
    (weight / increment).round() * increment
}

/// Estimate a one-rep max from a sub-maximal set (Epley).
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> PlanResult<f64> {
    if weight <= 0.0 || !weight.is_finite() {
        return Err(PlanError::NonPositiveWeight(weight));
    }
    if reps == 0 || reps > MAX_ESTIMATION_REPS {
        return Err(PlanError::UnsupportedRepCount(reps));
    }
    if reps == 1 {
        return Ok(weight);
    }
    Ok(weight * (1.0 + reps as f64 / 30.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }
}

/// Convert a weight between units
pub fn convert(weight: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    match (from, to) {
        (WeightUnit::Kg, WeightUnit::Lb) => weight * LB_PER_KG,
        (WeightUnit::Lb, WeightUnit::Kg) => weight / LB_PER_KG,
        _ => weight,
    }
}
