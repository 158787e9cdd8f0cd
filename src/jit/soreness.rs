//! Soreness ratings and the modifiers they map to

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::lifts::{Lift, MuscleGroup};

/// Self-reported soreness, 1 (fresh) to 5 (severe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SorenessLevel {
    #[default]
    Fresh,
    Mild,
    Moderate,
    Sore,
    Severe,
}

impl SorenessLevel {
    pub fn value(&self) -> u8 {
        match self {
            SorenessLevel::Fresh => 1,
            SorenessLevel::Mild => 2,
            SorenessLevel::Moderate => 3,
            SorenessLevel::Sore => 4,
            SorenessLevel::Severe => 5,
        }
    }
}

impl TryFrom<u8> for SorenessLevel {
    type Error = PlanError;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(SorenessLevel::Fresh),
            2 => Ok(SorenessLevel::Mild),
            3 => Ok(SorenessLevel::Moderate),
            4 => Ok(SorenessLevel::Sore),
            5 => Ok(SorenessLevel::Severe),
            other => Err(PlanError::InvalidSoreness(other)),
        }
    }
}

impl From<SorenessLevel> for u8 {
    fn from(level: SorenessLevel) -> u8 {
        level.value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SorenessModifier {
    pub level: SorenessLevel,
    pub set_reduction: u32,
    pub intensity_multiplier: f64,
    pub recovery_mode: bool,
    pub warning: Option<String>,
}

impl SorenessModifier {
    /// Modifier for a soreness level. Levels 3 and 5 are the same for both
    /// tables; level 4 differs.
    pub fn lookup(level: SorenessLevel, sex: BiologicalSex) -> Self {
        let (set_reduction, intensity_multiplier, recovery_mode, warning) = match (level, sex) {
            (SorenessLevel::Fresh | SorenessLevel::Mild, _) => (0, 1.0, false, None),
            (SorenessLevel::Moderate, _) => (
                1,
                1.0,
                false,
                Some("Moderate soreness: one set removed"),
            ),
            (SorenessLevel::Sore, BiologicalSex::Male) => (
                2,
                0.95,
                false,
                Some("High soreness: two sets removed and load reduced 5%"),
            ),
            (SorenessLevel::Sore, BiologicalSex::Female) => (
                1,
                0.97,
                false,
                Some("High soreness: one set removed and load reduced 3%"),
            ),
            (SorenessLevel::Severe, _) => (
                0,
                1.0,
                true,
                Some("Severe soreness: recovery session at 40% with no accessories"),
            ),
        };
        Self {
            level,
            set_reduction,
            intensity_multiplier,
            recovery_mode,
            warning: warning.map(str::to_string),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.set_reduction == 0 && self.intensity_multiplier == 1.0 && !self.recovery_mode
    }
}

/// Worst rating across the lift's primary muscles; unrated muscles are fresh
pub fn worst_primary_soreness(
    lift: Lift,
    ratings: &HashMap<MuscleGroup, SorenessLevel>,
) -> (SorenessLevel, Option<MuscleGroup>) {
    lift.primary_muscles()
        .map(|m| (ratings.get(&m).copied().unwrap_or_default(), m))
        .max_by_key(|(level, _)| *level)
        .map(|(level, m)| (level, (level > SorenessLevel::Fresh).then_some(m)))
        .unwrap_or((SorenessLevel::Fresh, None))
}
