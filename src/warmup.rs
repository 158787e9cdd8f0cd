//! Warmup ramp from a resolved working weight

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::math::{round_to_increment, DEFAULT_BAR_WEIGHT_KG, DEFAULT_ROUNDING_KG};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarmupStep {
    /// Fraction of the working weight
    pub percent: f64,
    pub reps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmupPreset {
    Standard,
    Minimal,
    Extended,
}

const fn step(percent: f64, reps: u32) -> WarmupStep {
    WarmupStep { percent, reps }
}

const STANDARD: &[WarmupStep] = &[step(0.40, 5), step(0.55, 3), step(0.70, 2), step(0.85, 1)];
const MINIMAL: &[WarmupStep] = &[step(0.50, 5), step(0.70, 3)];
const EXTENDED: &[WarmupStep] = &[
    step(0.30, 10),
    step(0.45, 5),
    step(0.60, 3),
    step(0.75, 2),
    step(0.85, 1),
    step(0.92, 1),
];

impl WarmupPreset {
    pub fn steps(&self) -> &'static [WarmupStep] {
        match self {
            WarmupPreset::Standard => STANDARD,
            WarmupPreset::Minimal => MINIMAL,
            WarmupPreset::Extended => EXTENDED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WarmupProtocol {
    Preset { preset: WarmupPreset },
    Custom { steps: Vec<WarmupStep> },
}

impl Default for WarmupProtocol {
    fn default() -> Self {
        WarmupProtocol::Preset { preset: WarmupPreset::Standard }
    }
}

impl WarmupProtocol {
    /// Ordered (percentage, reps) pairs
    pub fn resolve(&self) -> PlanResult<Vec<WarmupStep>> {
        match self {
            WarmupProtocol::Preset { preset } => Ok(preset.steps().to_vec()),
            WarmupProtocol::Custom { steps } => {
                for s in steps {
                    if !(s.percent > 0.0 && s.percent <= 1.0) {
                        return Err(PlanError::InvalidWarmupStep(format!(
                            "percent {} not in (0, 1]",
                            s.percent
                        )));
                    }
                    if s.reps == 0 {
                        return Err(PlanError::InvalidWarmupStep("reps must be >= 1".to_string()));
                    }
                }
                Ok(steps.clone())
            }
        }
    }
}

/// Warmup settings supplied with each session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmupConfig {
    pub protocol: WarmupProtocol,
    /// Below this working weight the minimal protocol is used
    pub light_load_threshold_kg: f64,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            protocol: WarmupProtocol::default(),
            light_load_threshold_kg: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupSet {
    pub set_number: u32,
    pub weight_kg: f64,
    pub reps: u32,
    pub percent: f64,
}

/// Warmup sets for `working_weight`.
///
/// Each step is floored at the bar. Consecutive steps landing on the same
/// rounded weight collapse into one, and steps at or above the working weight
/// are dropped.
pub fn calculate_warmup(
    working_weight: f64,
    steps: &[WarmupStep],
    increment: f64,
    bar_weight: f64,
) -> Vec<WarmupSet> {
    let mut sets: Vec<WarmupSet> = Vec::with_capacity(steps.len());
    for s in steps {
        let weight = round_to_increment(working_weight * s.percent, increment).max(bar_weight);
        if weight >= working_weight {
            continue;
        }
        if sets.last().is_some_and(|prev| prev.weight_kg == weight) {
            continue;
        }
        sets.push(WarmupSet {
            set_number: sets.len() as u32 + 1,
            weight_kg: weight,
            reps: s.reps,
            percent: s.percent,
        });
    }
    sets
}

/// Warmup for a session, switching to the minimal ramp for recovery or light loads
pub fn session_warmup(
    working_weight: f64,
    config: &WarmupConfig,
    recovery_mode: bool,
    increment: f64,
    bar_weight: f64,
) -> PlanResult<Vec<WarmupSet>> {
    let steps = if recovery_mode || working_weight < config.light_load_threshold_kg {
        WarmupPreset::Minimal.steps().to_vec()
    } else {
        config.protocol.resolve()?
    };
    Ok(calculate_warmup(working_weight, &steps, increment, bar_weight))
}

/// Warmup with the default increment and bar
pub fn default_warmup(working_weight: f64, preset: WarmupPreset) -> Vec<WarmupSet> {
    calculate_warmup(working_weight, preset.steps(), DEFAULT_ROUNDING_KG, DEFAULT_BAR_WEIGHT_KG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ramp_below_working_weight() {
        let sets = default_warmup(112.5, WarmupPreset::Standard);
        let weights: Vec<f64> = sets.iter().map(|s| s.weight_kg).collect();
        assert_eq!(weights, vec![45.0, 62.5, 80.0, 95.0]);
        assert!(sets.last().unwrap().weight_kg < 112.5);
    }

    #[test]
    fn test_light_weight_collapses_to_bar() {
        // 40%, 55% and 70% of 30 kg all land on the bar
        let sets = default_warmup(30.0, WarmupPreset::Standard);
        let weights: Vec<f64> = sets.iter().map(|s| s.weight_kg).collect();
        assert_eq!(weights, vec![20.0, 25.0]);
        let numbers: Vec<u32> = sets.iter().map(|s| s.set_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_bar_weight_working_set_has_no_warmup() {
        assert!(default_warmup(20.0, WarmupPreset::Standard).is_empty());
    }

    #[test]
    fn test_custom_protocol_validated() {
        let protocol = WarmupProtocol::Custom { steps: vec![step(1.5, 3)] };
        assert!(protocol.resolve().is_err());
        let protocol = WarmupProtocol::Custom { steps: vec![step(0.5, 0)] };
        assert!(protocol.resolve().is_err());
    }

    #[test]
    fn test_custom_protocol_used() {
        let config = WarmupConfig {
            protocol: WarmupProtocol::Custom { steps: vec![step(0.5, 5), step(0.8, 2)] },
            ..Default::default()
        };
        let sets = session_warmup(100.0, &config, false, 2.5, 20.0).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].weight_kg, 80.0);
    }

    #[test]
    fn test_recovery_mode_uses_minimal() {
        let config = WarmupConfig::default();
        let sets = session_warmup(100.0, &config, true, 2.5, 20.0).unwrap();
        assert_eq!(sets.len(), MINIMAL.len());
    }

    #[test]
    fn test_light_load_uses_minimal() {
        let config = WarmupConfig::default();
        let sets = session_warmup(55.0, &config, false, 2.5, 20.0).unwrap();
        let weights: Vec<f64> = sets.iter().map(|s| s.weight_kg).collect();
        assert_eq!(weights, vec![27.5, 37.5]);
    }

    #[test]
    fn test_protocol_serde() {
        let json = r#"{"type": "preset", "preset": "extended"}"#;
        let protocol: WarmupProtocol = serde_json::from_str(json).unwrap();
        assert_eq!(protocol, WarmupProtocol::Preset { preset: WarmupPreset::Extended });
    }
}
