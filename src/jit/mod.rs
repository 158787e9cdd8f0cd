//! Just-in-time session generation
//!
//! Prescriptions are computed when the athlete starts a session, from the
//! formula baseline adjusted by trend, soreness, volume capacity and
//! disruptions, then passed through the constraint enforcer.

pub mod constraints;
pub mod disruption;
pub mod pipeline;
pub mod soreness;
pub mod trend;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::formula::{FormulaConfig, PlannedSet};
use crate::lifts::{Block, IntensityType, Lift, MuscleGroup};
use crate::strategy::{Divergence, StrategyTag};
use crate::volume::MrvMevConfig;
use crate::warmup::{WarmupConfig, WarmupSet};

pub use constraints::enforce;
pub use disruption::{DisruptionStatus, DisruptionType, Severity, TrainingDisruption};
pub use pipeline::run_pipeline;
pub use soreness::{BiologicalSex, SorenessLevel, SorenessModifier};
pub use trend::{PerformanceSuggestion, RpeLog, TrendDirection};

/// Numeric thresholds of the pipeline and the constraint enforcer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineTuning {
    pub trend_deviation_threshold: f64,
    pub trend_adjustment: f64,
    /// Fraction of the baseline weight used in recovery mode
    pub recovery_weight_fraction: f64,
    pub recovery_sets: u32,
    pub recovery_reps: u32,
    pub recovery_rpe: f64,
    /// No set may go below this fraction of the baseline weight
    pub weight_floor_fraction: f64,
    pub moderate_disruption_multiplier: f64,
    pub auxiliary_sets: u32,
    pub auxiliary_percent: f64,
    pub auxiliary_reps: u32,
    pub auxiliary_rpe: f64,
    pub bar_weight_kg: f64,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            trend_deviation_threshold: 1.0,
            trend_adjustment: 0.025,
            recovery_weight_fraction: 0.40,
            recovery_sets: 3,
            recovery_reps: 5,
            recovery_rpe: 5.0,
            weight_floor_fraction: 0.40,
            moderate_disruption_multiplier: 0.90,
            auxiliary_sets: 3,
            auxiliary_percent: 0.675,
            auxiliary_reps: 10,
            auxiliary_rpe: 7.5,
            bar_weight_kg: crate::math::DEFAULT_BAR_WEIGHT_KG,
        }
    }
}

/// Rest between sets, seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    pub heavy_secs: u32,
    pub explosive_secs: u32,
    pub rep_secs: u32,
    pub deload_secs: u32,
    pub auxiliary_secs: u32,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            heavy_secs: 240,
            explosive_secs: 180,
            rep_secs: 150,
            deload_secs: 120,
            auxiliary_secs: 90,
        }
    }
}

impl RestConfig {
    pub fn for_intensity(&self, intensity: IntensityType) -> u32 {
        match intensity {
            IntensityType::Heavy => self.heavy_secs,
            IntensityType::Explosive => self.explosive_secs,
            IntensityType::Rep => self.rep_secs,
            IntensityType::Deload => self.deload_secs,
        }
    }

    /// Rest for a session; recovery sessions rest like a deload
    pub fn prescribe(&self, intensity: IntensityType, recovery_mode: bool) -> RestPrescription {
        let main_secs = if recovery_mode {
            self.deload_secs
        } else {
            self.for_intensity(intensity)
        };
        RestPrescription {
            main_secs,
            auxiliary_secs: self.auxiliary_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestPrescription {
    pub main_secs: u32,
    pub auxiliary_secs: u32,
}

/// Everything needed to prescribe one session.
///
/// `one_rep_max` and `formula_config` arrive fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JitInput {
    pub session_date: NaiveDate,
    pub lift: Lift,
    pub intensity_type: IntensityType,
    #[serde(default)]
    pub block: Option<Block>,
    pub one_rep_max: f64,
    #[serde(default)]
    pub formula_config: FormulaConfig,
    #[serde(default)]
    pub biological_sex: BiologicalSex,
    #[serde(default)]
    pub soreness: HashMap<MuscleGroup, SorenessLevel>,
    /// Set-equivalents already done this week
    #[serde(default)]
    pub weekly_volume: HashMap<MuscleGroup, f64>,
    #[serde(default)]
    pub volume_landmarks: MrvMevConfig,
    #[serde(default)]
    pub disruptions: Vec<TrainingDisruption>,
    #[serde(default)]
    pub rpe_history: Vec<RpeLog>,
    /// Assigned accessories for this block, at most two are used
    #[serde(default)]
    pub auxiliary_exercises: Vec<String>,
    #[serde(default)]
    pub warmup: WarmupConfig,
    #[serde(default)]
    pub rest: RestConfig,
    #[serde(default)]
    pub tuning: PipelineTuning,
}

impl JitInput {
    /// Input with default config and no athlete state
    pub fn new(
        session_date: NaiveDate,
        lift: Lift,
        intensity_type: IntensityType,
        block: Option<Block>,
        one_rep_max: f64,
    ) -> Self {
        Self {
            session_date,
            lift,
            intensity_type,
            block,
            one_rep_max,
            formula_config: FormulaConfig::default(),
            biological_sex: BiologicalSex::default(),
            soreness: HashMap::new(),
            weekly_volume: HashMap::new(),
            volume_landmarks: MrvMevConfig::default(),
            disruptions: Vec::new(),
            rpe_history: Vec::new(),
            auxiliary_exercises: Vec::new(),
            warmup: WarmupConfig::default(),
            rest: RestConfig::default(),
            tuning: PipelineTuning::default(),
        }
    }

    pub fn increment(&self) -> f64 {
        self.formula_config.rounding_increment_kg
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryWork {
    pub exercise: String,
    pub sets: Vec<PlannedSet>,
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl AuxiliaryWork {
    pub fn skipped(exercise: &str, reason: impl Into<String>) -> Self {
        Self {
            exercise: exercise.to_string(),
            sets: Vec::new(),
            skipped: true,
            skip_reason: Some(reason.into()),
        }
    }
}

/// Which adjustments shaped the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedModifiers {
    pub trend: Option<TrendDirection>,
    pub soreness_level: SorenessLevel,
    pub recovery_mode: bool,
    pub volume_cap: Option<u32>,
    pub disruption: Option<Severity>,
    /// Product of every intensity multiplier applied to the baseline weight
    pub intensity_multiplier: f64,
    /// Number of corrections made by the constraint enforcer
    pub constraint_corrections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JitOutput {
    pub lift: Lift,
    pub intensity_type: IntensityType,
    pub block: Option<Block>,
    pub sets: Vec<PlannedSet>,
    pub warmup_sets: Vec<WarmupSet>,
    pub auxiliary_work: Vec<AuxiliaryWork>,
    pub rest: RestPrescription,
    pub modifiers: AppliedModifiers,
    pub rationale: Vec<String>,
    pub warnings: Vec<String>,
    pub skipped: bool,
    pub strategy: StrategyTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Divergence>,
}

impl JitOutput {
    /// Weight of the first working set
    pub fn working_weight(&self) -> Option<f64> {
        self.sets.first().map(|s| s.weight_kg)
    }
}
