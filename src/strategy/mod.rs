//! Generation strategies
//!
//! Three interchangeable producers of a session prescription:
//! - [`FormulaStrategy`]: adjustment pipeline, deterministic
//! - [`AdvisoryStrategy`]: bounded descriptor from an external advisor, with
//!   formula fallback
//! - [`HybridStrategy`]: runs both concurrently and reports their divergence
//!
//! Every candidate goes through the same constraint enforcer.

pub mod advisory;
pub mod formula;
pub mod http;
pub mod hybrid;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisoryError, PlanResult};
use crate::formula::PlannedSet;
use crate::jit::{BiologicalSex, JitInput, JitOutput, RpeLog, SorenessLevel, TrainingDisruption};
use crate::lifts::{Block, IntensityType, Lift, MuscleGroup};
use crate::volume::MrvMevConfig;

pub use advisory::AdvisoryStrategy;
pub use formula::FormulaStrategy;
pub use http::HttpAdvisoryClient;
pub use hybrid::{ComparisonObserver, Divergence, HybridStrategy};

/// Which path produced an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyTag {
    Formula,
    Advisory,
    Hybrid,
    /// Advisory path failed; formula output substituted
    Fallback,
}

#[async_trait]
pub trait GenerationStrategy: Send + Sync {
    fn tag(&self) -> StrategyTag;

    /// Final prescription for one session. Only malformed input is an error.
    async fn generate(&self, input: &JitInput) -> PlanResult<JitOutput>;
}

/// What the advisor sees: the session input without any warmup settings,
/// plus the formula baseline it adjusts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub session_date: NaiveDate,
    pub lift: Lift,
    pub intensity_type: IntensityType,
    pub block: Option<Block>,
    pub one_rep_max: f64,
    pub biological_sex: BiologicalSex,
    pub soreness: HashMap<MuscleGroup, SorenessLevel>,
    pub weekly_volume: HashMap<MuscleGroup, f64>,
    pub volume_landmarks: MrvMevConfig,
    pub disruptions: Vec<TrainingDisruption>,
    pub rpe_history: Vec<RpeLog>,
    pub auxiliary_exercises: Vec<String>,
    pub baseline: Vec<PlannedSet>,
}

impl AdvisoryRequest {
    pub fn from_input(input: &JitInput, baseline: &[PlannedSet]) -> Self {
        Self {
            session_date: input.session_date,
            lift: input.lift,
            intensity_type: input.intensity_type,
            block: input.block,
            one_rep_max: input.one_rep_max,
            biological_sex: input.biological_sex,
            soreness: input.soreness.clone(),
            weekly_volume: input.weekly_volume.clone(),
            volume_landmarks: input.volume_landmarks.clone(),
            disruptions: input.disruptions.clone(),
            rpe_history: input.rpe_history.clone(),
            auxiliary_exercises: input.auxiliary_exercises.clone(),
            baseline: baseline.to_vec(),
        }
    }
}

/// Per-accessory adjustment from the advisor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxOverride {
    pub exercise: String,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub intensity_multiplier: Option<f64>,
}

/// Bounded adjustment descriptor returned by the advisor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub intensity_multiplier: f64,
    #[serde(default)]
    pub set_delta: i32,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub auxiliary_overrides: Vec<AuxOverride>,
    #[serde(default)]
    pub rationale: Vec<String>,
}

/// External advisor behind the advisory strategy
#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError>;
}


#[cfg(test)]
mod tests {
    use super::testing::squat_input;
    use super::*;
    use crate::jit::pipeline::baseline_sets;

    #[test]
    fn test_request_carries_no_warmup_config() {
        let input = squat_input();
        let baseline = baseline_sets(&input).unwrap();
        let request = AdvisoryRequest::from_input(&input, &baseline);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("warmup").is_none());
        assert_eq!(json["baseline"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_response_defaults() {
        let response: AdvisoryResponse =
            serde_json::from_str(r#"{"intensity_multiplier": 0.95}"#).unwrap();
        assert_eq!(response.set_delta, 0);
        assert!(!response.skip);
        assert!(response.rationale.is_empty());
    }

    #[test]
    fn test_response_requires_multiplier() {
        assert!(serde_json::from_str::<AdvisoryResponse>(r#"{"set_delta": 1}"#).is_err());
    }
}
