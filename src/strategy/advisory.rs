//! Advisory strategy: an external advisor adjusts the formula baseline
//! within fixed bounds; any failure falls back to the formula output.

use std::ops::RangeInclusive;
use std::time::Duration;

use async_trait::async_trait;

use super::{AdvisoryClient, AdvisoryRequest, AdvisoryResponse, FormulaStrategy, GenerationStrategy, StrategyTag};
use crate::error::{AdvisoryError, PlanResult};
use crate::formula::calculator::uniform_sets;
use crate::formula::PlannedSet;
use crate::jit::pipeline::{auxiliary_sets, baseline_sets};
use crate::jit::soreness::worst_primary_soreness;
use crate::jit::{enforce, AppliedModifiers, AuxiliaryWork, JitInput, JitOutput, SorenessLevel};
use crate::math::round_to_increment;

pub const DEFAULT_ADVISORY_TIMEOUT: Duration = Duration::from_secs(8);
pub const INTENSITY_MULTIPLIER_RANGE: RangeInclusive<f64> = 0.70..=1.10;
pub const SET_DELTA_RANGE: RangeInclusive<i32> = -3..=2;
pub const MAX_RATIONALE_ITEMS: usize = 5;
pub const MAX_RATIONALE_CHARS: usize = 280;

impl AdvisoryResponse {
    /// Reject anything outside the accepted descriptor bounds
    pub fn validate(&self) -> Result<(), AdvisoryError> {
        check_multiplier("intensity_multiplier", self.intensity_multiplier)?;
        if !SET_DELTA_RANGE.contains(&self.set_delta) {
            return Err(AdvisoryError::OutOfBounds(format!(
                "set_delta {} not in {:?}",
                self.set_delta, SET_DELTA_RANGE
            )));
        }
        if self.rationale.len() > MAX_RATIONALE_ITEMS {
            return Err(AdvisoryError::OutOfBounds(format!(
                "{} rationale strings (max {})",
                self.rationale.len(),
                MAX_RATIONALE_ITEMS
            )));
        }
        if let Some(long) = self
            .rationale
            .iter()
            .find(|r| r.chars().count() > MAX_RATIONALE_CHARS)
        {
            return Err(AdvisoryError::OutOfBounds(format!(
                "rationale of {} chars (max {})",
                long.chars().count(),
                MAX_RATIONALE_CHARS
            )));
        }
        for aux in &self.auxiliary_overrides {
            if let Some(m) = aux.intensity_multiplier {
                check_multiplier(&aux.exercise, m)?;
            }
        }
        Ok(())
    }
}

fn check_multiplier(field: &str, value: f64) -> Result<(), AdvisoryError> {
    if INTENSITY_MULTIPLIER_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(AdvisoryError::OutOfBounds(format!(
            "{} multiplier {} not in {:?}",
            field, value, INTENSITY_MULTIPLIER_RANGE
        )))
    }
}

pub struct AdvisoryStrategy<C> {
    client: C,
    timeout: Duration,
    formula: FormulaStrategy,
}

impl<C: AdvisoryClient> AdvisoryStrategy<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            timeout: DEFAULT_ADVISORY_TIMEOUT,
            formula: FormulaStrategy::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Advisory output, or the reason the advisor could not be used
    pub async fn try_generate(&self, input: &JitInput) -> Result<JitOutput, AdvisoryError> {
        let baseline = baseline_sets(input)?;
        let request = AdvisoryRequest::from_input(input, &baseline);

        let response = match tokio::time::timeout(self.timeout, self.client.advise(&request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(AdvisoryError::Timeout(self.timeout)),
        };
        response.validate()?;

        let candidate = apply_descriptor(input, &baseline, &response);
        Ok(enforce(candidate, input)?)
    }

    /// Formula output tagged as a fallback
    pub fn fallback(&self, input: &JitInput, error: &AdvisoryError) -> PlanResult<JitOutput> {
        tracing::warn!("Advisory unavailable for {} {}: {}", input.lift, input.intensity_type, error);
        let mut out = self.formula.prescribe(input)?;
        out.strategy = StrategyTag::Fallback;
        out.warnings
            .push(format!("Advisory unavailable ({}): formula prescription used", error));
        Ok(out)
    }
}

#[async_trait]
impl<C: AdvisoryClient> GenerationStrategy for AdvisoryStrategy<C> {
    fn tag(&self) -> StrategyTag {
        StrategyTag::Advisory
    }

    async fn generate(&self, input: &JitInput) -> PlanResult<JitOutput> {
        match self.try_generate(input).await {
            Ok(out) => Ok(out),
            Err(AdvisoryError::Input(e)) => Err(e),
            Err(e) => self.fallback(input, &e),
        }
    }
}

/// Candidate from a validated descriptor applied to the formula baseline.
/// Warmups are left to the enforcer.
fn apply_descriptor(
    input: &JitInput,
    baseline: &[PlannedSet],
    response: &AdvisoryResponse,
) -> JitOutput {
    let increment = input.increment();
    let template = &baseline[0];
    let (level, _) = worst_primary_soreness(input.lift, &input.soreness);

    let count = (baseline.len() as i64 + response.set_delta as i64).max(0) as u32;
    let weight = round_to_increment(template.weight_kg * response.intensity_multiplier, increment);
    let sets = if response.skip {
        Vec::new()
    } else {
        uniform_sets(count, weight, template.reps, template.rep_range, template.rpe_target)
    };

    let auxiliary_work = input
        .auxiliary_exercises
        .iter()
        .take(2)
        .map(|exercise| {
            let adjustment = response
                .auxiliary_overrides
                .iter()
                .find(|o| o.exercise == *exercise);
            if response.skip {
                return AuxiliaryWork::skipped(exercise, "session skipped");
            }
            if level == SorenessLevel::Severe {
                return AuxiliaryWork::skipped(exercise, "severe soreness");
            }
            if adjustment.is_some_and(|a| a.skip) {
                return AuxiliaryWork::skipped(exercise, "advisor");
            }
            let mut sets = auxiliary_sets(input, level);
            if let Some(m) = adjustment.and_then(|a| a.intensity_multiplier) {
                for set in sets.iter_mut() {
                    set.weight_kg = round_to_increment(set.weight_kg * m, increment);
                }
            }
            AuxiliaryWork {
                exercise: exercise.clone(),
                sets,
                skipped: false,
                skip_reason: None,
            }
        })
        .collect();

    let mut rationale = response.rationale.clone();
    if rationale.is_empty() {
        rationale.push(format!(
            "Advisor adjustment: load x{:.3}, {:+} sets",
            response.intensity_multiplier, response.set_delta
        ));
    }

    JitOutput {
        lift: input.lift,
        intensity_type: input.intensity_type,
        block: input.block,
        sets,
        warmup_sets: Vec::new(),
        auxiliary_work,
        rest: input.rest.prescribe(input.intensity_type, false),
        modifiers: AppliedModifiers {
            trend: None,
            soreness_level: level,
            recovery_mode: false,
            volume_cap: None,
            disruption: None,
            intensity_multiplier: response.intensity_multiplier,
            constraint_corrections: 0,
        },
        rationale,
        warnings: Vec::new(),
        skipped: response.skip,
        strategy: StrategyTag::Advisory,
        comparison: None,
    }
}
