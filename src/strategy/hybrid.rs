//! Hybrid strategy: formula and advisory side by side

use std::panic::{catch_unwind, AssertUnwindSafe};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AdvisoryClient, AdvisoryStrategy, FormulaStrategy, GenerationStrategy, StrategyTag};
use crate::error::PlanResult;
use crate::jit::{JitInput, JitOutput};

/// Weight divergence up to this fraction counts as agreement
pub const WEIGHT_TOLERANCE: f64 = 0.10;
/// Weight divergence above this fraction is surfaced to the athlete
pub const SURFACING_THRESHOLD: f64 = 0.15;

/// How far the advisory output strays from the formula output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Divergence {
    /// Signed relative difference of the first working-set weight
    pub weight_pct: f64,
    /// Advisory set count minus formula set count
    pub set_delta: i32,
    pub within_tolerance: bool,
    pub needs_attention: bool,
}

impl Divergence {
    pub fn between(formula: &JitOutput, advisory: &JitOutput) -> Self {
        // one side skipped and the other not is a full divergence
        let weight_pct = match (formula.working_weight(), advisory.working_weight()) {
            (Some(f), Some(a)) if f > 0.0 => (a - f) / f,
            (None, None) => 0.0,
            _ => 1.0,
        };
        let set_delta = advisory.sets.len() as i32 - formula.sets.len() as i32;
        Self {
            weight_pct,
            set_delta,
            within_tolerance: weight_pct.abs() <= WEIGHT_TOLERANCE && set_delta == 0,
            needs_attention: weight_pct.abs() > SURFACING_THRESHOLD || set_delta != 0,
        }
    }
}

/// Receives both raw outputs whenever the advisory path succeeded.
///
/// Called inline and best-effort: errors are logged and discarded, panics
/// are caught.
pub trait ComparisonObserver: Send + Sync {
    fn observe(
        &self,
        input: &JitInput,
        formula: &JitOutput,
        advisory: &JitOutput,
        divergence: &Divergence,
    ) -> anyhow::Result<()>;
}

pub struct HybridStrategy<C> {
    formula: FormulaStrategy,
    advisory: AdvisoryStrategy<C>,
    observer: Option<Box<dyn ComparisonObserver>>,
}

impl<C: AdvisoryClient> HybridStrategy<C> {
    pub fn new(advisory: AdvisoryStrategy<C>) -> Self {
        Self {
            formula: FormulaStrategy::new(),
            advisory,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ComparisonObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    fn notify(&self, input: &JitInput, formula: &JitOutput, advisory: &JitOutput, divergence: &Divergence) {
        let Some(observer) = &self.observer else {
            return;
        };
        match catch_unwind(AssertUnwindSafe(|| {
            observer.observe(input, formula, advisory, divergence)
        })) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Comparison observer failed: {:#}", e),
            Err(_) => tracing::warn!("Comparison observer panicked"),
        }
    }
}

#[async_trait]
impl<C: AdvisoryClient> GenerationStrategy for HybridStrategy<C> {
    fn tag(&self) -> StrategyTag {
        StrategyTag::Hybrid
    }

    async fn generate(&self, input: &JitInput) -> PlanResult<JitOutput> {
        let (formula_result, advisory_result) = tokio::join!(
            async { self.formula.prescribe(input) },
            self.advisory.try_generate(input)
        );
        let formula = formula_result?;

        let advisory = match advisory_result {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!("Hybrid advisory branch failed: {}", e);
                let mut out = formula;
                out.strategy = StrategyTag::Fallback;
                out.warnings
                    .push(format!("Advisory unavailable ({}): formula prescription used", e));
                return Ok(out);
            }
        };

        let divergence = Divergence::between(&formula, &advisory);
        if divergence.needs_attention {
            tracing::info!(
                "Hybrid divergence on {} {}: weight {:+.1}%, sets {:+}",
                input.lift,
                input.intensity_type,
                divergence.weight_pct * 100.0,
                divergence.set_delta
            );
        }
        self.notify(input, &formula, &advisory, &divergence);

        let mut out = advisory;
        out.strategy = StrategyTag::Hybrid;
        out.comparison = Some(divergence);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisoryError;
    use crate::strategy::testing::{response, squat_input, StaticAdvisor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingObserver(Arc<AtomicUsize>);

    impl ComparisonObserver for CountingObserver {
        fn observe(&self, _: &JitInput, _: &JitOutput, _: &JitOutput, _: &Divergence) -> anyhow::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingObserver;

    impl ComparisonObserver for FailingObserver {
        fn observe(&self, _: &JitInput, _: &JitOutput, _: &JitOutput, _: &Divergence) -> anyhow::Result<()> {
            anyhow::bail!("log store unavailable")
        }
    }

    struct PanickingObserver;

    impl ComparisonObserver for PanickingObserver {
        fn observe(&self, _: &JitInput, _: &JitOutput, _: &JitOutput, _: &Divergence) -> anyhow::Result<()> {
            panic!("observer bug")
        }
    }

    fn hybrid(advisor: StaticAdvisor) -> HybridStrategy<StaticAdvisor> {
        HybridStrategy::new(AdvisoryStrategy::new(advisor))
    }

    #[tokio::test]
    async fn test_identical_outputs_do_not_need_attention() {
        let out = hybrid(StaticAdvisor::ok(response(1.0, 0)))
            .generate(&squat_input())
            .await
            .unwrap();
        assert_eq!(out.strategy, StrategyTag::Hybrid);
        let d = out.comparison.unwrap();
        assert_eq!(d.weight_pct, 0.0);
        assert_eq!(d.set_delta, 0);
        assert!(d.within_tolerance);
        assert!(!d.needs_attention);
        // advisory rationale is preferred
        assert_eq!(out.rationale, vec!["Bar speed looked good last week".to_string()]);
    }

    #[tokio::test]
    async fn test_large_weight_divergence_needs_attention() {
        // 112.5 -> 90: 20% lighter, same set count
        let out = hybrid(StaticAdvisor::ok(response(0.8, 0)))
            .generate(&squat_input())
            .await
            .unwrap();
        let d = out.comparison.unwrap();
        assert!((d.weight_pct + 0.2).abs() < 1e-9);
        assert_eq!(d.set_delta, 0);
        assert!(!d.within_tolerance);
        assert!(d.needs_attention);
        assert_eq!(out.sets[0].weight_kg, 90.0);
    }

    #[tokio::test]
    async fn test_moderate_divergence_outside_tolerance_not_surfaced() {
        // 112.5 -> 125: about 11% heavier
        let out = hybrid(StaticAdvisor::ok(response(1.1, 0)))
            .generate(&squat_input())
            .await
            .unwrap();
        let d = out.comparison.unwrap();
        assert!(!d.within_tolerance);
        assert!(!d.needs_attention);
    }

    #[tokio::test]
    async fn test_set_count_difference_needs_attention() {
        let out = hybrid(StaticAdvisor::ok(response(1.0, 1)))
            .generate(&squat_input())
            .await
            .unwrap();
        let d = out.comparison.unwrap();
        assert_eq!(d.set_delta, 1);
        assert!(d.needs_attention);
    }

    #[tokio::test]
    async fn test_advisory_failure_falls_back_without_comparison() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = hybrid(StaticAdvisor::err(AdvisoryError::Rejected("HTTP 503".to_string())))
            .with_observer(Box::new(CountingObserver(calls.clone())));
        let out = strategy.generate(&squat_input()).await.unwrap();
        assert_eq!(out.strategy, StrategyTag::Fallback);
        assert!(out.comparison.is_none());
        assert_eq!(out.sets.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_observer_called_on_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = hybrid(StaticAdvisor::ok(response(1.0, 0)))
            .with_observer(Box::new(CountingObserver(calls.clone())));
        strategy.generate(&squat_input()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_observer_failures_are_swallowed() {
        let out = hybrid(StaticAdvisor::ok(response(1.0, 0)))
            .with_observer(Box::new(FailingObserver))
            .generate(&squat_input())
            .await
            .unwrap();
        assert_eq!(out.strategy, StrategyTag::Hybrid);

        let out = hybrid(StaticAdvisor::ok(response(1.0, 0)))
            .with_observer(Box::new(PanickingObserver))
            .generate(&squat_input())
            .await
            .unwrap();
        assert_eq!(out.strategy, StrategyTag::Hybrid);
    }

    #[tokio::test]
    async fn test_formula_error_propagates() {
        let mut input = squat_input();
        input.one_rep_max = 0.0;
        assert!(hybrid(StaticAdvisor::ok(response(1.0, 0)))
            .generate(&input)
            .await
            .is_err());
    }

    #[test]
    fn test_skipped_versus_prescribed_is_full_divergence() {
        let input = squat_input();
        let formula = FormulaStrategy::new().prescribe(&input).unwrap();
        let mut skipped = formula.clone();
        skipped.sets.clear();
        skipped.skipped = true;
        let d = Divergence::between(&formula, &skipped);
        assert_eq!(d.weight_pct, 1.0);
        assert!(d.needs_attention);
    }
}
