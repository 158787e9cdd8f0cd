use async_trait::async_trait;

use super::{GenerationStrategy, StrategyTag};
use crate::error::PlanResult;
use crate::jit::{enforce, run_pipeline, JitInput, JitOutput};

/// Adjustment pipeline followed by the constraint enforcer
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaStrategy;

impl FormulaStrategy {
    pub fn new() -> Self {
        Self
    }

    pub fn prescribe(&self, input: &JitInput) -> PlanResult<JitOutput> {
        enforce(run_pipeline(input)?, input)
    }
}

#[async_trait]
impl GenerationStrategy for FormulaStrategy {
    fn tag(&self) -> StrategyTag {
        StrategyTag::Formula
    }

    async fn generate(&self, input: &JitInput) -> PlanResult<JitOutput> {
        self.prescribe(input)
    }
}
