//! Error types for planning and advisory calls

use std::time::Duration;

use thiserror::Error;

/// Invalid input to one of the planning operations.
///
/// Raised synchronously and never coerced into a "best guess" value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("unsupported training days per week: {0} (expected 3, 4 or 5)")]
    UnsupportedDaysPerWeek(u8),

    #[error("day index {index} out of range for {days_per_week} training days")]
    DayIndexOutOfRange { index: usize, days_per_week: u8 },

    #[error("program length {0} weeks is out of range (expected 2..=10)")]
    ProgramLength(u32),

    #[error("week {0} is out of range")]
    WeekOutOfRange(u32),

    #[error("unknown intensity type: {0}")]
    UnknownIntensityType(String),

    #[error("unknown lift: {0}")]
    UnknownLift(String),

    #[error("invalid soreness level {0} (expected 1..=5)")]
    InvalidSoreness(u8),

    #[error("weight must be positive, got {0}")]
    NonPositiveWeight(f64),

    #[error("rep count {0} outside the supported range 1..=12")]
    UnsupportedRepCount(u32),

    #[error("{0} prescription requires a training block")]
    MissingBlock(&'static str),

    #[error("invalid formula config: {0}")]
    InvalidConfig(String),

    #[error("invalid warmup step: {0}")]
    InvalidWarmupStep(String),
}

pub type PlanResult<T> = Result<T, PlanError>;

/// Failure of the external advisory capability.
///
/// These never reach callers of `GenerationStrategy::generate`; the strategy
/// layer turns them into a tagged deterministic fallback.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdvisoryError {
    #[error("advisory call timed out after {0:?}")]
    Timeout(Duration),

    #[error("advisory transport error: {0}")]
    Transport(String),

    #[error("advisory call rejected: {0}")]
    Rejected(String),

    #[error("malformed advisory response: {0}")]
    Malformed(String),

    #[error("advisory response out of bounds: {0}")]
    OutOfBounds(String),

    #[error("advisory input invalid: {0}")]
    Input(#[from] PlanError),
}
