//! ironplan - periodized strength program planner
//!
//! Builds a block-periodized squat/bench/deadlift skeleton up front and
//! prescribes each session just in time from the athlete's current state.

pub mod auxiliary;
pub mod config;
pub mod error;
pub mod formula;
pub mod jit;
pub mod lifts;
pub mod math;
pub mod schedule;
pub mod strategy;
pub mod volume;
pub mod warmup;

pub use error::{AdvisoryError, PlanError, PlanResult};
pub use jit::{JitInput, JitOutput};
pub use strategy::{GenerationStrategy, StrategyTag};
