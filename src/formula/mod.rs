//! Formula engine - deterministic prescriptions from percentage tables
//!
//! - Versioned per-block tables with deep-mergeable overrides
//! - Set calculator (lift + intensity + block + max -> planned sets)
//! - Training-max progression between programs

pub mod calculator;
pub mod config;
pub mod progression;

pub use calculator::{calculate_sets, PlannedSet, RepRange};
pub use config::{FormulaConfig, FormulaOverrides};
pub use progression::next_training_max;
