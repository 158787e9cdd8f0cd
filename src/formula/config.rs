//! Formula configuration - per-block prescription tables and overrides

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::lifts::{Block, Lift};
use crate::math::DEFAULT_ROUNDING_KG;

pub const FORMULA_CONFIG_VERSION: u32 = 1;

/// Fixed sets × reps at a percentage of the max (heavy and explosive days)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPrescription {
    pub percent: f64,
    pub sets: u32,
    pub reps: u32,
    /// Rep ceiling; when above `reps` each set carries a rep range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps_max: Option<u32>,
    pub rpe_target: f64,
}

/// Rep day: set and rep counts are ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepPrescription {
    pub percent: f64,
    pub sets_min: u32,
    pub sets_max: u32,
    pub reps_min: u32,
    pub reps_max: u32,
    pub rpe_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPrescription {
    pub heavy: FixedPrescription,
    pub explosive: FixedPrescription,
    pub rep: RepPrescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadPrescription {
    pub percent: f64,
    pub sets: u32,
    pub reps: u32,
    pub rpe_target: f64,
}

/// Allowed training-max change between programs, in kg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncreaseBounds {
    pub min_kg: f64,
    pub max_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMaxBounds {
    pub squat: IncreaseBounds,
    pub bench: IncreaseBounds,
    pub deadlift: IncreaseBounds,
}

impl TrainingMaxBounds {
    pub fn for_lift(&self, lift: Lift) -> IncreaseBounds {
        match lift {
            Lift::Squat => self.squat,
            Lift::Bench => self.bench,
            Lift::Deadlift => self.deadlift,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaConfig {
    pub version: u32,
    pub block1: BlockPrescription,
    pub block2: BlockPrescription,
    pub block3: BlockPrescription,
    pub deload: DeloadPrescription,
    pub progressive_overload_increment_kg: f64,
    pub training_max_increase: TrainingMaxBounds,
    pub rounding_increment_kg: f64,
}

fn fixed(percent: f64, sets: u32, reps: u32, reps_max: Option<u32>, rpe_target: f64) -> FixedPrescription {
    FixedPrescription { percent, sets, reps, reps_max, rpe_target }
}

fn rep_range(percent: f64, reps_min: u32, reps_max: u32, rpe_target: f64) -> RepPrescription {
    RepPrescription {
        percent,
        sets_min: 2,
        sets_max: 3,
        reps_min,
        reps_max,
        rpe_target,
    }
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            version: FORMULA_CONFIG_VERSION,
            block1: BlockPrescription {
                heavy: fixed(0.80, 2, 5, None, 8.5),
                explosive: fixed(0.65, 6, 2, None, 6.0),
                rep: rep_range(0.70, 8, 12, 8.0),
            },
            block2: BlockPrescription {
                heavy: fixed(0.85, 2, 3, Some(4), 9.0),
                explosive: fixed(0.70, 6, 2, None, 6.5),
                rep: rep_range(0.75, 6, 10, 8.5),
            },
            block3: BlockPrescription {
                heavy: fixed(0.90, 2, 2, Some(3), 9.5),
                explosive: fixed(0.75, 6, 1, None, 7.0),
                rep: rep_range(0.80, 4, 8, 9.0),
            },
            deload: DeloadPrescription {
                percent: 0.40,
                sets: 3,
                reps: 5,
                rpe_target: 5.0,
            },
            progressive_overload_increment_kg: 2.5,
            training_max_increase: TrainingMaxBounds {
                squat: IncreaseBounds { min_kg: 2.5, max_kg: 10.0 },
                bench: IncreaseBounds { min_kg: 1.25, max_kg: 5.0 },
                deadlift: IncreaseBounds { min_kg: 2.5, max_kg: 12.5 },
            },
            rounding_increment_kg: DEFAULT_ROUNDING_KG,
        }
    }
}

impl FormulaConfig {
    pub fn block(&self, block: Block) -> &BlockPrescription {
        match block {
            Block::One => &self.block1,
            Block::Two => &self.block2,
            Block::Three => &self.block3,
        }
    }

    /// Deep-merge `overrides` over this config and validate the result.
    ///
    /// Only leaf fields present in the override replace values here.
    pub fn merged(&self, overrides: &FormulaOverrides) -> PlanResult<Self> {
        let mut out = self.clone();
        if let Some(o) = &overrides.block1 {
            o.apply(&mut out.block1);
        }
        if let Some(o) = &overrides.block2 {
            o.apply(&mut out.block2);
        }
        if let Some(o) = &overrides.block3 {
            o.apply(&mut out.block3);
        }
        if let Some(o) = &overrides.deload {
            set(&mut out.deload.percent, o.percent);
            set(&mut out.deload.sets, o.sets);
            set(&mut out.deload.reps, o.reps);
            set(&mut out.deload.rpe_target, o.rpe_target);
        }
        set(
            &mut out.progressive_overload_increment_kg,
            overrides.progressive_overload_increment_kg,
        );
        if let Some(o) = &overrides.training_max_increase {
            o.squat.apply(&mut out.training_max_increase.squat);
            o.bench.apply(&mut out.training_max_increase.bench);
            o.deadlift.apply(&mut out.training_max_increase.deadlift);
        }
        set(&mut out.rounding_increment_kg, overrides.rounding_increment_kg);

        out.validate()?;
        Ok(out)
    }

    /// Check percentages, counts and the rounding increment
    pub fn validate(&self) -> PlanResult<()> {
        for block in Block::ALL {
            let b = self.block(block);
            let n = block.number();
            check_fixed(&format!("block{}.heavy", n), &b.heavy)?;
            check_fixed(&format!("block{}.explosive", n), &b.explosive)?;
            let rep = &b.rep;
            let name = format!("block{}.rep", n);
            check_percent(&name, rep.percent)?;
            check_count(&name, rep.sets_min)?;
            check_count(&name, rep.reps_min)?;
            if rep.sets_max < rep.sets_min || rep.reps_max < rep.reps_min {
                return Err(PlanError::InvalidConfig(format!("{}: inverted range", name)));
            }
        }
        check_percent("deload", self.deload.percent)?;
        check_count("deload", self.deload.sets)?;
        check_count("deload", self.deload.reps)?;
        if !(self.rounding_increment_kg > 0.0) {
            return Err(PlanError::InvalidConfig(format!(
                "rounding_increment_kg must be positive, got {}",
                self.rounding_increment_kg
            )));
        }
        for (name, b) in [
            ("squat", self.training_max_increase.squat),
            ("bench", self.training_max_increase.bench),
            ("deadlift", self.training_max_increase.deadlift),
        ] {
            if b.min_kg < 0.0 || b.max_kg < b.min_kg {
                return Err(PlanError::InvalidConfig(format!(
                    "training_max_increase.{}: invalid bounds {}..{}",
                    name, b.min_kg, b.max_kg
                )));
            }
        }
        Ok(())
    }
}

fn check_percent(name: &str, pct: f64) -> PlanResult<()> {
    if pct > 0.0 && pct <= 1.0 {
        Ok(())
    } else {
        Err(PlanError::InvalidConfig(format!("{}: percent {} not in (0, 1]", name, pct)))
    }
}

fn check_count(name: &str, n: u32) -> PlanResult<()> {
    if n >= 1 {
        Ok(())
    } else {
        Err(PlanError::InvalidConfig(format!("{}: counts must be >= 1", name)))
    }
}

fn check_fixed(name: &str, p: &FixedPrescription) -> PlanResult<()> {
    check_percent(name, p.percent)?;
    check_count(name, p.sets)?;
    check_count(name, p.reps)
}

fn set<T: Copy>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

// ---------------------------------------------------------------------------
// Overrides: a partial mirror of FormulaConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedOverride {
    pub percent: Option<f64>,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub reps_max: Option<u32>,
    pub rpe_target: Option<f64>,
}

impl FixedOverride {
    fn apply(&self, p: &mut FixedPrescription) {
        set(&mut p.percent, self.percent);
        set(&mut p.sets, self.sets);
        set(&mut p.reps, self.reps);
        if self.reps_max.is_some() {
            p.reps_max = self.reps_max;
        }
        set(&mut p.rpe_target, self.rpe_target);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepOverride {
    pub percent: Option<f64>,
    pub sets_min: Option<u32>,
    pub sets_max: Option<u32>,
    pub reps_min: Option<u32>,
    pub reps_max: Option<u32>,
    pub rpe_target: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockOverride {
    pub heavy: Option<FixedOverride>,
    pub explosive: Option<FixedOverride>,
    pub rep: Option<RepOverride>,
}

impl BlockOverride {
    fn apply(&self, b: &mut BlockPrescription) {
        if let Some(o) = &self.heavy {
            o.apply(&mut b.heavy);
        }
        if let Some(o) = &self.explosive {
            o.apply(&mut b.explosive);
        }
        if let Some(o) = &self.rep {
            set(&mut b.rep.percent, o.percent);
            set(&mut b.rep.sets_min, o.sets_min);
            set(&mut b.rep.sets_max, o.sets_max);
            set(&mut b.rep.reps_min, o.reps_min);
            set(&mut b.rep.reps_max, o.reps_max);
            set(&mut b.rep.rpe_target, o.rpe_target);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeloadOverride {
    pub percent: Option<f64>,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub rpe_target: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsOverride {
    pub min_kg: Option<f64>,
    pub max_kg: Option<f64>,
}

impl BoundsOverride {
    fn apply(&self, b: &mut IncreaseBounds) {
        set(&mut b.min_kg, self.min_kg);
        set(&mut b.max_kg, self.max_kg);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingMaxOverride {
    pub squat: BoundsOverride,
    pub bench: BoundsOverride,
    pub deadlift: BoundsOverride,
}

/// User or system overrides; absent fields keep the base value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaOverrides {
    pub block1: Option<BlockOverride>,
    pub block2: Option<BlockOverride>,
    pub block3: Option<BlockOverride>,
    pub deload: Option<DeloadOverride>,
    pub progressive_overload_increment_kg: Option<f64>,
    pub training_max_increase: Option<TrainingMaxOverride>,
    pub rounding_increment_kg: Option<f64>,
}
