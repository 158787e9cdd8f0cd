//! Lift definitions - which muscles each competition lift trains

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Muscle groups tracked for weekly volume
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Quads,
    Glutes,
    Hamstrings,
    LowerBack,
    UpperBack,
    Chest,
    Triceps,
    Shoulders,
    Biceps,
}

impl MuscleGroup {
    pub fn name(&self) -> &'static str {
        match self {
            MuscleGroup::Quads => "quads",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::LowerBack => "lower back",
            MuscleGroup::UpperBack => "upper back",
            MuscleGroup::Chest => "chest",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Biceps => "biceps",
        }
    }

    /// All muscle groups for iteration
    pub fn all() -> &'static [MuscleGroup] {
        &[
            MuscleGroup::Quads,
            MuscleGroup::Glutes,
            MuscleGroup::Hamstrings,
            MuscleGroup::LowerBack,
            MuscleGroup::UpperBack,
            MuscleGroup::Chest,
            MuscleGroup::Triceps,
            MuscleGroup::Shoulders,
            MuscleGroup::Biceps,
        ]
    }
}

/// How much one working set counts toward a muscle's weekly volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contribution {
    Primary,
    Secondary,
}

impl Contribution {
    pub fn weight(&self) -> f64 {
        match self {
            Contribution::Primary => 1.0,
            Contribution::Secondary => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Lift {
    Squat,
    Bench,
    Deadlift,
}

const SQUAT_MUSCLES: &[(MuscleGroup, Contribution)] = &[
    (MuscleGroup::Quads, Contribution::Primary),
    (MuscleGroup::Glutes, Contribution::Primary),
    (MuscleGroup::Hamstrings, Contribution::Secondary),
    (MuscleGroup::LowerBack, Contribution::Secondary),
];

const BENCH_MUSCLES: &[(MuscleGroup, Contribution)] = &[
    (MuscleGroup::Chest, Contribution::Primary),
    (MuscleGroup::Triceps, Contribution::Primary),
    (MuscleGroup::Shoulders, Contribution::Secondary),
];

const DEADLIFT_MUSCLES: &[(MuscleGroup, Contribution)] = &[
    (MuscleGroup::Hamstrings, Contribution::Primary),
    (MuscleGroup::Glutes, Contribution::Primary),
    (MuscleGroup::LowerBack, Contribution::Primary),
    (MuscleGroup::Quads, Contribution::Secondary),
    (MuscleGroup::UpperBack, Contribution::Secondary),
];

impl Lift {
    /// Program order: one lift per training day, cycling
    pub const ALL: [Lift; 3] = [Lift::Squat, Lift::Bench, Lift::Deadlift];

    pub fn name(&self) -> &'static str {
        match self {
            Lift::Squat => "squat",
            Lift::Bench => "bench",
            Lift::Deadlift => "deadlift",
        }
    }

    /// Muscles trained by this lift with their contribution
    pub fn muscles(&self) -> &'static [(MuscleGroup, Contribution)] {
        match self {
            Lift::Squat => SQUAT_MUSCLES,
            Lift::Bench => BENCH_MUSCLES,
            Lift::Deadlift => DEADLIFT_MUSCLES,
        }
    }

    pub fn primary_muscles(self) -> impl Iterator<Item = MuscleGroup> {
        self.muscles()
            .iter()
            .filter(|(_, c)| *c == Contribution::Primary)
            .map(|(m, _)| *m)
    }

    /// Contribution of this lift to `muscle`, if it trains it at all
    pub fn contribution(&self, muscle: MuscleGroup) -> Option<Contribution> {
        self.muscles()
            .iter()
            .find(|(m, _)| *m == muscle)
            .map(|(_, c)| *c)
    }
}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Lift {
    type Err = PlanError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "squat" => Ok(Lift::Squat),
            "bench" | "bench_press" => Ok(Lift::Bench),
            "deadlift" => Ok(Lift::Deadlift),
            other => Err(PlanError::UnknownLift(other.to_string())),
        }
    }
}

/// Intensity type of a session. `Deload` is only used in the final week.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntensityType {
    Heavy,
    Explosive,
    Rep,
    Deload,
}

impl IntensityType {
    pub fn name(&self) -> &'static str {
        match self {
            IntensityType::Heavy => "heavy",
            IntensityType::Explosive => "explosive",
            IntensityType::Rep => "rep",
            IntensityType::Deload => "deload",
        }
    }
}

impl fmt::Display for IntensityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntensityType {
    type Err = PlanError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heavy" => Ok(IntensityType::Heavy),
            "explosive" => Ok(IntensityType::Explosive),
            "rep" => Ok(IntensityType::Rep),
            "deload" => Ok(IntensityType::Deload),
            other => Err(PlanError::UnknownIntensityType(other.to_string())),
        }
    }
}

/// Three-week training block
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub enum Block {
    One,
    Two,
    Three,
}

impl Block {
    pub const ALL: [Block; 3] = [Block::One, Block::Two, Block::Three];

    pub fn number(&self) -> u8 {
        match self {
            Block::One => 1,
            Block::Two => 2,
            Block::Three => 3,
        }
    }
}

impl TryFrom<u8> for Block {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Block::One),
            2 => Ok(Block::Two),
            3 => Ok(Block::Three),
            _ => Err(format!("block {} out of range (expected 1..=3)", n)),
        }
    }
}

impl From<Block> for u8 {
    fn from(block: Block) -> u8 {
        block.number()
    }
}
