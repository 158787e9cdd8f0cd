//! Block scheduler - program skeleton with dates and intensity rotation
//!
//! The scaffold never carries loads; prescriptions are computed when the
//! session starts.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::formula::PlannedSet;
use crate::lifts::{Block, IntensityType, Lift};

pub const WEEKS_PER_BLOCK: u32 = 3;
pub const MAX_PROGRAM_WEEKS: u32 = WEEKS_PER_BLOCK * 3 + 1;

/// One scheduled session, created at program start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScaffold {
    pub week: u32,
    /// 1-based day within the week
    pub day: u32,
    pub lift: Lift,
    pub intensity_type: IntensityType,
    pub block: Option<Block>,
    pub is_deload: bool,
    pub date: NaiveDate,
    /// Always `None` here
    pub planned_sets: Option<Vec<PlannedSet>>,
    /// Always `None` here
    pub jit_generated_at: Option<DateTime<Utc>>,
}

/// Day offsets from the start of the week
fn day_offsets(days_per_week: u8) -> PlanResult<&'static [i64]> {
    match days_per_week {
        3 => Ok(&[0, 2, 4]),
        4 => Ok(&[0, 1, 3, 4]),
        5 => Ok(&[0, 1, 2, 3, 4]),
        other => Err(PlanError::UnsupportedDaysPerWeek(other)),
    }
}

/// Block for a (non-deload) week: weeks 1-3 -> 1, 4-6 -> 2, 7-9 -> 3
pub fn block_for_week(week: u32) -> PlanResult<Block> {
    if week == 0 {
        return Err(PlanError::WeekOutOfRange(week));
    }
    let n = (week - 1) / WEEKS_PER_BLOCK + 1;
    u8::try_from(n)
        .ok()
        .and_then(|n| Block::try_from(n).ok())
        .ok_or(PlanError::WeekOutOfRange(week))
}

/// 1-based position of `week` inside its block
pub fn week_in_block(week: u32) -> u32 {
    (week.saturating_sub(1)) % WEEKS_PER_BLOCK + 1
}

/// Cube rotation: each lift visits every intensity once per block
pub fn intensity_for(lift: Lift, week_in_block: u32) -> IntensityType {
    use IntensityType::*;
    match (week_in_block, lift) {
        (1, Lift::Squat) => Heavy,
        (1, Lift::Bench) => Explosive,
        (1, Lift::Deadlift) => Rep,
        (2, Lift::Squat) => Explosive,
        (2, Lift::Bench) => Rep,
        (2, Lift::Deadlift) => Heavy,
        (_, Lift::Squat) => Rep,
        (_, Lift::Bench) => Heavy,
        (_, Lift::Deadlift) => Explosive,
    }
}

/// Calendar date of a training day (`day_index` is 0-based)
pub fn session_date(
    start: NaiveDate,
    week: u32,
    day_index: usize,
    days_per_week: u8,
) -> PlanResult<NaiveDate> {
    if week == 0 {
        return Err(PlanError::WeekOutOfRange(week));
    }
    let offsets = day_offsets(days_per_week)?;
    let offset = offsets.get(day_index).ok_or(PlanError::DayIndexOutOfRange {
        index: day_index,
        days_per_week,
    })?;
    Ok(start + Duration::days((week as i64 - 1) * 7 + offset))
}

/// Generate the full program skeleton. The last week is always a deload.
pub fn generate_schedule(
    total_weeks: u32,
    days_per_week: u8,
    start: NaiveDate,
) -> PlanResult<Vec<SessionScaffold>> {
    if !(2..=MAX_PROGRAM_WEEKS).contains(&total_weeks) {
        return Err(PlanError::ProgramLength(total_weeks));
    }
    let offsets = day_offsets(days_per_week)?;

    let mut sessions = Vec::with_capacity(total_weeks as usize * offsets.len());
    for week in 1..=total_weeks {
        let is_deload = week == total_weeks;
        let block = if is_deload { None } else { Some(block_for_week(week)?) };

        for day_index in 0..offsets.len() {
            let lift = Lift::ALL[day_index % Lift::ALL.len()];
            let intensity_type = if is_deload {
                IntensityType::Deload
            } else {
                intensity_for(lift, week_in_block(week))
            };
            sessions.push(SessionScaffold {
                week,
                day: day_index as u32 + 1,
                lift,
                intensity_type,
                block,
                is_deload,
                date: session_date(start, week, day_index, days_per_week)?,
                planned_sets: None,
                jit_generated_at: None,
            });
        }
    }

    tracing::info!(
        "Generated {} sessions over {} weeks ({} days/week)",
        sessions.len(),
        total_weeks,
        days_per_week
    );
    Ok(sessions)
}
