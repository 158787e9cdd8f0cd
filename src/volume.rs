//! Weekly volume tracking against MEV / MRV per muscle group

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::lifts::{Lift, MuscleGroup};

/// Within this many set-equivalents of MRV a muscle counts as "approaching"
const APPROACHING_MARGIN: f64 = 2.0;

/// Minimum effective / maximum recoverable volume in set-equivalents per week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeLandmarks {
    pub mev: f64,
    pub mrv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrvMevConfig {
    pub muscles: HashMap<MuscleGroup, VolumeLandmarks>,
}

impl Default for MrvMevConfig {
    fn default() -> Self {
        let table = [
            (MuscleGroup::Quads, 8.0, 20.0),
            (MuscleGroup::Glutes, 4.0, 16.0),
            (MuscleGroup::Hamstrings, 6.0, 20.0),
            (MuscleGroup::LowerBack, 4.0, 12.0),
            (MuscleGroup::UpperBack, 10.0, 25.0),
            (MuscleGroup::Chest, 8.0, 22.0),
            (MuscleGroup::Triceps, 6.0, 18.0),
            (MuscleGroup::Shoulders, 6.0, 20.0),
            (MuscleGroup::Biceps, 8.0, 20.0),
        ];
        Self {
            muscles: table
                .into_iter()
                .map(|(m, mev, mrv)| (m, VolumeLandmarks { mev, mrv }))
                .collect(),
        }
    }
}

impl MrvMevConfig {
    /// Landmarks for a muscle; unconfigured muscles get zero MEV and no MRV cap
    pub fn landmarks(&self, muscle: MuscleGroup) -> VolumeLandmarks {
        self.muscles.get(&muscle).copied().unwrap_or(VolumeLandmarks {
            mev: 0.0,
            mrv: f64::INFINITY,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeStatus {
    BelowMev,
    Productive,
    ApproachingMrv,
    AtMrv,
}

/// Completed working sets of one lift
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletedLift {
    pub lift: Lift,
    pub sets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MuscleVolume {
    pub muscle: MuscleGroup,
    pub volume: f64,
    pub remaining: f64,
    pub status: VolumeStatus,
}

/// Per-muscle weekly volume accumulated from completed sets
#[derive(Debug, Clone, Default)]
pub struct VolumeTracker {
    volumes: HashMap<MuscleGroup, f64>,
}

impl VolumeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build tracker from this week's completed lifts
    pub fn from_sessions(sessions: &[CompletedLift]) -> Self {
        let mut tracker = Self::new();
        for s in sessions {
            tracker.record(s.lift, s.sets);
        }
        tracker
    }

    /// Distribute sets to each muscle the lift trains
    pub fn record(&mut self, lift: Lift, sets: u32) {
        for (muscle, contribution) in lift.muscles() {
            *self.volumes.entry(*muscle).or_insert(0.0) += sets as f64 * contribution.weight();
        }
    }

    pub fn volume(&self, muscle: MuscleGroup) -> f64 {
        self.volumes.get(&muscle).copied().unwrap_or(0.0)
    }

    pub fn remaining_capacity(&self, muscle: MuscleGroup, config: &MrvMevConfig) -> f64 {
        remaining_capacity(&self.volumes, muscle, config)
    }

    pub fn classify(&self, muscle: MuscleGroup, config: &MrvMevConfig) -> VolumeStatus {
        let landmarks = config.landmarks(muscle);
        let volume = self.volume(muscle);
        match volume {
            v if v >= landmarks.mrv => VolumeStatus::AtMrv,
            v if v >= landmarks.mrv - APPROACHING_MARGIN => VolumeStatus::ApproachingMrv,
            v if v >= landmarks.mev => VolumeStatus::Productive,
            _ => VolumeStatus::BelowMev,
        }
    }

    /// Every muscle, most-loaded first
    pub fn weekly_report(&self, config: &MrvMevConfig) -> Vec<MuscleVolume> {
        let mut report: Vec<_> = MuscleGroup::all()
            .iter()
            .map(|m| MuscleVolume {
                muscle: *m,
                volume: self.volume(*m),
                remaining: self.remaining_capacity(*m, config),
                status: self.classify(*m, config),
            })
            .collect();
        report.sort_by(|a, b| b.volume.total_cmp(&a.volume));
        report
    }

    pub fn into_volumes(self) -> HashMap<MuscleGroup, f64> {
        self.volumes
    }
}

/// MRV minus volume already done this week
pub fn remaining_capacity(
    volumes: &HashMap<MuscleGroup, f64>,
    muscle: MuscleGroup,
    config: &MrvMevConfig,
) -> f64 {
    config.landmarks(muscle).mrv - volumes.get(&muscle).copied().unwrap_or(0.0)
}

/// Outcome of checking a lift's primary muscles against their MRV
#[derive(Debug, Clone, PartialEq)]
pub enum Capacity {
    /// At least one primary muscle has no remaining sets
    Exhausted { muscle: MuscleGroup },
    /// Largest set count every primary muscle can still absorb
    Limited { max_sets: u32, muscle: MuscleGroup },
    Unlimited,
}

/// Capacity of the lift's primary muscles. A cap of zero sets is exhausted.
pub fn capacity_check(
    lift: Lift,
    volumes: &HashMap<MuscleGroup, f64>,
    config: &MrvMevConfig,
) -> Capacity {
    let mut tightest: Option<(u32, MuscleGroup)> = None;

    for (muscle, contribution) in lift.muscles() {
        if contribution.weight() < 1.0 {
            continue;
        }
        let remaining = remaining_capacity(volumes, *muscle, config);
        if remaining <= 0.0 {
            return Capacity::Exhausted { muscle: *muscle };
        }
        if remaining.is_infinite() {
            continue;
        }
        let cap = (remaining / contribution.weight()).floor() as u32;
        if cap == 0 {
            return Capacity::Exhausted { muscle: *muscle };
        }
        if tightest.is_none_or(|(best, _)| cap < best) {
            tightest = Some((cap, *muscle));
        }
    }

    match tightest {
        Some((max_sets, muscle)) => Capacity::Limited { max_sets, muscle },
        None => Capacity::Unlimited,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker() {
        let tracker = VolumeTracker::new();
        let cfg = MrvMevConfig::default();
        assert_eq!(tracker.volume(MuscleGroup::Quads), 0.0);
        assert_eq!(tracker.classify(MuscleGroup::Quads, &cfg), VolumeStatus::BelowMev);
        assert_eq!(tracker.remaining_capacity(MuscleGroup::Quads, &cfg), 20.0);
    }

    #[test]
    fn test_secondary_counts_half() {
        let tracker = VolumeTracker::from_sessions(&[CompletedLift { lift: Lift::Squat, sets: 4 }]);
        assert_eq!(tracker.volume(MuscleGroup::Quads), 4.0);
        assert_eq!(tracker.volume(MuscleGroup::Hamstrings), 2.0);
        assert_eq!(tracker.volume(MuscleGroup::Chest), 0.0);
    }

    #[test]
    fn test_classification_thresholds() {
        let cfg = MrvMevConfig::default();
        let mut tracker = VolumeTracker::new();
        tracker.record(Lift::Bench, 10); // chest 10: MEV 8, MRV 22
        assert_eq!(tracker.classify(MuscleGroup::Chest, &cfg), VolumeStatus::Productive);
        tracker.record(Lift::Bench, 10); // chest 20
        assert_eq!(tracker.classify(MuscleGroup::Chest, &cfg), VolumeStatus::ApproachingMrv);
        tracker.record(Lift::Bench, 2); // chest 22
        assert_eq!(tracker.classify(MuscleGroup::Chest, &cfg), VolumeStatus::AtMrv);
    }

    #[test]
    fn test_weekly_report_sorted() {
        let cfg = MrvMevConfig::default();
        let tracker = VolumeTracker::from_sessions(&[
            CompletedLift { lift: Lift::Deadlift, sets: 3 },
            CompletedLift { lift: Lift::Squat, sets: 3 },
        ]);
        let report = tracker.weekly_report(&cfg);
        assert_eq!(report.len(), MuscleGroup::all().len());
        assert_eq!(report[0].muscle, MuscleGroup::Glutes);
        assert_eq!(report[0].volume, 6.0);
    }

    #[test]
    fn test_capacity_exhausted() {
        let cfg = MrvMevConfig::default();
        let volumes = HashMap::from([(MuscleGroup::Glutes, 16.0)]);
        assert_eq!(
            capacity_check(Lift::Squat, &volumes, &cfg),
            Capacity::Exhausted { muscle: MuscleGroup::Glutes }
        );
    }

    #[test]
    fn test_capacity_limited_by_tightest_muscle() {
        let cfg = MrvMevConfig::default();
        let volumes = HashMap::from([(MuscleGroup::Quads, 18.5), (MuscleGroup::Glutes, 2.0)]);
        assert_eq!(
            capacity_check(Lift::Squat, &volumes, &cfg),
            Capacity::Limited { max_sets: 1, muscle: MuscleGroup::Quads }
        );
    }

    #[test]
    fn test_fractional_remaining_below_one_set_is_exhausted() {
        let cfg = MrvMevConfig::default();
        let volumes = HashMap::from([(MuscleGroup::Chest, 21.5)]);
        assert_eq!(
            capacity_check(Lift::Bench, &volumes, &cfg),
            Capacity::Exhausted { muscle: MuscleGroup::Chest }
        );
    }

    #[test]
    fn test_unconfigured_muscles_are_unlimited() {
        let cfg = MrvMevConfig { muscles: HashMap::new() };
        assert_eq!(capacity_check(Lift::Bench, &HashMap::new(), &cfg), Capacity::Unlimited);
    }
}
