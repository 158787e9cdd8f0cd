//! Performance trend from logged RPE

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifts::{IntensityType, Lift};

/// Logged effort for one past session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpeLog {
    pub lift: Lift,
    pub intensity_type: IntensityType,
    pub logged_at: DateTime<Utc>,
    pub target_rpe: f64,
    /// `None` when the athlete skipped the RPE prompt
    #[serde(default)]
    pub actual_rpe: Option<f64>,
}

impl RpeLog {
    pub fn deviation(&self) -> Option<f64> {
        self.actual_rpe.map(|actual| actual - self.target_rpe)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Reduce,
    Increase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSuggestion {
    pub direction: TrendDirection,
    pub multiplier: f64,
    /// Mean deviation of the two sessions considered
    pub mean_deviation: f64,
    pub rationale: String,
}

/// Suggestion from the two most recent qualifying logs, if both deviate the
/// same way by more than `threshold`
pub fn analyze_trend(
    history: &[RpeLog],
    lift: Lift,
    intensity: IntensityType,
    threshold: f64,
    step: f64,
) -> Option<PerformanceSuggestion> {
    let mut qualifying: Vec<(&RpeLog, f64)> = history
        .iter()
        .filter(|log| log.lift == lift && log.intensity_type == intensity)
        .filter_map(|log| log.deviation().map(|d| (log, d)))
        .collect();
    qualifying.sort_by(|a, b| b.0.logged_at.cmp(&a.0.logged_at));

    let [(_, latest), (_, previous)] = qualifying.get(..2)? else {
        return None;
    };
    let (latest, previous) = (*latest, *previous);
    let mean_deviation = (latest + previous) / 2.0;

    let direction = if latest > threshold && previous > threshold {
        TrendDirection::Reduce
    } else if latest < -threshold && previous < -threshold {
        TrendDirection::Increase
    } else {
        return None;
    };

    let (multiplier, rationale) = match direction {
        TrendDirection::Reduce => (
            1.0 - step,
            format!(
                "Last two {} {} sessions ran {:.1} RPE above target: load reduced {:.1}%",
                intensity,
                lift,
                mean_deviation,
                step * 100.0
            ),
        ),
        TrendDirection::Increase => (
            1.0 + step,
            format!(
                "Last two {} {} sessions ran {:.1} RPE below target: load increased {:.1}%",
                intensity,
                lift,
                -mean_deviation,
                step * 100.0
            ),
        ),
    };

    tracing::debug!("Trend for {} {}: {:?} ({:+.2})", lift, intensity, direction, mean_deviation);

    Some(PerformanceSuggestion {
        direction,
        multiplier,
        mean_deviation,
        rationale,
    })
}
