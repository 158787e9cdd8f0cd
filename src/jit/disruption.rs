//! Training disruptions (injury, illness, travel, ...)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lifts::Lift;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionType {
    Injury,
    Illness,
    Travel,
    Fatigue,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionStatus {
    #[default]
    Active,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDisruption {
    pub disruption_type: DisruptionType,
    pub severity: Severity,
    pub start_date: NaiveDate,
    /// Open-ended when `None`
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// `None` affects every lift
    #[serde(default)]
    pub affected_lifts: Option<Vec<Lift>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: DisruptionStatus,
}

impl TrainingDisruption {
    pub fn affects(&self, lift: Lift) -> bool {
        self.affected_lifts
            .as_ref()
            .is_none_or(|lifts| lifts.contains(&lift))
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.status == DisruptionStatus::Active
            && self.start_date <= date
            && self.end_date.is_none_or(|end| date <= end)
    }

    pub fn summary(&self) -> String {
        let kind = format!("{:?}", self.disruption_type).to_lowercase();
        if self.description.is_empty() {
            format!("{:?} {}", self.severity, kind)
        } else {
            format!("{:?} {} ({})", self.severity, kind, self.description)
        }
    }
}

/// Most severe unresolved disruption covering `lift` on `date`
pub fn most_severe_active(
    disruptions: &[TrainingDisruption],
    lift: Lift,
    date: NaiveDate,
) -> Option<&TrainingDisruption> {
    disruptions
        .iter()
        .filter(|d| d.affects(lift) && d.is_active_on(date))
        .max_by_key(|d| d.severity)
}
