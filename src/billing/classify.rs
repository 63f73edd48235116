use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar;

/// Default look-ahead, in days, for the due-soon classification.
pub const DEFAULT_DUE_SOON_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Upcoming,
}

impl DueStatus {
    pub fn label(self) -> &'static str {
        match self {
            DueStatus::Overdue => "Overdue",
            DueStatus::DueSoon => "Due soon",
            DueStatus::Upcoming => "Upcoming",
        }
    }
}

/// Where a billing date sits relative to "now".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Signed whole days until the charge; negative once it has passed.
    pub days_until: i64,
    pub is_due_soon: bool,
    pub is_overdue: bool,
}

impl Classification {
    pub fn status(&self) -> DueStatus {
        if self.is_overdue {
            DueStatus::Overdue
        } else if self.is_due_soon {
            DueStatus::DueSoon
        } else {
            DueStatus::Upcoming
        }
    }
}

/// Classifies `next` against `now`. A charge due today is due soon, never overdue.
pub fn classify(next: NaiveDate, now: NaiveDate, threshold_days: i64) -> Classification {
    let days_until = calendar::days_between(now, next);
    let is_overdue = days_until < 0;
    Classification {
        days_until,
        is_overdue,
        is_due_soon: !is_overdue && days_until <= threshold_days,
    }
}

/// Same as [`classify`] for a timestamp "now"; the time of day is ignored.
pub fn classify_at(next: NaiveDate, now: DateTime<Utc>, threshold_days: i64) -> Classification {
    classify(next, now.date_naive(), threshold_days)
}
