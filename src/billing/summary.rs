use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::subscription::Payment;

/// Calendar granularity used to bucket payments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl SummaryPeriod {
    /// Bucket key for `date`: `2024-01-05`, `2024-W01`, `2024-01`, `2024-Q1` or `2024`.
    pub fn key_for(self, date: NaiveDate) -> String {
        match self {
            SummaryPeriod::Daily => date.format("%Y-%m-%d").to_string(),
            SummaryPeriod::Weekly => calendar::iso_week_key(date),
            SummaryPeriod::Monthly => date.format("%Y-%m").to_string(),
            SummaryPeriod::Quarterly => format!("{}-Q{}", date.year(), calendar::quarter_of(date)),
            SummaryPeriod::Yearly => date.year().to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SummaryPeriod::Daily => "daily",
            SummaryPeriod::Weekly => "weekly",
            SummaryPeriod::Monthly => "monthly",
            SummaryPeriod::Quarterly => "quarterly",
            SummaryPeriod::Yearly => "yearly",
        }
    }
}

impl fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(SummaryPeriod::Daily),
            "weekly" | "week" => Ok(SummaryPeriod::Weekly),
            "monthly" | "month" => Ok(SummaryPeriod::Monthly),
            "quarterly" | "quarter" => Ok(SummaryPeriod::Quarterly),
            "yearly" | "year" | "annually" => Ok(SummaryPeriod::Yearly),
            other => Err(format!(
                "unknown period `{other}` (expected daily, weekly, monthly, quarterly or yearly)"
            )),
        }
    }
}

/// Aggregate of the payments that fall in one period bucket.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub period_key: String,
    pub total: f64,
    pub count: usize,
    pub subscriptions: BTreeSet<String>,
    pub average: f64,
}

impl PaymentSummary {
    fn empty(period_key: String) -> Self {
        Self {
            period_key,
            total: 0.0,
            count: 0,
            subscriptions: BTreeSet::new(),
            average: 0.0,
        }
    }

    fn add(&mut self, payment: &Payment) {
        self.total += payment.amount;
        self.count += 1;
        self.subscriptions
            .insert(payment.subscription_name.clone());
    }

    fn finish(mut self) -> Self {
        self.average = if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        };
        self
    }
}

/// Groups payments into period buckets. Buckets come back ordered by key,
/// which for every period is also chronological order.
pub fn summarize_by_period(payments: &[Payment], period: SummaryPeriod) -> Vec<PaymentSummary> {
    let mut buckets: BTreeMap<String, PaymentSummary> = BTreeMap::new();
    for payment in payments {
        let key = period.key_for(payment.date);
        buckets
            .entry(key.clone())
            .or_insert_with(|| PaymentSummary::empty(key))
            .add(payment);
    }
    buckets.into_values().map(PaymentSummary::finish).collect()
}
