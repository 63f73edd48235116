//! Subscription and payment records as the mobile app stores them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::billing::{next_billing_date, BillingCycle, BillingSchedule};
use crate::currency::CurrencyCode;
use crate::errors::BillingError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Paused,
    Cancelled,
}

/// A tracked subscription. Read-only input to the billing calculations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub billing_cycle: BillingCycle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_interval_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_billing_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_billing_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_end: Option<NaiveDate>,
}

impl Subscription {
    pub fn new(name: impl Into<String>, amount: f64, billing_cycle: BillingCycle) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            currency: CurrencyCode::default(),
            billing_cycle,
            custom_interval_days: None,
            last_billing_date: None,
            next_billing_date: None,
            status: SubscriptionStatus::Active,
            category: None,
            trial_end: None,
        }
    }

    pub fn with_last_billed(mut self, date: NaiveDate) -> Self {
        self.last_billing_date = Some(date);
        self
    }

    pub fn with_next_billing(mut self, date: NaiveDate) -> Self {
        self.next_billing_date = Some(date);
        self
    }

    pub fn with_custom_days(mut self, days: u32) -> Self {
        self.custom_interval_days = Some(days);
        self
    }

    pub fn with_status(mut self, status: SubscriptionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_trial_end(mut self, date: NaiveDate) -> Self {
        self.trial_end = Some(date);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// The date the subscription charges next: the stored date when the
    /// record carries one, otherwise one cycle after the last charge.
    pub fn resolve_next_billing_date(&self) -> Result<NaiveDate, BillingError> {
        if let Some(next) = self.next_billing_date {
            return Ok(next);
        }
        let last = self.last_billing_date.ok_or_else(|| {
            BillingError::invalid_date(format!("subscription `{}` has no billing date", self.name))
        })?;
        next_billing_date(last, self.billing_cycle, self.custom_interval_days)
    }

    /// Recurrence anchored on the last known charge, or on the stored next
    /// charge when nothing has been billed yet.
    pub fn schedule(&self) -> Result<BillingSchedule, BillingError> {
        let anchor = self
            .last_billing_date
            .or(self.next_billing_date)
            .ok_or_else(|| {
                BillingError::invalid_date(format!(
                    "subscription `{}` has no billing date",
                    self.name
                ))
            })?;
        BillingSchedule::new(anchor, self.billing_cycle, self.custom_interval_days)
    }
}

/// A charge that has been made (or recorded) for a subscription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub subscription_id: Uuid,
    pub subscription_name: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl Payment {
    pub fn new(subscription: &Subscription, amount: f64, date: NaiveDate) -> Self {
        Self {
            subscription_id: subscription.id,
            subscription_name: subscription.name.clone(),
            amount,
            date,
        }
    }
}
