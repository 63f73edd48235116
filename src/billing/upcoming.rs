use std::cmp::Ordering;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::classify::{classify, Classification, DueStatus, DEFAULT_DUE_SOON_DAYS};
use crate::calendar;
use crate::currency::{AmountFormatter, CurrencyCode, LocaleFormatter};
use crate::errors::BillingError;
use crate::subscription::Subscription;

/// Default look-ahead window for upcoming payments.
pub const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 30;

/// A subscription's next charge as seen from a given "now". Built fresh on
/// every evaluation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputedBillingEvent {
    pub subscription_id: Uuid,
    pub name: String,
    pub next_date: NaiveDate,
    pub days_until: i64,
    pub status: DueStatus,
    pub amount: f64,
    pub currency: CurrencyCode,
    pub display_amount: String,
}

impl ComputedBillingEvent {
    pub fn from_subscription(
        subscription: &Subscription,
        next_date: NaiveDate,
        classification: Classification,
        formatter: &dyn AmountFormatter,
    ) -> Self {
        Self {
            subscription_id: subscription.id,
            name: subscription.name.clone(),
            next_date,
            days_until: classification.days_until,
            status: classification.status(),
            amount: subscription.amount,
            currency: subscription.currency.clone(),
            display_amount: formatter.format_amount(subscription.amount, &subscription.currency),
        }
    }
}

pub struct UpcomingOptions<'a> {
    pub window_days: i64,
    pub due_soon_days: i64,
    pub formatter: &'a dyn AmountFormatter,
}

static DEFAULT_FORMATTER: Lazy<LocaleFormatter> = Lazy::new(LocaleFormatter::default);

impl Default for UpcomingOptions<'static> {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
            formatter: &*DEFAULT_FORMATTER,
        }
    }
}

impl UpcomingOptions<'_> {
    pub fn with_window(mut self, window_days: i64) -> Self {
        self.window_days = window_days;
        self
    }
}

/// Active subscriptions charging on or before `now + window_days`, overdue
/// ones included, most urgent first. Ties are ordered by name, then id.
pub fn upcoming_payments(
    subscriptions: &[Subscription],
    window_days: i64,
    now: NaiveDate,
) -> Result<Vec<ComputedBillingEvent>, BillingError> {
    upcoming_payments_with(
        subscriptions,
        now,
        &UpcomingOptions::default().with_window(window_days),
    )
}

pub fn upcoming_payments_with(
    subscriptions: &[Subscription],
    now: NaiveDate,
    options: &UpcomingOptions<'_>,
) -> Result<Vec<ComputedBillingEvent>, BillingError> {
    let horizon = calendar::add_days(now, options.window_days)?;
    let mut events = Vec::new();

    for subscription in subscriptions.iter().filter(|sub| sub.is_active()) {
        let next_date = subscription.resolve_next_billing_date()?;
        if next_date > horizon {
            continue;
        }
        let classification = classify(next_date, now, options.due_soon_days);
        events.push(ComputedBillingEvent::from_subscription(
            subscription,
            next_date,
            classification,
            options.formatter,
        ));
    }

    events.sort_by(compare_events);
    debug!(
        considered = subscriptions.len(),
        kept = events.len(),
        %horizon,
        "computed upcoming payments"
    );
    Ok(events)
}

fn compare_events(a: &ComputedBillingEvent, b: &ComputedBillingEvent) -> Ordering {
    a.days_until
        .cmp(&b.days_until)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.subscription_id.cmp(&b.subscription_id))
}
