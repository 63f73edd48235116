//! Normalised cost views over a set of subscriptions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::cycle::CycleInterval;
use crate::calendar;
use crate::currency::CurrencyCode;
use crate::errors::BillingError;
use crate::subscription::{Subscription, SubscriptionStatus};

const DAYS_PER_YEAR: f64 = 365.0;

/// What one charge of `amount` per `interval` costs over a month.
pub fn monthly_equivalent(amount: f64, interval: CycleInterval) -> f64 {
    match interval {
        CycleInterval::Months(months) => amount / months as f64,
        CycleInterval::Days(days) => amount * DAYS_PER_YEAR / days as f64 / 12.0,
    }
}

pub fn yearly_equivalent(amount: f64, interval: CycleInterval) -> f64 {
    monthly_equivalent(amount, interval) * 12.0
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySpending {
    pub monthly: f64,
    pub yearly: f64,
    pub active: usize,
}

/// Spending of active subscriptions, per currency. Amounts in different
/// currencies are never added together.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpendingOverview {
    pub by_currency: BTreeMap<CurrencyCode, CurrencySpending>,
    pub paused: usize,
    pub cancelled: usize,
}

impl SpendingOverview {
    pub fn monthly_total(&self, currency: &CurrencyCode) -> f64 {
        self.by_currency
            .get(currency)
            .map(|entry| entry.monthly)
            .unwrap_or(0.0)
    }
}

pub fn spending_overview(subscriptions: &[Subscription]) -> Result<SpendingOverview, BillingError> {
    let mut overview = SpendingOverview::default();
    for subscription in subscriptions {
        match subscription.status {
            SubscriptionStatus::Paused => overview.paused += 1,
            SubscriptionStatus::Cancelled => overview.cancelled += 1,
            SubscriptionStatus::Active => {
                let interval = subscription
                    .billing_cycle
                    .interval(subscription.custom_interval_days)?;
                let entry = overview
                    .by_currency
                    .entry(subscription.currency.clone())
                    .or_default();
                entry.monthly += monthly_equivalent(subscription.amount, interval);
                entry.yearly += yearly_equivalent(subscription.amount, interval);
                entry.active += 1;
            }
        }
    }
    Ok(overview)
}

/// Active subscriptions whose free trial ends within `[now, now + days]`,
/// soonest first.
pub fn trials_ending<'a>(
    subscriptions: &'a [Subscription],
    now: NaiveDate,
    days: i64,
) -> Result<Vec<&'a Subscription>, BillingError> {
    let horizon = calendar::add_days(now, days)?;
    let mut ending: Vec<&Subscription> = subscriptions
        .iter()
        .filter(|sub| sub.is_active())
        .filter(|sub| matches!(sub.trial_end, Some(end) if end >= now && end <= horizon))
        .collect();
    ending.sort_by(|a, b| a.trial_end.cmp(&b.trial_end).then_with(|| a.name.cmp(&b.name)));
    Ok(ending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::BillingCycle;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn equivalents_per_cycle() {
        assert!(close(monthly_equivalent(120.0, CycleInterval::Months(12)), 10.0));
        assert!(close(monthly_equivalent(30.0, CycleInterval::Months(3)), 10.0));
        assert!(close(yearly_equivalent(10.0, CycleInterval::Months(1)), 120.0));
        assert!(close(yearly_equivalent(1.0, CycleInterval::Days(1)), 365.0));
        assert!(close(yearly_equivalent(7.0, CycleInterval::Days(7)), 365.0));
    }

    #[test]
    fn overview_groups_by_currency_and_skips_inactive() {
        let subs = vec![
            Subscription::new("Music", 10.0, BillingCycle::Monthly),
            Subscription::new("Storage", 120.0, BillingCycle::Annually),
            Subscription::new("Paper", 8.0, BillingCycle::Monthly)
                .with_currency(CurrencyCode::new("EUR")),
            Subscription::new("Old", 99.0, BillingCycle::Monthly)
                .with_status(SubscriptionStatus::Cancelled),
            Subscription::new("Break", 5.0, BillingCycle::Monthly)
                .with_status(SubscriptionStatus::Paused),
        ];
        let overview = spending_overview(&subs).unwrap();
        let usd = CurrencyCode::new("USD");
        assert!(close(overview.monthly_total(&usd), 20.0));
        assert!(close(overview.by_currency[&usd].yearly, 240.0));
        assert_eq!(overview.by_currency[&usd].active, 2);
        assert!(close(overview.monthly_total(&CurrencyCode::new("EUR")), 8.0));
        assert_eq!(overview.paused, 1);
        assert_eq!(overview.cancelled, 1);
        assert_eq!(overview.monthly_total(&CurrencyCode::new("GBP")), 0.0);
    }

    #[test]
    fn trials_ending_within_window() {
        let now = date(2024, 6, 1);
        let mut soon = Subscription::new("Soon", 1.0, BillingCycle::Monthly);
        soon.trial_end = Some(date(2024, 6, 5));
        let mut later = Subscription::new("Later", 1.0, BillingCycle::Monthly);
        later.trial_end = Some(date(2024, 7, 15));
        let mut expired = Subscription::new("Expired", 1.0, BillingCycle::Monthly);
        expired.trial_end = Some(date(2024, 5, 30));
        let mut today = Subscription::new("Today", 1.0, BillingCycle::Monthly);
        today.trial_end = Some(now);

        let subs = vec![soon, later, expired, today];
        let ending = trials_ending(&subs, now, 7).unwrap();
        let names: Vec<_> = ending.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Today", "Soon"]);
    }
}
