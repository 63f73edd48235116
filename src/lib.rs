#![doc(test(attr(deny(warnings))))]

//! SubTrack Core computes subscription billing recurrences: the next charge
//! date for each billing cycle, bounded schedules, due-soon and overdue
//! classification, upcoming payment lists and payment summaries by period.

pub mod billing;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod subscription;
pub mod time;
pub mod utils;

pub use billing::{
    classify, next_billing_date, summarize_by_period, upcoming_payments, BillingCycle,
    BillingSchedule, ComputedBillingEvent, DueStatus, PaymentSummary, SummaryPeriod,
};
pub use errors::BillingError;
pub use subscription::{Payment, Subscription, SubscriptionStatus};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SubTrack Core tracing initialized.");
    });
}
