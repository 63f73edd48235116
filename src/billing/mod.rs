//! Billing recurrence calculations: next charge dates, schedules, due-state
//! classification, upcoming payment lists and period summaries.

pub mod classify;
pub mod cycle;
pub mod next_date;
pub mod schedule;
pub mod spending;
pub mod summary;
pub mod upcoming;

pub use classify::{classify, classify_at, Classification, DueStatus, DEFAULT_DUE_SOON_DAYS};
pub use cycle::{BillingCycle, CycleInterval};
pub use next_date::{next_billing_date, parse_next_billing_date};
pub use schedule::{BillingSchedule, Occurrences, DEFAULT_EXPANSION_CAP};
pub use spending::{
    monthly_equivalent, spending_overview, trials_ending, yearly_equivalent, CurrencySpending,
    SpendingOverview,
};
pub use summary::{summarize_by_period, PaymentSummary, SummaryPeriod};
pub use upcoming::{
    upcoming_payments, upcoming_payments_with, ComputedBillingEvent, UpcomingOptions,
    DEFAULT_UPCOMING_WINDOW_DAYS,
};
