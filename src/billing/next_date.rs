use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::cycle::{BillingCycle, CycleInterval};
use crate::calendar;
use crate::errors::BillingError;

/// Computes the charge that follows `last` for the given cycle.
///
/// Month based cycles clamp to the last day of shorter months, so
/// `2024-01-31` billed monthly is next due on `2024-02-29`.
pub fn next_billing_date(
    last: NaiveDate,
    cycle: BillingCycle,
    custom_days: Option<u32>,
) -> Result<NaiveDate, BillingError> {
    let interval = cycle.interval(custom_days)?;
    let next = step(last, last.day(), interval, 1)?;
    debug!(%last, %cycle, %next, "computed next billing date");
    Ok(next)
}

/// String front door for records that carry raw dates and cycle names.
pub fn parse_next_billing_date(
    last: &str,
    cycle: &str,
    custom_days: Option<u32>,
) -> Result<NaiveDate, BillingError> {
    let last = calendar::parse_date(last)?;
    let cycle: BillingCycle = cycle.parse()?;
    next_billing_date(last, cycle, custom_days)
}

/// Offsets `from` by `steps` whole intervals. Month offsets land on
/// `preferred_day` when the target month has it, otherwise on its last day.
pub(crate) fn step(
    from: NaiveDate,
    preferred_day: u32,
    interval: CycleInterval,
    steps: u32,
) -> Result<NaiveDate, BillingError> {
    match interval {
        CycleInterval::Days(days) => calendar::add_days(from, days as i64 * steps as i64),
        CycleInterval::Months(months) => {
            let offset = i32::try_from(months as u64 * steps as u64).map_err(|_| {
                BillingError::invalid_date(format!("{steps} cycles from {from} overflow"))
            })?;
            calendar::shift_month_clamped(from, preferred_day, offset)
        }
    }
}
