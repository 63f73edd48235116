//! Calendar arithmetic shared by the billing calculations.
//!
//! Month and year offsets follow a single end-of-month rule: when the target
//! month is shorter than the source day, the result clamps to the last valid
//! day of the target month (`2024-01-31 + 1 month = 2024-02-29`).

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::BillingError;

/// Accepted textual date layouts, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a calendar date, rejecting anything that is not a valid day.
///
/// Full RFC 3339 timestamps are accepted and truncated to their UTC date.
pub fn parse_date(input: &str) -> Result<NaiveDate, BillingError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(BillingError::invalid_date("empty date"));
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .map(|stamp| stamp.naive_utc().date())
        .map_err(|_| BillingError::invalid_date(format!("`{trimmed}` is not a calendar date")))
}

/// Offsets `date` by a signed day count. Counts beyond chrono's range are
/// reported as `InvalidDate`.
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, BillingError> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| out_of_range(date))
}

/// Shifts `date` by a signed number of months, clamping the day of month.
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, BillingError> {
    shift_month_clamped(date, date.day(), months)
}

pub fn add_years(date: NaiveDate, years: i32) -> Result<NaiveDate, BillingError> {
    let months = years.checked_mul(12).ok_or_else(|| out_of_range(date))?;
    add_months(date, months)
}

/// Shifts the month of `date` and places the result on `preferred_day`, or on
/// the month's last day when `preferred_day` does not exist there.
///
/// Schedules use this with the anchor's day so a 31st keeps returning to the
/// 31st whenever the month allows it.
pub fn shift_month_clamped(
    date: NaiveDate,
    preferred_day: u32,
    months: i32,
) -> Result<NaiveDate, BillingError> {
    let index = date.year() as i64 * 12 + date.month0() as i64 + months as i64;
    let year = i32::try_from(index.div_euclid(12)).map_err(|_| out_of_range(date))?;
    let month = index.rem_euclid(12) as u32 + 1;
    let last = days_in_month(year, month).ok_or_else(|| out_of_range(date))?;
    NaiveDate::from_ymd_opt(year, month, preferred_day.min(last))
        .ok_or_else(|| out_of_range(date))
}

/// Number of days in the given month, `None` when the month is out of range.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next_first - first).num_days() as u32)
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Number of whole months between two month starts.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let from_idx = from.year() as i64 * 12 + from.month0() as i64;
    let to_idx = to.year() as i64 * 12 + to.month0() as i64;
    to_idx - from_idx
}

/// ISO-8601 week key such as `2024-W01`, using the ISO week-numbering year.
pub fn iso_week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Calendar quarter (1-4) of `date`, i.e. `ceil(month / 3)`.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() + 2) / 3
}

/// First and one-past-last day of the month, as a half-open range.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), BillingError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| BillingError::invalid_date(format!("{year:04}-{month:02} is not a month")))?;
    let end = add_months(start, 1)?;
    Ok((start, end))
}

fn out_of_range(date: NaiveDate) -> BillingError {
    BillingError::invalid_date(format!("offset from {date} leaves the supported calendar range"))
}
