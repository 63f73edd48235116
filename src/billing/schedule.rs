//! Bounded forward projection of billing dates.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::cycle::{BillingCycle, CycleInterval};
use super::next_date::step;
use crate::calendar;
use crate::errors::BillingError;

/// Default number of dates a single expansion may yield.
pub const DEFAULT_EXPANSION_CAP: usize = 12;

/// Recurrence of a subscription, anchored on a known billing date.
///
/// Every occurrence is computed from the anchor rather than from the previous
/// occurrence, so month-end anchors never drift: a schedule anchored on
/// `2024-01-31` yields `02-29`, `03-31`, `04-30` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingSchedule {
    anchor: NaiveDate,
    interval: CycleInterval,
    cap: usize,
}

impl BillingSchedule {
    pub fn new(
        anchor: NaiveDate,
        cycle: BillingCycle,
        custom_days: Option<u32>,
    ) -> Result<Self, BillingError> {
        Ok(Self {
            anchor,
            interval: cycle.interval(custom_days)?,
            cap: DEFAULT_EXPANSION_CAP,
        })
    }

    /// Overrides the expansion cap. A cap of zero yields nothing.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn interval(&self) -> CycleInterval {
        self.interval
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Billing dates strictly after the anchor, at most `cap` of them.
    pub fn occurrences(&self) -> Occurrences {
        Occurrences::new(*self, 1, None)
    }

    /// Billing dates in `[start, end)`, at most `cap` of them. The anchor
    /// itself counts when it falls inside the range.
    pub fn occurrences_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Occurrences, BillingError> {
        let first = self.first_step_on_or_after(start)?;
        Ok(Occurrences::new(*self, first, Some(end)))
    }

    /// Billing dates falling inside the given calendar month.
    pub fn occurrences_in_month(&self, year: i32, month: u32) -> Result<Occurrences, BillingError> {
        let (start, end) = calendar::month_bounds(year, month)?;
        self.occurrences_between(start, end)
    }

    /// First billing date on or after `date`, the anchor included.
    ///
    /// Computed arithmetically, so it is not limited by the expansion cap.
    pub fn next_on_or_after(&self, date: NaiveDate) -> Result<NaiveDate, BillingError> {
        let index = self.first_step_on_or_after(date)?;
        self.nth(index)
    }

    fn nth(&self, index: u32) -> Result<NaiveDate, BillingError> {
        step(self.anchor, self.anchor.day(), self.interval, index)
    }

    fn first_step_on_or_after(&self, date: NaiveDate) -> Result<u32, BillingError> {
        if date <= self.anchor {
            return Ok(0);
        }
        let steps = match self.interval {
            CycleInterval::Days(days) => {
                let diff = calendar::days_between(self.anchor, date);
                let days = days as i64;
                (diff + days - 1) / days
            }
            CycleInterval::Months(months) => {
                let diff = calendar::months_between(self.anchor, date);
                let floor = diff.div_euclid(months as i64);
                let candidate = self.nth(to_step(floor, date)?)?;
                if candidate < date {
                    floor + 1
                } else {
                    floor
                }
            }
        };
        to_step(steps, date)
    }
}

fn to_step(steps: i64, date: NaiveDate) -> Result<u32, BillingError> {
    u32::try_from(steps)
        .map_err(|_| BillingError::invalid_date(format!("{date} is out of schedule range")))
}

/// Iterator over billing dates produced by a [`BillingSchedule`].
///
/// A clone continues from the same position; ask the schedule again for a
/// fresh sequence.
#[derive(Debug, Clone)]
pub struct Occurrences {
    schedule: BillingSchedule,
    next_step: u32,
    remaining: usize,
    until: Option<NaiveDate>,
    done: bool,
    capped: bool,
}

impl Occurrences {
    fn new(schedule: BillingSchedule, first_step: u32, until: Option<NaiveDate>) -> Self {
        Self {
            schedule,
            next_step: first_step,
            remaining: schedule.cap,
            until,
            done: false,
            capped: false,
        }
    }

    /// Whether the sequence stopped because the cap ran out while more
    /// dates were still due. A range holding exactly `cap` dates is not capped.
    pub fn hit_cap(&self) -> bool {
        self.capped
    }

    fn has_pending(&self) -> bool {
        match self.schedule.nth(self.next_step) {
            Ok(date) => self.until.map_or(true, |until| date < until),
            Err(_) => false,
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }
        if self.remaining == 0 {
            self.done = true;
            self.capped = self.has_pending();
            if self.capped {
                debug!(
                    anchor = %self.schedule.anchor,
                    cap = self.schedule.cap,
                    "billing schedule expansion reached its cap"
                );
            }
            return None;
        }
        let date = match self.schedule.nth(self.next_step) {
            Ok(date) => date,
            Err(err) => {
                debug!(error = %err, "billing schedule left the calendar range");
                self.done = true;
                return None;
            }
        };
        if self.until.is_some_and(|until| date >= until) {
            self.done = true;
            return None;
        }
        self.next_step = self.next_step.saturating_add(1);
        self.remaining -= 1;
        Some(date)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

impl std::iter::FusedIterator for Occurrences {}
