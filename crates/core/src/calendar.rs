//! Calendar view-model helpers
//!
//! Pure date arithmetic backing the month grid and the week-at-a-glance
//! strip. Weeks run Sunday through Saturday. All helpers saturate at the
//! calendar's bounds instead of failing.

use calpilot_domain::constants::{GLANCE_DAYS_AHEAD, GLANCE_DAYS_BACK};
use calpilot_domain::{DateRange, PersistedEvent};
use chrono::{Datelike, Days, Months, NaiveDate};

/// Inclusive first..last day of the month containing `month`.
pub fn month_range(month: NaiveDate) -> DateRange {
    let first = month.checked_sub_days(Days::new(u64::from(month.day0()))).unwrap_or(month);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(first);
    DateRange::new(first, last)
}

/// The days of the rendered month grid: the Sunday on or before the 1st
/// through the Saturday on or after the last day, always whole weeks.
pub fn month_grid(month: NaiveDate) -> Vec<NaiveDate> {
    let range = month_range(month);

    let lead = u64::from(range.start.weekday().num_days_from_sunday());
    let trail = u64::from(6 - range.end.weekday().num_days_from_sunday());

    let grid_start = range.start.checked_sub_days(Days::new(lead)).unwrap_or(range.start);
    let grid_end = range.end.checked_add_days(Days::new(trail)).unwrap_or(range.end);

    grid_start.iter_days().take_while(|day| *day <= grid_end).collect()
}

/// Inclusive range of the glance strip around `today`.
pub fn glance_range(today: NaiveDate) -> DateRange {
    let start = today
        .checked_sub_days(Days::new(GLANCE_DAYS_BACK.unsigned_abs()))
        .unwrap_or(today);
    let end = today
        .checked_add_days(Days::new(GLANCE_DAYS_AHEAD.unsigned_abs()))
        .unwrap_or(today);
    DateRange::new(start, end)
}

/// The days of the glance strip, in order.
pub fn glance_days(today: NaiveDate) -> Vec<NaiveDate> {
    let range = glance_range(today);
    range.start.iter_days().take_while(|day| *day <= range.end).collect()
}

/// The events falling on one grid day.
pub fn events_by_day(events: &[PersistedEvent], day: NaiveDate) -> Vec<&PersistedEvent> {
    events.iter().filter(|event| event.event.date() == day).collect()
}
