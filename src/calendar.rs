//! Pure calendar helpers shared by the scheduler and the aggregation views.
//!
//! Every function takes an explicit date argument and never reads a clock,
//! so callers pass their own "now" and tests pass fixed dates.

use chrono::{Datelike, Duration, NaiveDate};

/// Monday-start week containing `now`, returned as `(monday, sunday)`.
///
/// Sunday counts as weekday 7, so it closes the week instead of opening one.
pub fn week_range(now: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = now.weekday().num_days_from_monday() as i64;
    let monday = now - Duration::days(offset);
    (monday, monday + Duration::days(6))
}

/// Index of `now` within its Monday-start week, Monday = 0 .. Sunday = 6.
pub fn today_index(now: NaiveDate) -> usize {
    now.weekday().num_days_from_monday() as usize
}

/// `YYYY-MM-DD`, zero padded.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM`, the month grouping key.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// `MMDD`, the compact label used on week-chart buckets.
pub fn month_day_key(date: NaiveDate) -> String {
    date.format("%m%d").to_string()
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

/// Advances `date` by `months` calendar months, clamping the day to the
/// length of the target month (Jan 31 + 1 month = Feb 28/29).
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

/// Advances `date` by `years` calendar years, clamping Feb 29 to Feb 28
/// in non-leap target years.
pub fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let month = date.month();
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
