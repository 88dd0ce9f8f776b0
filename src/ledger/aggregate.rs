//! Time-bucket views over the event collection.
//!
//! Every view is a full recomputation over the events it is given; nothing
//! here caches or mutates. Callers pass an explicit reference date for the
//! week and daily views.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::event::{EventKind, LedgerEvent};
use crate::calendar::{date_key, days_in_month, month_day_key, month_key, week_range};

/// Weekday display labels, Monday first, aligned with bucket order.
pub const WEEKDAY_LABELS: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// Number of leading days shown in the first half of the daily chart.
const FIRST_HALF_DAYS: usize = 15;

/// A time-window grouping with its aggregated sum and member events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub label: String,
    pub start_date: NaiveDate,
    pub amount_sum: f64,
    pub events: Vec<LedgerEvent>,
    /// True iff the bucket is non-empty and every member debt is settled.
    pub all_settled: bool,
}

impl AggregateBucket {
    fn new(label: String, start_date: NaiveDate) -> Self {
        Self {
            label,
            start_date,
            amount_sum: 0.0,
            events: Vec::new(),
            all_settled: false,
        }
    }

    fn push(&mut self, event: &LedgerEvent) {
        self.amount_sum += event.amount;
        self.events.push(event.clone());
    }

    fn finish(&mut self) {
        self.all_settled = !self.events.is_empty()
            && self
                .events
                .iter()
                .filter(|e| e.is_debt())
                .all(|e| e.settled);
    }
}

/// One day of the calendar-month chart: income and expense accumulate as
/// separate series so the two bar halves can be sized independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPoint {
    pub day: u32,
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

/// Per-day income/expense series for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySeries {
    pub points: Vec<DailyPoint>,
}

impl DailySeries {
    /// Days 1–15, the scrollable upper chart.
    pub fn first_half(&self) -> &[DailyPoint] {
        let split = FIRST_HALF_DAYS.min(self.points.len());
        &self.points[..split]
    }

    /// Day 16 through month end, the scrollable lower chart.
    pub fn second_half(&self) -> &[DailyPoint] {
        let split = FIRST_HALF_DAYS.min(self.points.len());
        &self.points[split..]
    }

    /// Nice axis ceiling covering both series, never below the floor of 10.
    pub fn y_max(&self) -> f64 {
        let max = self
            .points
            .iter()
            .map(|p| p.income.max(p.expense))
            .fold(0.0_f64, f64::max);
        nice_max(max)
    }
}

/// Per-date detail group for the descending bill list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayGroup {
    pub date_key: String,
    pub income_sum: f64,
    pub expense_sum: f64,
    pub events: Vec<LedgerEvent>,
}

fn matches_filter(event: &LedgerEvent, filter: Option<EventKind>) -> bool {
    filter.map_or(true, |kind| event.kind == kind)
}

/// Buckets events into the Monday-start week containing `now`: one bucket per
/// weekday labelled `MMDD`, members matched by exact date equality.
pub fn week_buckets(
    events: &[LedgerEvent],
    filter: Option<EventKind>,
    now: NaiveDate,
) -> Vec<AggregateBucket> {
    let (monday, _) = week_range(now);
    let mut buckets: Vec<AggregateBucket> = (0..7)
        .map(|i| {
            let day = monday + Duration::days(i);
            AggregateBucket::new(month_day_key(day), day)
        })
        .collect();
    for event in events.iter().filter(|e| matches_filter(e, filter)) {
        for bucket in buckets.iter_mut() {
            if event.date == bucket.start_date {
                bucket.push(event);
            }
        }
    }
    for bucket in buckets.iter_mut() {
        bucket.finish();
    }
    buckets
}

/// Income/expense pair per day of the month containing `now`. Debt events are
/// excluded; both sums accumulate magnitudes.
pub fn daily_series(events: &[LedgerEvent], now: NaiveDate) -> DailySeries {
    let year = now.year();
    let month = now.month();
    let mut points: Vec<DailyPoint> = (1..=days_in_month(year, month))
        .map(|day| DailyPoint {
            day,
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            income: 0.0,
            expense: 0.0,
        })
        .collect();
    for event in events {
        if event.date.year() != year || event.date.month() != month {
            continue;
        }
        let point = &mut points[event.date.day() as usize - 1];
        match event.kind {
            EventKind::Income => point.income += event.magnitude(),
            EventKind::Expense => point.expense += event.magnitude(),
            EventKind::Debt => {}
        }
    }
    DailySeries { points }
}

/// Groups events by `YYYY-MM` month key. `BTreeMap` keeps the keys in
/// ascending lexicographic order, which is chronological for zero-padded
/// keys.
pub fn monthly_groups(
    events: &[LedgerEvent],
    filter: Option<EventKind>,
) -> BTreeMap<String, AggregateBucket> {
    let mut groups: BTreeMap<String, AggregateBucket> = BTreeMap::new();
    for event in events.iter().filter(|e| matches_filter(e, filter)) {
        let key = month_key(event.date);
        let first_of_month =
            NaiveDate::from_ymd_opt(event.date.year(), event.date.month(), 1).unwrap();
        groups
            .entry(key.clone())
            .or_insert_with(|| AggregateBucket::new(key, first_of_month))
            .push(event);
    }
    for bucket in groups.values_mut() {
        bucket.finish();
    }
    groups
}

/// Groups events by full date key, newest date first, with per-group income
/// and expense magnitudes for the group header.
pub fn day_groups(events: &[LedgerEvent], filter: Option<EventKind>) -> Vec<DayGroup> {
    let mut by_date: BTreeMap<String, Vec<LedgerEvent>> = BTreeMap::new();
    for event in events.iter().filter(|e| matches_filter(e, filter)) {
        by_date
            .entry(date_key(event.date))
            .or_default()
            .push(event.clone());
    }
    by_date
        .into_iter()
        .rev()
        .map(|(date_key, events)| {
            let income_sum = events
                .iter()
                .filter(|e| e.kind == EventKind::Income)
                .map(|e| e.magnitude())
                .sum();
            let expense_sum = events
                .iter()
                .filter(|e| e.kind == EventKind::Expense)
                .map(|e| e.magnitude())
                .sum();
            DayGroup {
                date_key,
                income_sum,
                expense_sum,
                events,
            }
        })
        .collect()
}

/// Rounds `v` up to a chart-friendly axis ceiling. Values at or below each
/// rung of {10, 50, 100, 500, 1000, 5000, 10000} snap to that rung; beyond
/// the ladder, the next multiple of 10000.
pub fn nice_max(v: f64) -> f64 {
    const LADDER: [f64; 7] = [10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0];
    for rung in LADDER {
        if v <= rung {
            return rung;
        }
    }
    (v / 10000.0).ceil() * 10000.0
}

/// Axis tick values from top to baseline.
pub fn y_ticks(max: f64) -> [f64; 3] {
    [max, max / 2.0, 0.0]
}
