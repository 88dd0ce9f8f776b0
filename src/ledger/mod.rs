//! Ledger domain models, installment scheduling, and aggregation views.

pub mod aggregate;
pub mod event;
pub mod schedule;
pub mod store;
pub mod totals;

pub use aggregate::{
    day_groups, daily_series, monthly_groups, nice_max, week_buckets, y_ticks, AggregateBucket,
    DailyPoint, DailySeries, DayGroup, WEEKDAY_LABELS,
};
pub use event::{EventKind, LedgerEvent};
pub use schedule::{Cycle, DebtSpec, Occurrence, RepaymentSchedule};
pub use store::Ledger;
