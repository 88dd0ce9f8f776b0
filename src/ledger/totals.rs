//! Derived running totals, recomputed from scratch on every read.
//!
//! Both totals are pure folds over the event slice, so they are invariant
//! under event reordering and never depend on update history.

use super::event::{EventKind, LedgerEvent};

/// Net asset: the opening balance plus income magnitudes minus expense
/// magnitudes. Settlement status is irrelevant for income and expenses.
pub fn asset(events: &[LedgerEvent], opening: f64) -> f64 {
    events.iter().fold(opening, |sum, event| match event.kind {
        EventKind::Income => sum + event.magnitude(),
        EventKind::Expense => sum - event.magnitude(),
        EventKind::Debt => sum,
    })
}

/// Outstanding debt: the opening balance plus every unsettled debt
/// occurrence. Settling an occurrence removes it from the sum; clearing the
/// flag re-adds it.
pub fn debt_outstanding(events: &[LedgerEvent], opening: f64) -> f64 {
    events
        .iter()
        .filter(|event| event.is_debt() && !event.settled)
        .fold(opening, |sum, event| sum + event.magnitude())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_events() -> Vec<LedgerEvent> {
        vec![
            LedgerEvent::income("餐补", 20.0, date(2025, 6, 19)),
            LedgerEvent::expense("午饭", 20.0, date(2025, 6, 19)),
            LedgerEvent::expense("晚饭", 12.0, date(2025, 6, 19)),
            LedgerEvent::debt("车贷", 5000.0, date(2025, 6, 20)),
            LedgerEvent::debt("信用卡", 500.0, date(2025, 6, 18)),
        ]
    }

    #[test]
    fn asset_adds_income_and_subtracts_expenses() {
        let events = sample_events();
        assert_eq!(asset(&events, 350_000.0), 350_000.0 + 20.0 - 20.0 - 12.0);
    }

    #[test]
    fn debt_outstanding_counts_unsettled_debts() {
        let events = sample_events();
        assert_eq!(debt_outstanding(&events, 120_000.0), 125_500.0);
    }

    #[test]
    fn settling_removes_and_unsettling_restores() {
        let mut events = sample_events();
        let card = events
            .iter_mut()
            .find(|e| e.name == "信用卡")
            .unwrap();
        card.settled = true;
        assert_eq!(debt_outstanding(&events, 120_000.0), 125_000.0);
        events.iter_mut().find(|e| e.name == "信用卡").unwrap().settled = false;
        assert_eq!(debt_outstanding(&events, 120_000.0), 125_500.0);
    }

    #[test]
    fn totals_are_order_independent() {
        let mut events = sample_events();
        let forward_asset = asset(&events, 350_000.0);
        let forward_debt = debt_outstanding(&events, 120_000.0);
        events.reverse();
        assert_eq!(asset(&events, 350_000.0), forward_asset);
        assert_eq!(debt_outstanding(&events, 120_000.0), forward_debt);
    }

    #[test]
    fn empty_ledger_returns_opening_balances() {
        assert_eq!(asset(&[], 350_000.0), 350_000.0);
        assert_eq!(debt_outstanding(&[], 120_000.0), 120_000.0);
    }
}
