use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a ledger event. The stored sign of `amount` is fixed by the
/// kind: Income positive, Expense negative, Debt positive (amount still owed).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    Income,
    Expense,
    Debt,
}

/// One dated financial record: an income, an expense, or a single debt
/// occurrence produced by installment expansion.
///
/// Events are immutable after creation except for `settled`, which marks a
/// debt occurrence as repaid and is toggled through the [`Ledger`] store.
///
/// [`Ledger`]: crate::ledger::Ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub id: Uuid,
    pub kind: EventKind,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub settled: bool,
}

impl LedgerEvent {
    /// Income event; the stored amount is the magnitude of `amount`.
    pub fn income(name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::new(EventKind::Income, name, amount.abs(), date)
    }

    /// Expense event; the stored amount is the negated magnitude of `amount`.
    pub fn expense(name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::new(EventKind::Expense, name, -amount.abs(), date)
    }

    /// Debt occurrence, unsettled; the stored amount is the magnitude owed.
    pub fn debt(name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::new(EventKind::Debt, name, amount.abs(), date)
    }

    fn new(kind: EventKind, name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            amount,
            date,
            settled: false,
        }
    }

    /// Magnitude of the amount regardless of stored sign.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    pub fn is_debt(&self) -> bool {
        matches!(self.kind, EventKind::Debt)
    }
}
