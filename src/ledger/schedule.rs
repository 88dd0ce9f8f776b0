use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{date_key, shift_month, shift_year};
use crate::errors::LedgerError;

/// Repayment cadence of an installment plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cycle {
    Monthly,
    Yearly,
    Weekly,
}

impl Cycle {
    /// `from` advanced by `steps` cycle units.
    ///
    /// Month and year advancement clamp to the last day of the target month,
    /// so a plan anchored on the 31st stays on month-end in shorter months
    /// rather than overflowing into the next month.
    pub fn advance(&self, from: NaiveDate, steps: u32) -> NaiveDate {
        match self {
            Cycle::Monthly => shift_month(from, steps as i32),
            Cycle::Yearly => shift_year(from, steps as i32),
            Cycle::Weekly => from + Duration::days(7 * steps as i64),
        }
    }
}

/// How a debt is split over time: one lump repayment, or `count` dated
/// installments separated by `cycle`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RepaymentSchedule {
    Unsegmented,
    Installment { count: u32, cycle: Cycle },
}

/// User-entered description of a debt. Input to expansion only, never stored.
///
/// Each produced occurrence carries the full `amount`; the amount is not
/// divided across installments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtSpec {
    pub name: String,
    pub amount: f64,
    pub first_date: NaiveDate,
    pub schedule: RepaymentSchedule,
}

/// One concrete due date produced by expanding a [`DebtSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub display_name: String,
}

impl DebtSpec {
    pub fn unsegmented(name: impl Into<String>, amount: f64, first_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            amount,
            first_date,
            schedule: RepaymentSchedule::Unsegmented,
        }
    }

    pub fn installments(
        name: impl Into<String>,
        amount: f64,
        first_date: NaiveDate,
        count: u32,
        cycle: Cycle,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            first_date,
            schedule: RepaymentSchedule::Installment { count, cycle },
        }
    }

    /// Rejects specs that would produce degenerate events. Runs before any
    /// occurrence is generated, so a bad spec never appends partially.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Validation("debt name must not be empty".into()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "debt amount must be a positive number, got {}",
                self.amount
            )));
        }
        if let RepaymentSchedule::Installment { count, .. } = self.schedule {
            if count < 1 {
                return Err(LedgerError::Validation(
                    "installment count must be at least 1".into(),
                ));
            }
        }
        Ok(())
    }

    /// Expands the spec into its ordered due dates.
    ///
    /// Unsegmented debts keep the bare name; installment occurrences are
    /// labelled `"{name} (YYYY-MM-DD)"` so sibling occurrences stay readable
    /// in flat listings.
    pub fn expand(&self) -> Result<Vec<Occurrence>, LedgerError> {
        self.validate()?;
        match self.schedule {
            RepaymentSchedule::Unsegmented => Ok(vec![Occurrence {
                date: self.first_date,
                display_name: self.name.clone(),
            }]),
            RepaymentSchedule::Installment { count, cycle } => {
                let occurrences = (0..count)
                    .map(|i| {
                        let date = cycle.advance(self.first_date, i);
                        Occurrence {
                            display_name: format!("{} ({})", self.name, date_key(date)),
                            date,
                        }
                    })
                    .collect();
                Ok(occurrences)
            }
        }
    }
}
