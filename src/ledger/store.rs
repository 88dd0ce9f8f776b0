use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregate::{self, AggregateBucket, DailySeries, DayGroup};
use super::event::{EventKind, LedgerEvent};
use super::schedule::DebtSpec;
use super::totals;
use crate::errors::LedgerError;

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Opening balances carried before any recorded event.
const DEFAULT_OPENING_ASSET: f64 = 350_000.0;
const DEFAULT_OPENING_DEBT: f64 = 120_000.0;

/// The event store: an append-only, insertion-ordered ledger of events plus
/// the opening balances the derived totals fold over.
///
/// All mutation funnels through the methods here; read-side views recompute
/// from the current snapshot on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub events: Vec<LedgerEvent>,
    #[serde(default = "Ledger::opening_asset_default")]
    pub opening_asset: f64,
    #[serde(default = "Ledger::opening_debt_default")]
    pub opening_debt: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            events: Vec::new(),
            opening_asset: DEFAULT_OPENING_ASSET,
            opening_debt: DEFAULT_OPENING_DEBT,
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn with_opening_balances(mut self, asset: f64, debt: f64) -> Self {
        self.opening_asset = asset;
        self.opening_debt = debt;
        self
    }

    /// Appends one event, preserving insertion order. No dedup.
    pub fn append(&mut self, event: LedgerEvent) -> Uuid {
        let id = event.id;
        tracing::debug!(kind = ?event.kind, name = %event.name, date = %event.date, "event appended");
        self.events.push(event);
        self.touch();
        id
    }

    /// Records an income from a user-entered magnitude.
    pub fn add_income(
        &mut self,
        name: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Result<Uuid, LedgerError> {
        let name = validated_entry(name.into(), amount)?;
        Ok(self.append(LedgerEvent::income(name, amount, date)))
    }

    /// Records an expense; the magnitude is stored negated.
    pub fn add_expense(
        &mut self,
        name: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Result<Uuid, LedgerError> {
        let name = validated_entry(name.into(), amount)?;
        Ok(self.append(LedgerEvent::expense(name, amount, date)))
    }

    /// Expands a debt spec and appends every resulting occurrence.
    ///
    /// Expansion is all-or-nothing: a spec that fails validation appends no
    /// event at all. Returns the ids of the appended occurrences in due-date
    /// order.
    pub fn add_debt(&mut self, spec: &DebtSpec) -> Result<Vec<Uuid>, LedgerError> {
        let occurrences = spec.expand()?;
        tracing::debug!(name = %spec.name, count = occurrences.len(), "debt expanded");
        Ok(occurrences
            .into_iter()
            .map(|occurrence| {
                self.append(LedgerEvent::debt(
                    occurrence.display_name,
                    spec.amount,
                    occurrence.date,
                ))
            })
            .collect())
    }

    /// Sets the settlement flag on the debt event with the given id.
    pub fn set_settled(&mut self, id: Uuid, settled: bool) -> Result<(), LedgerError> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| LedgerError::InvalidRef(format!("no event with id {id}")))?;
        if !event.is_debt() {
            return Err(LedgerError::InvalidRef(format!(
                "event {id} is not a debt occurrence"
            )));
        }
        event.settled = settled;
        self.touch();
        Ok(())
    }

    /// Convenience index over `(name, date)`: flips every matching debt
    /// occurrence and returns how many matched. Duplicate debts sharing name
    /// and date all update together; zero matches is a no-op, not an error.
    pub fn set_settled_by_name_date(
        &mut self,
        name: &str,
        date: NaiveDate,
        settled: bool,
    ) -> usize {
        let mut matched = 0;
        for event in self
            .events
            .iter_mut()
            .filter(|e| e.is_debt() && e.name == name && e.date == date)
        {
            event.settled = settled;
            matched += 1;
        }
        if matched > 0 {
            self.touch();
        }
        matched
    }

    /// All events in insertion order.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Events of one kind, insertion order preserved.
    pub fn events_of_kind(&self, kind: EventKind) -> impl Iterator<Item = &LedgerEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Net asset derived from the full event set.
    pub fn asset(&self) -> f64 {
        totals::asset(&self.events, self.opening_asset)
    }

    /// Outstanding debt derived from the full event set.
    pub fn debt_outstanding(&self) -> f64 {
        totals::debt_outstanding(&self.events, self.opening_debt)
    }

    /// Debt buckets for the Monday-start week containing `now`.
    pub fn week_buckets(&self, now: NaiveDate) -> Vec<AggregateBucket> {
        aggregate::week_buckets(&self.events, Some(EventKind::Debt), now)
    }

    /// Week buckets with an arbitrary kind filter (`None` = all kinds).
    pub fn week_buckets_filtered(
        &self,
        filter: Option<EventKind>,
        now: NaiveDate,
    ) -> Vec<AggregateBucket> {
        aggregate::week_buckets(&self.events, filter, now)
    }

    /// Per-day income/expense series for the month containing `now`.
    pub fn daily_series(&self, now: NaiveDate) -> DailySeries {
        aggregate::daily_series(&self.events, now)
    }

    /// Events grouped by `YYYY-MM` key, ascending.
    pub fn monthly_groups(&self, filter: Option<EventKind>) -> BTreeMap<String, AggregateBucket> {
        aggregate::monthly_groups(&self.events, filter)
    }

    /// Events grouped by full date key, newest first.
    pub fn day_groups(&self, filter: Option<EventKind>) -> Vec<DayGroup> {
        aggregate::day_groups(&self.events, filter)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn opening_asset_default() -> f64 {
        DEFAULT_OPENING_ASSET
    }

    fn opening_debt_default() -> f64 {
        DEFAULT_OPENING_DEBT
    }
}

fn validated_entry(name: String, amount: f64) -> Result<String, LedgerError> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation("entry name must not be empty".into()));
    }
    if !amount.is_finite() || amount == 0.0 {
        return Err(LedgerError::Validation(format!(
            "entry amount must be a non-zero number, got {amount}"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::schedule::Cycle;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_income_and_expense_store_normalized_signs() {
        let mut ledger = Ledger::new("测试");
        ledger.add_income("餐补", 20.0, date(2025, 6, 19)).unwrap();
        ledger.add_expense("午饭", 20.0, date(2025, 6, 19)).unwrap();
        assert_eq!(ledger.events()[0].amount, 20.0);
        assert_eq!(ledger.events()[1].amount, -20.0);
    }

    #[test]
    fn rejected_entries_append_nothing() {
        let mut ledger = Ledger::new("测试");
        assert!(ledger.add_income("", 20.0, date(2025, 6, 19)).is_err());
        assert!(ledger.add_expense("午饭", f64::NAN, date(2025, 6, 19)).is_err());
        assert_eq!(ledger.event_count(), 0);
    }

    #[test]
    fn add_debt_appends_every_occurrence_or_none() {
        let mut ledger = Ledger::new("测试");
        let spec = DebtSpec::installments("白条", 100.0, date(2025, 1, 31), 3, Cycle::Monthly);
        let ids = ledger.add_debt(&spec).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ledger.event_count(), 3);
        assert_eq!(ledger.events()[1].name, "白条 (2025-02-28)");

        let bad = DebtSpec::installments("白条", 100.0, date(2025, 1, 31), 0, Cycle::Monthly);
        assert!(ledger.add_debt(&bad).is_err());
        assert_eq!(ledger.event_count(), 3);
    }

    #[test]
    fn installment_occurrences_carry_full_amount() {
        let mut ledger = Ledger::new("测试");
        let spec = DebtSpec::installments("车贷", 5000.0, date(2025, 6, 20), 2, Cycle::Monthly);
        ledger.add_debt(&spec).unwrap();
        assert!(ledger.events().iter().all(|e| e.amount == 5000.0));
    }

    #[test]
    fn set_settled_by_id_round_trips_outstanding_debt() {
        let mut ledger = Ledger::new("测试").with_opening_balances(350_000.0, 120_000.0);
        ledger
            .add_debt(&DebtSpec::unsegmented("车贷", 5000.0, date(2025, 6, 20)))
            .unwrap();
        let ids = ledger
            .add_debt(&DebtSpec::unsegmented("信用卡", 500.0, date(2025, 6, 18)))
            .unwrap();
        assert_eq!(ledger.debt_outstanding(), 125_500.0);

        ledger.set_settled(ids[0], true).unwrap();
        assert_eq!(ledger.debt_outstanding(), 125_000.0);
        ledger.set_settled(ids[0], false).unwrap();
        assert_eq!(ledger.debt_outstanding(), 125_500.0);
    }

    #[test]
    fn set_settled_rejects_unknown_or_non_debt_ids() {
        let mut ledger = Ledger::new("测试");
        let income = ledger.add_income("餐补", 20.0, date(2025, 6, 19)).unwrap();
        assert!(matches!(
            ledger.set_settled(Uuid::new_v4(), true),
            Err(LedgerError::InvalidRef(_))
        ));
        assert!(matches!(
            ledger.set_settled(income, true),
            Err(LedgerError::InvalidRef(_))
        ));
    }

    #[test]
    fn name_date_index_updates_duplicates_together() {
        let mut ledger = Ledger::new("测试");
        ledger
            .add_debt(&DebtSpec::unsegmented("信用卡", 500.0, date(2025, 6, 18)))
            .unwrap();
        ledger
            .add_debt(&DebtSpec::unsegmented("信用卡", 500.0, date(2025, 6, 18)))
            .unwrap();
        let matched = ledger.set_settled_by_name_date("信用卡", date(2025, 6, 18), true);
        assert_eq!(matched, 2);
        assert!(ledger.events().iter().all(|e| e.settled));
        assert_eq!(
            ledger.set_settled_by_name_date("花呗", date(2025, 6, 18), true),
            0
        );
    }

    #[test]
    fn asset_uses_opening_balance() {
        let mut ledger = Ledger::new("测试").with_opening_balances(1000.0, 0.0);
        ledger.add_income("工资", 300.0, date(2025, 6, 19)).unwrap();
        ledger.add_expense("晚饭", 12.0, date(2025, 6, 19)).unwrap();
        assert_eq!(ledger.asset(), 1288.0);
    }

    #[test]
    fn week_buckets_default_to_debt_filter() {
        let mut ledger = Ledger::new("测试");
        ledger.add_income("餐补", 20.0, date(2025, 6, 19)).unwrap();
        ledger
            .add_debt(&DebtSpec::unsegmented("信用卡", 500.0, date(2025, 6, 18)))
            .unwrap();
        let buckets = ledger.week_buckets(date(2025, 6, 19));
        let total: f64 = buckets.iter().map(|b| b.amount_sum).sum();
        assert_eq!(total, 500.0);
        let all: f64 = ledger
            .week_buckets_filtered(None, date(2025, 6, 19))
            .iter()
            .map(|b| b.amount_sum)
            .sum();
        assert_eq!(all, 520.0);
    }
}
