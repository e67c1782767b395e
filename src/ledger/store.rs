// ledger/store.rs - In-memory ledger with write-through persistence
//
// Every state-changing call builds the next state on a copy, writes the
// full snapshot, and only then swaps it in. A failed write leaves memory
// untouched, so paired fields (contribution list + running total) always
// move together.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::models::{
    CategoryTotal, Expense, ExpenseUpdate, Income, MonthlySummary, SavingsContribution, SavingsGoal,
};
use super::month::MonthKey;
use super::LedgerError;
use crate::storage::{self, KeyValueStore, LEDGER_KEY};

/// Snapshot format version written alongside the state
pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub savings_goal: SavingsGoal,
    #[serde(default)]
    pub savings_contributions: Vec<SavingsContribution>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedLedger {
    state: LedgerState,
    #[serde(default)]
    version: u32,
}

pub struct LedgerStore {
    state: LedgerState,
    storage: Arc<dyn KeyValueStore>,
}

impl LedgerStore {
    /// Load the persisted snapshot, or start empty when none exists
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Result<Self, LedgerError> {
        let state = match storage::load_json::<PersistedLedger>(storage.as_ref(), LEDGER_KEY)? {
            Some(persisted) => {
                debug!(
                    version = persisted.version,
                    expenses = persisted.state.expenses.len(),
                    incomes = persisted.state.incomes.len(),
                    contributions = persisted.state.savings_contributions.len(),
                    "Loaded ledger snapshot"
                );
                persisted.state
            }
            None => LedgerState::default(),
        };
        check_invariants(&state);
        Ok(Self { state, storage })
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.state.expenses
    }

    pub fn incomes(&self) -> &[Income] {
        &self.state.incomes
    }

    pub fn savings_goal(&self) -> &SavingsGoal {
        &self.state.savings_goal
    }

    pub fn savings_contributions(&self) -> &[SavingsContribution] {
        &self.state.savings_contributions
    }

    /// Write the current snapshot regardless of changes
    pub fn flush(&self) -> Result<(), LedgerError> {
        self.persist(&self.state)
    }

    fn persist(&self, state: &LedgerState) -> Result<(), LedgerError> {
        let persisted = PersistedLedger { state: state.clone(), version: SNAPSHOT_VERSION };
        storage::save_json(self.storage.as_ref(), LEDGER_KEY, &persisted)?;
        Ok(())
    }

    /// Run `mutate` against a copy of the state. `None` means nothing changed
    /// and nothing is written; an error leaves the state untouched.
    fn apply<R>(
        &mut self,
        mutate: impl FnOnce(&mut LedgerState) -> Result<Option<R>, LedgerError>,
    ) -> Result<Option<R>, LedgerError> {
        let mut next = self.state.clone();
        let Some(result) = mutate(&mut next)? else {
            return Ok(None);
        };
        self.persist(&next)?;
        self.state = next;
        Ok(Some(result))
    }

    // Expenses

    pub fn add_expense(
        &mut self,
        amount: Decimal,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Expense, LedgerError> {
        let expense = Expense {
            id: Uuid::new_v4(),
            amount,
            category: category.into(),
            description: description.into(),
            date,
        };
        let created = expense.clone();
        self.apply(move |state| {
            state.expenses.push(expense);
            Ok(Some(()))
        })?;
        debug!(id = %created.id, amount = %created.amount, "Expense added");
        Ok(created)
    }

    /// Returns `false` (and changes nothing) when the id is unknown
    pub fn delete_expense(&mut self, id: Uuid) -> Result<bool, LedgerError> {
        let removed = self.apply(|state| {
            let Some(index) = state.expenses.iter().position(|e| e.id == id) else {
                return Ok(None);
            };
            Ok(Some(state.expenses.remove(index)))
        })?;
        debug!(%id, found = removed.is_some(), "Delete expense");
        Ok(removed.is_some())
    }

    pub fn edit_expense(&mut self, id: Uuid, update: ExpenseUpdate) -> Result<bool, LedgerError> {
        if update.is_empty() {
            return Ok(self.state.expenses.iter().any(|e| e.id == id));
        }
        let edited = self.apply(|state| {
            let Some(expense) = state.expenses.iter_mut().find(|e| e.id == id) else {
                return Ok(None);
            };
            update.apply_to(expense);
            Ok(Some(()))
        })?;
        debug!(%id, found = edited.is_some(), "Edit expense");
        Ok(edited.is_some())
    }

    // Income

    pub fn add_income(
        &mut self,
        amount: Decimal,
        source: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Income, LedgerError> {
        let income = Income {
            id: Uuid::new_v4(),
            amount,
            source: source.into(),
            description: description.into(),
            date,
            month: MonthKey::of(date),
        };
        let created = income.clone();
        self.apply(move |state| {
            state.incomes.push(income);
            Ok(Some(()))
        })?;
        debug!(id = %created.id, month = %created.month, amount = %created.amount, "Income added");
        Ok(created)
    }

    pub fn delete_income(&mut self, id: Uuid) -> Result<bool, LedgerError> {
        let removed = self.apply(|state| {
            let Some(index) = state.incomes.iter().position(|i| i.id == id) else {
                return Ok(None);
            };
            Ok(Some(state.incomes.remove(index)))
        })?;
        debug!(%id, found = removed.is_some(), "Delete income");
        Ok(removed.is_some())
    }

    // Savings

    pub fn set_savings_goal(&mut self, target_amount: Decimal) -> Result<(), LedgerError> {
        self.apply(|state| {
            state.savings_goal.target_amount = target_amount;
            Ok(Some(()))
        })?;
        debug!(target = %target_amount, "Savings goal set");
        Ok(())
    }

    /// Append a contribution and raise the running total in one update
    pub fn add_savings_contribution(
        &mut self,
        amount: Decimal,
        month: MonthKey,
        date: NaiveDate,
    ) -> Result<SavingsContribution, LedgerError> {
        let contribution = SavingsContribution { id: Uuid::new_v4(), amount, date, month };
        let created = contribution.clone();
        self.apply(move |state| {
            state.savings_goal.current_amount = state
                .savings_goal
                .current_amount
                .checked_add(amount)
                .ok_or(LedgerError::Overflow("savings total"))?;
            state.savings_contributions.push(contribution);
            Ok(Some(()))
        })?;
        debug!(
            id = %created.id,
            %month,
            current = %self.state.savings_goal.current_amount,
            "Savings contribution added"
        );
        Ok(created)
    }

    /// Remove a contribution and lower the running total by exactly its amount.
    /// Unknown ids change nothing.
    pub fn delete_savings_contribution(&mut self, id: Uuid) -> Result<bool, LedgerError> {
        let removed = self.apply(|state| {
            let Some(index) = state.savings_contributions.iter().position(|c| c.id == id) else {
                return Ok(None);
            };
            let contribution = state.savings_contributions.remove(index);
            state.savings_goal.current_amount = state
                .savings_goal
                .current_amount
                .checked_sub(contribution.amount)
                .ok_or(LedgerError::Overflow("savings total"))?;
            Ok(Some(contribution))
        })?;
        debug!(%id, found = removed.is_some(), "Delete savings contribution");
        Ok(removed.is_some())
    }

    /// Delete every contribution; returns how many were removed
    pub fn clear_savings_contributions(&mut self) -> Result<usize, LedgerError> {
        let removed = self.apply(|state| {
            if state.savings_contributions.is_empty() {
                return Ok(None);
            }
            let drained: Vec<_> = state.savings_contributions.drain(..).collect();
            let removed = checked_total(drained.iter().map(|c| c.amount), "savings total")?;
            state.savings_goal.current_amount = state
                .savings_goal
                .current_amount
                .checked_sub(removed)
                .ok_or(LedgerError::Overflow("savings total"))?;
            Ok(Some(drained.len()))
        })?;
        Ok(removed.unwrap_or(0))
    }

    // Aggregation

    pub fn income_for_month(&self, month: MonthKey) -> Result<Decimal, LedgerError> {
        checked_total(self.incomes_for_month(month).map(|i| i.amount), "monthly income")
    }

    pub fn savings_for_month(&self, month: MonthKey) -> Result<Decimal, LedgerError> {
        checked_total(self.contributions_for_month(month).map(|c| c.amount), "monthly savings")
    }

    pub fn incomes_for_month(&self, month: MonthKey) -> impl Iterator<Item = &Income> {
        self.state.incomes.iter().filter(move |i| i.month == month)
    }

    pub fn contributions_for_month(
        &self,
        month: MonthKey,
    ) -> impl Iterator<Item = &SavingsContribution> {
        self.state.savings_contributions.iter().filter(move |c| c.month == month)
    }

    pub fn expenses_for_month(&self, month: MonthKey) -> impl Iterator<Item = &Expense> {
        self.state.expenses.iter().filter(move |e| month.contains(e.date))
    }

    pub fn expense_total_for_month(&self, month: MonthKey) -> Result<Decimal, LedgerError> {
        checked_total(self.expenses_for_month(month).map(|e| e.amount), "monthly expenses")
    }

    /// Category breakdown for a month, ordered by category name
    pub fn expenses_by_category(&self, month: MonthKey) -> Result<Vec<CategoryTotal>, LedgerError> {
        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for expense in self.expenses_for_month(month) {
            let total = totals.entry(expense.category.as_str()).or_default();
            *total = total
                .checked_add(expense.amount)
                .ok_or(LedgerError::Overflow("category total"))?;
        }
        Ok(totals
            .into_iter()
            .map(|(category, total)| CategoryTotal { category: category.to_string(), total })
            .collect())
    }

    pub fn monthly_summary(&self, month: MonthKey) -> Result<MonthlySummary, LedgerError> {
        let income = self.income_for_month(month)?;
        let expenses = self.expense_total_for_month(month)?;
        let savings = self.savings_for_month(month)?;
        let balance = income
            .checked_sub(expenses)
            .and_then(|rest| rest.checked_sub(savings))
            .ok_or(LedgerError::Overflow("monthly balance"))?;
        Ok(MonthlySummary { month, income, expenses, savings, balance })
    }

    /// Percent of the savings target reached, capped at 100
    pub fn savings_progress(&self) -> Decimal {
        let goal = &self.state.savings_goal;
        if goal.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        // A quotient too large to represent is far past the target
        goal.current_amount
            .checked_div(goal.target_amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ONE_HUNDRED, |percent| percent.min(Decimal::ONE_HUNDRED))
    }

    /// All-time (income, expenses)
    pub fn lifetime_totals(&self) -> Result<(Decimal, Decimal), LedgerError> {
        let income = checked_total(self.state.incomes.iter().map(|i| i.amount), "total income")?;
        let expenses = checked_total(self.state.expenses.iter().map(|e| e.amount), "total expenses")?;
        Ok((income, expenses))
    }
}

/// Sum that reports overflow instead of panicking
fn checked_total(
    mut amounts: impl Iterator<Item = Decimal>,
    what: &'static str,
) -> Result<Decimal, LedgerError> {
    amounts.try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or(LedgerError::Overflow(what))
    })
}

/// Warn about a snapshot whose stored month keys or running total disagree
/// with its records (e.g. after a hand edit). The snapshot is still used.
fn check_invariants(state: &LedgerState) {
    for income in &state.incomes {
        if income.month != MonthKey::of(income.date) {
            warn!(
                id = %income.id,
                month = %income.month,
                date = %income.date,
                "Income month key does not match its date"
            );
        }
    }
    match checked_total(state.savings_contributions.iter().map(|c| c.amount), "savings total") {
        Ok(sum) if sum == state.savings_goal.current_amount => {}
        Ok(sum) => warn!(
            current = %state.savings_goal.current_amount,
            contributions = %sum,
            "Savings total does not match contributions"
        ),
        Err(e) => warn!(error = %e, "Savings contributions cannot be totalled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn new_store() -> (Arc<MemoryStore>, LedgerStore) {
        let backing = Arc::new(MemoryStore::new());
        let store = LedgerStore::load(backing.clone()).unwrap();
        (backing, store)
    }

    /// Store that refuses every write
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_income_month_scenario() {
        let (_, mut store) = new_store();
        let income = store
            .add_income(Decimal::from(5000), "Salary", "March pay", date(2025, 3, 1))
            .unwrap();

        assert_eq!(income.month, month("2025-03"));
        assert_eq!(store.income_for_month(month("2025-03")).unwrap(), Decimal::from(5000));
        assert_eq!(store.income_for_month(month("2025-04")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_income_for_month_sums_only_matching() {
        let (_, mut store) = new_store();
        store.add_income(Decimal::from(100), "a", "", date(2025, 3, 1)).unwrap();
        store.add_income(Decimal::new(5025, 2), "b", "", date(2025, 3, 31)).unwrap();
        store.add_income(Decimal::from(999), "c", "", date(2025, 2, 28)).unwrap();

        assert_eq!(store.income_for_month(month("2025-03")).unwrap(), Decimal::new(15025, 2));
        assert_eq!(store.income_for_month(month("2025-02")).unwrap(), Decimal::from(999));
    }

    #[test]
    fn test_contribution_add_then_delete_returns_to_zero() {
        let (_, mut store) = new_store();
        let c = store
            .add_savings_contribution(Decimal::from(200), month("2025-03"), date(2025, 3, 1))
            .unwrap();
        assert_eq!(store.savings_goal().current_amount, Decimal::from(200));

        assert!(store.delete_savings_contribution(c.id).unwrap());
        assert_eq!(store.savings_goal().current_amount, Decimal::ZERO);
        assert!(store.savings_contributions().is_empty());
    }

    #[test]
    fn test_running_total_matches_contributions_over_sequence() {
        let (_, mut store) = new_store();
        let amounts = ["0.10", "0.20", "19.99", "250", "0.01", "73.45"];
        let mut ids = Vec::new();
        for (i, a) in amounts.iter().enumerate() {
            let m = month("2025-01").shift(i as i32);
            let c = store
                .add_savings_contribution(a.parse().unwrap(), m, m.first_day())
                .unwrap();
            ids.push(c.id);
        }
        for id in ids.iter().step_by(2) {
            store.delete_savings_contribution(*id).unwrap();
            let sum: Decimal = store.savings_contributions().iter().map(|c| c.amount).sum();
            assert_eq!(store.savings_goal().current_amount, sum);
        }
        assert!(!store.delete_savings_contribution(Uuid::new_v4()).unwrap());
        let sum: Decimal = store.savings_contributions().iter().map(|c| c.amount).sum();
        assert_eq!(store.savings_goal().current_amount, sum);
    }

    #[test]
    fn test_delete_unknown_ids_are_noops() {
        let (backing, mut store) = new_store();
        store.add_expense(Decimal::from(12), "Food & Dining", "lunch", date(2025, 3, 2)).unwrap();
        let before = store.state().clone();
        let persisted_before = backing.get(LEDGER_KEY).unwrap();

        assert!(!store.delete_expense(Uuid::new_v4()).unwrap());
        assert!(!store.delete_income(Uuid::new_v4()).unwrap());
        assert!(!store.edit_expense(Uuid::new_v4(), ExpenseUpdate {
            amount: Some(Decimal::ONE),
            ..Default::default()
        }).unwrap());

        assert_eq!(store.state(), &before);
        assert_eq!(backing.get(LEDGER_KEY).unwrap(), persisted_before);
    }

    #[test]
    fn test_edit_expense_merges_fields() {
        let (_, mut store) = new_store();
        let e = store.add_expense(Decimal::from(40), "General", "taxi", date(2025, 3, 5)).unwrap();

        let update = ExpenseUpdate {
            category: Some("Transportation".into()),
            amount: Some(Decimal::new(3850, 2)),
            ..Default::default()
        };
        assert!(store.edit_expense(e.id, update).unwrap());

        let edited = &store.expenses()[0];
        assert_eq!(edited.id, e.id);
        assert_eq!(edited.category, "Transportation");
        assert_eq!(edited.description, "taxi");
        assert_eq!(edited.amount, Decimal::new(3850, 2));
    }

    #[test]
    fn test_set_goal_leaves_current_untouched() {
        let (_, mut store) = new_store();
        store.add_savings_contribution(Decimal::from(50), month("2025-03"), date(2025, 3, 1)).unwrap();
        store.set_savings_goal(Decimal::from(1000)).unwrap();

        assert_eq!(store.savings_goal().target_amount, Decimal::from(1000));
        assert_eq!(store.savings_goal().current_amount, Decimal::from(50));
        assert_eq!(store.savings_progress(), Decimal::from(5));
    }

    #[test]
    fn test_progress_capped_and_zero_target() {
        let (_, mut store) = new_store();
        assert_eq!(store.savings_progress(), Decimal::ZERO);
        store.set_savings_goal(Decimal::from(100)).unwrap();
        store.add_savings_contribution(Decimal::from(150), month("2025-03"), date(2025, 3, 1)).unwrap();
        assert_eq!(store.savings_progress(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_clear_contributions_zeroes_total() {
        let (_, mut store) = new_store();
        store.add_savings_contribution(Decimal::from(10), month("2025-03"), date(2025, 3, 1)).unwrap();
        store.add_savings_contribution(Decimal::from(15), month("2025-04"), date(2025, 4, 1)).unwrap();

        assert_eq!(store.clear_savings_contributions().unwrap(), 2);
        assert_eq!(store.savings_goal().current_amount, Decimal::ZERO);
        assert_eq!(store.clear_savings_contributions().unwrap(), 0);
    }

    #[test]
    fn test_monthly_summary_and_categories() {
        let (_, mut store) = new_store();
        let march = month("2025-03");
        store.add_income(Decimal::from(3000), "Salary", "", date(2025, 3, 1)).unwrap();
        store.add_expense(Decimal::from(200), "Shopping", "", date(2025, 3, 3)).unwrap();
        store.add_expense(Decimal::from(50), "Food & Dining", "", date(2025, 3, 4)).unwrap();
        store.add_expense(Decimal::from(25), "Food & Dining", "", date(2025, 3, 9)).unwrap();
        store.add_expense(Decimal::from(999), "Shopping", "", date(2025, 4, 1)).unwrap();
        store.add_savings_contribution(Decimal::from(500), march, march.first_day()).unwrap();

        let summary = store.monthly_summary(march).unwrap();
        assert_eq!(summary.income, Decimal::from(3000));
        assert_eq!(summary.expenses, Decimal::from(275));
        assert_eq!(summary.savings, Decimal::from(500));
        assert_eq!(summary.balance, Decimal::from(2225));
        assert!(!summary.is_over_budget());

        let categories = store.expenses_by_category(march).unwrap();
        assert_eq!(categories, vec![
            CategoryTotal { category: "Food & Dining".into(), total: Decimal::from(75) },
            CategoryTotal { category: "Shopping".into(), total: Decimal::from(200) },
        ]);
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let (backing, mut store) = new_store();
        store.add_income(Decimal::from(5000), "Salary", "", date(2025, 3, 1)).unwrap();
        store.add_savings_contribution(Decimal::from(200), month("2025-03"), date(2025, 3, 1)).unwrap();
        store.set_savings_goal(Decimal::from(1200)).unwrap();

        let reloaded = LedgerStore::load(backing.clone()).unwrap();
        assert_eq!(reloaded.state(), store.state());

        let raw: serde_json::Value =
            serde_json::from_str(&backing.get(LEDGER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(raw["version"], 0);
        assert_eq!(raw["state"]["incomes"][0]["month"], "2025-03");
        assert!(raw["state"]["savingsGoal"].get("currentAmount").is_some());
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let mut store = LedgerStore::load(Arc::new(ReadOnlyStore)).unwrap();
        let result =
            store.add_savings_contribution(Decimal::from(200), month("2025-03"), date(2025, 3, 1));

        assert!(matches!(result, Err(LedgerError::Storage(_))));
        assert!(store.savings_contributions().is_empty());
        assert_eq!(store.savings_goal().current_amount, Decimal::ZERO);
    }

    #[test]
    fn test_contribution_overflow_is_an_error() {
        let (backing, mut store) = new_store();
        let march = month("2025-03");
        store.add_savings_contribution(Decimal::MAX, march, march.first_day()).unwrap();
        let persisted_before = backing.get(LEDGER_KEY).unwrap();

        let result = store.add_savings_contribution(Decimal::MAX, march, march.first_day());
        assert!(matches!(result, Err(LedgerError::Overflow(_))));
        assert_eq!(store.savings_contributions().len(), 1);
        assert_eq!(store.savings_goal().current_amount, Decimal::MAX);
        assert_eq!(backing.get(LEDGER_KEY).unwrap(), persisted_before);
    }

    #[test]
    fn test_aggregates_overflow_is_an_error() {
        let (_, mut store) = new_store();
        let march = month("2025-03");
        store.add_income(Decimal::MAX, "a", "", date(2025, 3, 1)).unwrap();
        store.add_income(Decimal::MAX, "b", "", date(2025, 3, 2)).unwrap();
        store.add_expense(Decimal::MAX, "Shopping", "", date(2025, 3, 3)).unwrap();
        store.add_expense(Decimal::MAX, "Shopping", "", date(2025, 3, 4)).unwrap();

        assert!(matches!(store.income_for_month(march), Err(LedgerError::Overflow(_))));
        assert!(matches!(store.expense_total_for_month(march), Err(LedgerError::Overflow(_))));
        assert!(matches!(store.expenses_by_category(march), Err(LedgerError::Overflow(_))));
        assert!(matches!(store.monthly_summary(march), Err(LedgerError::Overflow(_))));
        assert!(matches!(store.lifetime_totals(), Err(LedgerError::Overflow(_))));
    }

    #[test]
    fn test_balance_overflow_is_an_error() {
        let (_, mut store) = new_store();
        let march = month("2025-03");
        store.add_expense(Decimal::MAX, "Shopping", "", date(2025, 3, 3)).unwrap();
        store.add_savings_contribution(Decimal::MAX, march, march.first_day()).unwrap();

        assert!(matches!(store.monthly_summary(march), Err(LedgerError::Overflow(_))));
    }

    #[test]
    fn test_progress_with_tiny_target_caps() {
        let (_, mut store) = new_store();
        store.set_savings_goal(Decimal::new(1, 28)).unwrap();
        store.add_savings_contribution(Decimal::MAX, month("2025-03"), date(2025, 3, 1)).unwrap();
        assert_eq!(store.savings_progress(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_inconsistent_snapshot_still_loads() {
        let (backing, mut store) = new_store();
        store.add_income(Decimal::from(5000), "Salary", "", date(2025, 3, 1)).unwrap();
        store.add_savings_contribution(Decimal::from(200), month("2025-03"), date(2025, 3, 1)).unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_str(&backing.get(LEDGER_KEY).unwrap().unwrap()).unwrap();
        raw["state"]["incomes"][0]["month"] = "2025-07".into();
        raw["state"]["savingsGoal"]["currentAmount"] = "999".into();
        backing.set(LEDGER_KEY, &raw.to_string()).unwrap();

        let reloaded = LedgerStore::load(backing.clone()).unwrap();
        assert_eq!(reloaded.incomes()[0].month, month("2025-07"));
        assert_eq!(reloaded.savings_goal().current_amount, Decimal::from(999));
    }
}
