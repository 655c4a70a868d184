// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The month-keyed ledger and the ways a month comes into existence.
//!
//! A month is materialized either lazily by [`MonthStore::get`], which copies
//! the previous month without advancing any debt, or explicitly by
//! [`MonthStore::close_month`], which is the only place debts progress by a term.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{RolloverError, ValidationError};
use crate::models::{
    CollectionKind, Debt, DebtDraft, Draft, EntityId, Entry, EntryDraft, GoalDraft, Identified,
    Ledger, Money, MonthKey, MonthRecord, SavingsGoal,
};
use crate::recalc::{recalculate, settle_installment};
use crate::storage::Storage;

pub const DEFAULT_CURRENCY: &str = "COP";

/// Everything that is persisted, as one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub ledger: Ledger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_month: Option<MonthKey>,
    #[serde(default = "first_id")]
    pub next_id: EntityId,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn first_id() -> EntityId {
    1
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            ledger: Ledger::new(),
            current_month: None,
            next_id: first_id(),
            currency: default_currency(),
        }
    }
}

/// Owner of the ledger. Every mutation is followed by a best-effort save.
#[derive(Debug)]
pub struct MonthStore {
    state: AppState,
    storage: Option<Storage>,
}

impl MonthStore {
    pub fn open(storage: Storage) -> Result<Self> {
        let mut state = storage.load()?;
        let floor = state
            .ledger
            .values()
            .filter_map(MonthRecord::max_id)
            .max()
            .map_or(first_id(), |id| id + 1);
        state.next_id = state.next_id.max(floor);
        debug!(
            "loaded {} month(s) from {}",
            state.ledger.len(),
            storage.path().display()
        );
        Ok(Self {
            state,
            storage: Some(storage),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            state: AppState::default(),
            storage: None,
        }
    }

    pub fn storage_path(&self) -> Option<&std::path::Path> {
        self.storage.as_ref().map(Storage::path)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    pub fn contains(&self, key: MonthKey) -> bool {
        self.state.ledger.contains_key(&key)
    }

    /// Read a month without materializing it.
    pub fn peek(&self, key: MonthKey) -> Option<&MonthRecord> {
        self.state.ledger.get(&key)
    }

    /// The month at `key`, created on first access.
    ///
    /// A new month is a copy of the previous calendar month when that exists
    /// (fresh ids, dates moved to the 1st, paid flags cleared, installments
    /// recomputed, paid terms untouched) and empty otherwise.
    pub fn get(&mut self, key: MonthKey) -> &mut MonthRecord {
        if !self.state.ledger.contains_key(&key) {
            let record = self.materialize(key);
            self.state.ledger.insert(key, record);
            self.persist();
        }
        self.state.ledger.entry(key).or_default()
    }

    fn materialize(&mut self, key: MonthKey) -> MonthRecord {
        let prev = key.previous();
        let Some(mut record) = self.state.ledger.get(&prev).cloned() else {
            info!("materialized empty month {key}");
            return MonthRecord::default();
        };
        let day = key.first_day();
        for entry in record
            .incomes
            .iter_mut()
            .chain(record.fixed_expenses.iter_mut())
            .chain(record.purchases.iter_mut())
        {
            entry.id = self.fresh_id();
            entry.date = day;
            entry.paid_this_month = false;
        }
        for debt in record.all_debts_mut() {
            debt.id = self.fresh_id();
            debt.date = day;
            debt.paid_this_month = false;
            settle_installment(debt);
        }
        for goal in &mut record.savings_goals {
            goal.id = self.fresh_id();
            goal.date = day;
        }
        info!("materialized {key} from {prev} ({} entities)", record.len());
        record
    }

    /// Close `from` and produce the following month from it.
    ///
    /// Incomes and fixed expenses carry over unpaid, purchases are dropped,
    /// savings goals keep their balance, and each debt paid in `from` advances
    /// one term. An existing non-empty destination is only replaced when
    /// `overwrite` is set.
    pub fn close_month(
        &mut self,
        from: MonthKey,
        overwrite: bool,
    ) -> Result<MonthKey, RolloverError> {
        let Some(source) = self.state.ledger.get(&from).cloned() else {
            return Err(RolloverError::SourceMissing(from));
        };
        let next = from.next();
        if let Some(existing) = self.state.ledger.get(&next) {
            if !existing.is_empty() && !overwrite {
                return Err(RolloverError::Conflict(next));
            }
        }

        let day = next.first_day();
        let record = MonthRecord {
            incomes: self.carry_entries(source.incomes, day),
            fixed_expenses: self.carry_entries(source.fixed_expenses, day),
            credit_cards: self.carry_debts(source.credit_cards, day),
            loans: self.carry_debts(source.loans, day),
            purchases: Vec::new(),
            savings_goals: source
                .savings_goals
                .into_iter()
                .map(|goal| SavingsGoal {
                    id: self.fresh_id(),
                    date: day,
                    ..goal
                })
                .collect(),
        };
        info!("closed {from} into {next} ({} entities)", record.len());
        self.state.ledger.insert(next, record);
        self.persist();
        Ok(next)
    }

    fn carry_entries(&mut self, entries: Vec<Entry>, day: NaiveDate) -> Vec<Entry> {
        entries
            .into_iter()
            .map(|e| Entry {
                id: self.fresh_id(),
                date: day,
                paid_this_month: false,
                ..e
            })
            .collect()
    }

    fn carry_debts(&mut self, debts: Vec<Debt>, day: NaiveDate) -> Vec<Debt> {
        debts
            .into_iter()
            .map(|mut d| {
                if d.paid_this_month {
                    d.paid_term_count = (d.paid_term_count + 1).min(d.term_count);
                }
                d.id = self.fresh_id();
                d.date = day;
                d.paid_this_month = false;
                settle_installment(&mut d);
                d
            })
            .collect()
    }

    /// Validate `draft` and append it to its collection in `key`.
    pub fn add(&mut self, key: MonthKey, draft: Draft) -> Result<EntityId, ValidationError> {
        draft.validate()?;
        let kind = draft.kind();
        let id = self.fresh_id();
        let day = key.first_day();
        let month = self.get(key);
        match draft {
            Draft::Income(e) | Draft::FixedExpense(e) | Draft::Purchase(e) => {
                let entry = Entry {
                    id,
                    name: e.name,
                    amount: e.amount,
                    category: category_or_default(e.category, kind),
                    date: e.date.unwrap_or(day),
                    paid_this_month: false,
                };
                if let Some(list) = month.entries_mut(kind) {
                    list.push(entry);
                }
            }
            Draft::CreditCard(d) | Draft::Loan(d) => {
                let mut debt = Debt {
                    id,
                    name: d.name,
                    principal: d.principal,
                    term_count: d.term_count,
                    paid_term_count: d.paid_term_count,
                    monthly_rate: d.monthly_rate,
                    guarantee_fee_rate: d.guarantee_fee_rate,
                    guarantee_fee_tax_rate: d.guarantee_fee_tax_rate,
                    monthly_installment: 0,
                    category: category_or_default(d.category, kind),
                    date: day,
                    paid_this_month: false,
                };
                settle_installment(&mut debt);
                if let Some(list) = month.debts_mut(kind) {
                    list.push(debt);
                }
            }
            Draft::SavingsGoal(g) => month.savings_goals.push(SavingsGoal {
                id,
                name: g.name,
                target: g.target,
                current: g.current,
                date: day,
            }),
        }
        debug!("added {} {id} to {key}", kind.label());
        self.persist();
        Ok(id)
    }

    /// Replace the editable fields of entity `id`. The id, the paid flag and,
    /// for recurring items, the date are kept. Returns `Ok(false)` when there
    /// is nothing to edit.
    pub fn update(
        &mut self,
        key: MonthKey,
        id: EntityId,
        draft: Draft,
    ) -> Result<bool, ValidationError> {
        draft.validate()?;
        let kind = draft.kind();
        let Some(month) = self.state.ledger.get_mut(&key) else {
            debug!("no month {key}; nothing to edit");
            return Ok(false);
        };
        let found = match draft {
            Draft::Income(e) | Draft::FixedExpense(e) | Draft::Purchase(e) => month
                .entries_mut(kind)
                .and_then(|list| find_mut(list, id))
                .map(|entry| patch_entry(entry, e))
                .is_some(),
            Draft::CreditCard(d) | Draft::Loan(d) => month
                .debts_mut(kind)
                .and_then(|list| find_mut(list, id))
                .map(|debt| patch_debt(debt, d))
                .is_some(),
            Draft::SavingsGoal(g) => find_mut(&mut month.savings_goals, id)
                .map(|goal| patch_goal(goal, g))
                .is_some(),
        };
        if found {
            self.persist();
        } else {
            debug!("no {} {id} in {key}; nothing to edit", kind.label());
        }
        Ok(found)
    }

    /// Delete entity `id` from `kind` in `key`. Unknown ids are ignored.
    pub fn remove(&mut self, key: MonthKey, kind: CollectionKind, id: EntityId) -> bool {
        let Some(month) = self.state.ledger.get_mut(&key) else {
            return false;
        };
        let removed = match kind {
            CollectionKind::Incomes | CollectionKind::FixedExpenses | CollectionKind::Purchases => {
                month
                    .entries_mut(kind)
                    .is_some_and(|list| remove_by_id(list, id))
            }
            CollectionKind::CreditCards | CollectionKind::Loans => month
                .debts_mut(kind)
                .is_some_and(|list| remove_by_id(list, id)),
            CollectionKind::SavingsGoals => remove_by_id(&mut month.savings_goals, id),
        };
        if removed {
            self.persist();
        } else {
            debug!("no {} {id} in {key}; nothing to remove", kind.label());
        }
        removed
    }

    /// Flip the paid flag and return its new value; `None` when the entity is
    /// unknown or its kind has no paid flag.
    pub fn toggle_paid(
        &mut self,
        key: MonthKey,
        kind: CollectionKind,
        id: EntityId,
    ) -> Option<bool> {
        let month = self.state.ledger.get_mut(&key)?;
        let flag = match kind {
            CollectionKind::Incomes | CollectionKind::FixedExpenses | CollectionKind::Purchases => {
                month
                    .entries_mut(kind)
                    .and_then(|list| find_mut(list, id))
                    .map(|e| &mut e.paid_this_month)
            }
            CollectionKind::CreditCards | CollectionKind::Loans => month
                .debts_mut(kind)
                .and_then(|list| find_mut(list, id))
                .map(|d| &mut d.paid_this_month),
            CollectionKind::SavingsGoals => None,
        }?;
        *flag = !*flag;
        let now = *flag;
        self.persist();
        Some(now)
    }

    /// Add `amount` to a savings goal. Goals only ever grow this way; a deposit
    /// that would overflow the balance is refused and changes nothing.
    pub fn deposit(
        &mut self,
        key: MonthKey,
        id: EntityId,
        amount: Money,
    ) -> Result<bool, ValidationError> {
        if amount <= 0 {
            return Err(ValidationError::NonPositiveDeposit);
        }
        let goal = self
            .state
            .ledger
            .get_mut(&key)
            .and_then(|m| find_mut(&mut m.savings_goals, id));
        let Some(goal) = goal else {
            debug!("no savings goal {id} in {key}");
            return Ok(false);
        };
        goal.current = goal
            .current
            .checked_add(amount)
            .ok_or(ValidationError::DepositOverflow)?;
        self.persist();
        Ok(true)
    }

    pub fn find_entry(&self, key: MonthKey, kind: CollectionKind, id: EntityId) -> Option<&Entry> {
        self.peek(key)?
            .entries(kind)?
            .iter()
            .find(|e| e.id == id)
    }

    pub fn find_debt(&self, key: MonthKey, kind: CollectionKind, id: EntityId) -> Option<&Debt> {
        self.peek(key)?.debts(kind)?.iter().find(|d| d.id == id)
    }

    pub fn find_goal(&self, key: MonthKey, id: EntityId) -> Option<&SavingsGoal> {
        self.peek(key)?.savings_goals.iter().find(|g| g.id == id)
    }

    /// Refresh cached installments of one month, if it exists.
    pub fn recalculate(&mut self, key: MonthKey) {
        if let Some(month) = self.state.ledger.get_mut(&key) {
            recalculate(month);
            self.persist();
        }
    }

    pub fn recalculate_all(&mut self) {
        self.state.ledger.values_mut().for_each(recalculate);
        self.persist();
    }

    /// Drop every month. Ids keep counting up.
    pub fn reset(&mut self) {
        info!("reset ledger ({} months)", self.state.ledger.len());
        self.state.ledger.clear();
        self.state.current_month = None;
        self.persist();
    }

    pub fn current_month(&self) -> Option<MonthKey> {
        self.state.current_month
    }

    pub fn select_month(&mut self, key: MonthKey) {
        self.state.current_month = Some(key);
        self.persist();
    }

    pub fn currency(&self) -> &str {
        &self.state.currency
    }

    pub fn set_currency(&mut self, code: &str) {
        self.state.currency = code.trim().to_uppercase();
        self.persist();
    }

    /// Fill `key` with a demo household. Returns false if the month already
    /// holds data.
    pub fn seed_sample(&mut self, key: MonthKey) -> Result<bool, ValidationError> {
        if self.peek(key).is_some_and(|m| !m.is_empty()) {
            return Ok(false);
        }
        let entry = |name: &str, amount: Money, category: &str, date: Option<NaiveDate>| {
            EntryDraft {
                name: name.into(),
                amount,
                category: Some(category.into()),
                date,
            }
        };
        self.add(key, Draft::Income(entry("Salary", 3_500_000, "Work", None)))?;
        self.add(
            key,
            Draft::FixedExpense(entry("Rent", 1_200_000, "Housing", None)),
        )?;
        self.add(
            key,
            Draft::Loan(DebtDraft {
                name: "Car loan".into(),
                principal: 24_200_000,
                term_count: 60,
                paid_term_count: 0,
                monthly_rate: dec!(0.01842),
                guarantee_fee_rate: dec!(0),
                guarantee_fee_tax_rate: dec!(0),
                category: None,
            }),
        )?;
        let tenth = key.first_day().with_day0(9);
        self.add(
            key,
            Draft::Purchase(entry("Groceries", 400_000, "Food", tenth)),
        )?;
        self.add(
            key,
            Draft::SavingsGoal(GoalDraft {
                name: "Emergency fund".into(),
                target: 5_000_000,
                current: 1_200_000,
            }),
        )?;
        Ok(true)
    }

    fn fresh_id(&mut self) -> EntityId {
        let id = self.state.next_id;
        self.state.next_id += 1;
        id
    }

    /// Save the whole state. Failures are logged; memory stays authoritative.
    pub fn persist(&self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(&self.state) {
                warn!("ledger not saved: {e:#}");
            }
        }
    }
}

fn category_or_default(category: Option<String>, kind: CollectionKind) -> String {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .or_else(|| kind.default_category().map(str::to_string))
        .unwrap_or_default()
}

fn find_mut<T: Identified>(items: &mut [T], id: EntityId) -> Option<&mut T> {
    items.iter_mut().find(|x| x.id() == id)
}

fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: EntityId) -> bool {
    match items.iter().position(|x| x.id() == id) {
        Some(pos) => {
            items.remove(pos);
            true
        }
        None => false,
    }
}

fn patch_entry(entry: &mut Entry, draft: EntryDraft) {
    entry.name = draft.name;
    entry.amount = draft.amount;
    if let Some(c) = draft.category.filter(|c| !c.trim().is_empty()) {
        entry.category = c.trim().to_string();
    }
    if let Some(date) = draft.date {
        entry.date = date;
    }
}

fn patch_debt(debt: &mut Debt, draft: DebtDraft) {
    debt.name = draft.name;
    debt.principal = draft.principal;
    debt.term_count = draft.term_count;
    debt.paid_term_count = draft.paid_term_count;
    debt.monthly_rate = draft.monthly_rate;
    debt.guarantee_fee_rate = draft.guarantee_fee_rate;
    debt.guarantee_fee_tax_rate = draft.guarantee_fee_tax_rate;
    if let Some(c) = draft.category.filter(|c| !c.trim().is_empty()) {
        debt.category = c.trim().to_string();
    }
    settle_installment(debt);
}

fn patch_goal(goal: &mut SavingsGoal, draft: GoalDraft) {
    goal.name = draft.name;
    goal.target = draft.target;
    goal.current = draft.current;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn ids_never_repeat() {
        let mut store = MonthStore::in_memory();
        let a = store.fresh_id();
        let b = store.fresh_id();
        assert!(b > a);
    }

    #[test]
    fn empty_month_when_nothing_precedes() {
        let mut store = MonthStore::in_memory();
        assert!(store.get(key("2025-08")).is_empty());
        assert!(store.contains(key("2025-08")));
    }

    #[test]
    fn edit_keeps_id_and_paid_flag() {
        let mut store = MonthStore::in_memory();
        let k = key("2025-08");
        let id = store
            .add(
                k,
                Draft::FixedExpense(EntryDraft {
                    name: "Rent".into(),
                    amount: 1_000,
                    category: None,
                    date: None,
                }),
            )
            .unwrap();
        store.toggle_paid(k, CollectionKind::FixedExpenses, id);
        let edited = store
            .update(
                k,
                id,
                Draft::FixedExpense(EntryDraft {
                    name: "Rent".into(),
                    amount: 1_100,
                    category: Some("  ".into()),
                    date: None,
                }),
            )
            .unwrap();
        assert!(edited);
        let e = store.find_entry(k, CollectionKind::FixedExpenses, id).unwrap();
        assert_eq!(e.amount, 1_100);
        assert_eq!(e.category, "Housing");
        assert!(e.paid_this_month);
    }

    #[test]
    fn next_id_recovers_from_stale_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut state = AppState::default();
        let mut month = MonthRecord::default();
        month.savings_goals.push(SavingsGoal {
            id: 41,
            name: "Trip".into(),
            target: 10,
            current: 0,
            date: key("2025-08").first_day(),
        });
        state.ledger.insert(key("2025-08"), month);
        state.next_id = 3;
        Storage::at(&path).save(&state).unwrap();

        let store = MonthStore::open(Storage::at(&path)).unwrap();
        assert_eq!(store.state().next_id, 42);
    }
}
