// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{MonthKeyError, ValidationError};

/// Whole currency units; the ledger never stores fractions of a unit.
pub type Money = i64;

pub type EntityId = u64;

/// All materialized months, iterated in chronological order.
pub type Ledger = BTreeMap<MonthKey, MonthRecord>;

/// A calendar month, written `YYYY-MM`. Backed by the first day of the month so
/// ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| MonthKeyError::Invalid(format!("{year}-{month:02}")))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// January rolls back to December of the previous year.
    pub fn previous(&self) -> Self {
        self.0
            .checked_sub_months(Months::new(1))
            .map(Self)
            .unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.0
            .checked_add_months(Months::new(1))
            .map(Self)
            .unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| MonthKeyError::Invalid(s.to_string()))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// The six collections tracked for every month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    Incomes,
    FixedExpenses,
    CreditCards,
    Loans,
    Purchases,
    SavingsGoals,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 6] = [
        CollectionKind::Incomes,
        CollectionKind::FixedExpenses,
        CollectionKind::CreditCards,
        CollectionKind::Loans,
        CollectionKind::Purchases,
        CollectionKind::SavingsGoals,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CollectionKind::Incomes => "income",
            CollectionKind::FixedExpenses => "fixed expense",
            CollectionKind::CreditCards => "credit card",
            CollectionKind::Loans => "loan",
            CollectionKind::Purchases => "purchase",
            CollectionKind::SavingsGoals => "savings goal",
        }
    }

    /// Category given to new items left uncategorized. Goals carry none.
    pub fn default_category(&self) -> Option<&'static str> {
        match self {
            CollectionKind::Incomes => Some("Work"),
            CollectionKind::FixedExpenses => Some("Housing"),
            CollectionKind::CreditCards => Some("Credit card"),
            CollectionKind::Loans => Some("Loan"),
            CollectionKind::Purchases => Some("General"),
            CollectionKind::SavingsGoals => None,
        }
    }

    pub fn has_paid_flag(&self) -> bool {
        !matches!(self, CollectionKind::SavingsGoals)
    }
}

/// Anything stored in a month collection.
pub trait Identified {
    fn id(&self) -> EntityId;
}

impl Identified for Entry {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Identified for Debt {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Identified for SavingsGoal {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A plain dated amount: an income, a fixed expense or a one-off purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntityId,
    pub name: String,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub paid_this_month: bool,
}

/// An amortizing debt: a credit card purchase in installments or a consumer loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: EntityId,
    pub name: String,
    pub principal: Money,
    pub term_count: u32,
    #[serde(default)]
    pub paid_term_count: u32,
    pub monthly_rate: Decimal,
    #[serde(default)]
    pub guarantee_fee_rate: Decimal,
    #[serde(default)]
    pub guarantee_fee_tax_rate: Decimal,
    /// Cached; refreshed only by [`crate::recalc::recalculate`] or an edit.
    #[serde(default)]
    pub monthly_installment: Money,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub paid_this_month: bool,
}

impl Debt {
    pub fn is_retired(&self) -> bool {
        self.term_count > 0 && self.paid_term_count >= self.term_count
    }

    pub fn remaining_terms(&self) -> u32 {
        self.term_count.saturating_sub(self.paid_term_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: EntityId,
    pub name: String,
    pub target: Money,
    pub current: Money,
    pub date: NaiveDate,
}

impl SavingsGoal {
    /// Percent of the target reached, uncapped; zero when there is no target.
    pub fn progress_pct(&self) -> Decimal {
        if self.target <= 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.current) * Decimal::ONE_HUNDRED / Decimal::from(self.target)
    }
}

/// Everything recorded for one month. Each collection keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthRecord {
    pub incomes: Vec<Entry>,
    pub fixed_expenses: Vec<Entry>,
    pub credit_cards: Vec<Debt>,
    pub loans: Vec<Debt>,
    pub purchases: Vec<Entry>,
    pub savings_goals: Vec<SavingsGoal>,
}

impl MonthRecord {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.incomes.len()
            + self.fixed_expenses.len()
            + self.credit_cards.len()
            + self.loans.len()
            + self.purchases.len()
            + self.savings_goals.len()
    }

    /// Entry-shaped collection for `kind`, `None` for debts and goals.
    pub fn entries(&self, kind: CollectionKind) -> Option<&Vec<Entry>> {
        match kind {
            CollectionKind::Incomes => Some(&self.incomes),
            CollectionKind::FixedExpenses => Some(&self.fixed_expenses),
            CollectionKind::Purchases => Some(&self.purchases),
            _ => None,
        }
    }

    pub fn entries_mut(&mut self, kind: CollectionKind) -> Option<&mut Vec<Entry>> {
        match kind {
            CollectionKind::Incomes => Some(&mut self.incomes),
            CollectionKind::FixedExpenses => Some(&mut self.fixed_expenses),
            CollectionKind::Purchases => Some(&mut self.purchases),
            _ => None,
        }
    }

    pub fn debts(&self, kind: CollectionKind) -> Option<&Vec<Debt>> {
        match kind {
            CollectionKind::CreditCards => Some(&self.credit_cards),
            CollectionKind::Loans => Some(&self.loans),
            _ => None,
        }
    }

    pub fn debts_mut(&mut self, kind: CollectionKind) -> Option<&mut Vec<Debt>> {
        match kind {
            CollectionKind::CreditCards => Some(&mut self.credit_cards),
            CollectionKind::Loans => Some(&mut self.loans),
            _ => None,
        }
    }

    pub fn all_debts(&self) -> impl Iterator<Item = &Debt> {
        self.credit_cards.iter().chain(self.loans.iter())
    }

    pub fn all_debts_mut(&mut self) -> impl Iterator<Item = &mut Debt> {
        self.credit_cards.iter_mut().chain(self.loans.iter_mut())
    }

    pub fn max_id(&self) -> Option<EntityId> {
        let entries = self
            .incomes
            .iter()
            .chain(self.fixed_expenses.iter())
            .chain(self.purchases.iter())
            .map(Identified::id);
        let debts = self.all_debts().map(Identified::id);
        let goals = self.savings_goals.iter().map(Identified::id);
        entries.chain(debts).chain(goals).max()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub name: String,
    pub amount: Money,
    pub category: Option<String>,
    /// Defaults to the first day of the target month.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtDraft {
    pub name: String,
    pub principal: Money,
    pub term_count: u32,
    pub paid_term_count: u32,
    pub monthly_rate: Decimal,
    pub guarantee_fee_rate: Decimal,
    pub guarantee_fee_tax_rate: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub name: String,
    pub target: Money,
    pub current: Money,
}

impl From<&Entry> for EntryDraft {
    fn from(e: &Entry) -> Self {
        Self {
            name: e.name.clone(),
            amount: e.amount,
            category: Some(e.category.clone()),
            date: Some(e.date),
        }
    }
}

impl From<&Debt> for DebtDraft {
    fn from(d: &Debt) -> Self {
        Self {
            name: d.name.clone(),
            principal: d.principal,
            term_count: d.term_count,
            paid_term_count: d.paid_term_count,
            monthly_rate: d.monthly_rate,
            guarantee_fee_rate: d.guarantee_fee_rate,
            guarantee_fee_tax_rate: d.guarantee_fee_tax_rate,
            category: Some(d.category.clone()),
        }
    }
}

impl From<&SavingsGoal> for GoalDraft {
    fn from(g: &SavingsGoal) -> Self {
        Self {
            name: g.name.clone(),
            target: g.target,
            current: g.current,
        }
    }
}

/// User input for creating or editing an entity, tagged with the collection it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Income(EntryDraft),
    FixedExpense(EntryDraft),
    Purchase(EntryDraft),
    CreditCard(DebtDraft),
    Loan(DebtDraft),
    SavingsGoal(GoalDraft),
}

/// Monthly rate bounds accepted at entry time.
pub const MAX_MONTHLY_RATE: Decimal = dec!(0.05);
/// Upper bound for both the guarantee fee and its tax.
pub const MAX_GUARANTEE_RATE: Decimal = dec!(0.30);
/// Longest debt accepted: 100 years of monthly installments.
pub const MAX_TERM_COUNT: u32 = 1_200;

impl Draft {
    pub fn kind(&self) -> CollectionKind {
        match self {
            Draft::Income(_) => CollectionKind::Incomes,
            Draft::FixedExpense(_) => CollectionKind::FixedExpenses,
            Draft::Purchase(_) => CollectionKind::Purchases,
            Draft::CreditCard(_) => CollectionKind::CreditCards,
            Draft::Loan(_) => CollectionKind::Loans,
            Draft::SavingsGoal(_) => CollectionKind::SavingsGoals,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Draft::Income(e) | Draft::FixedExpense(e) | Draft::Purchase(e) => {
                if e.amount < 0 {
                    return Err(ValidationError::NegativeAmount);
                }
            }
            Draft::CreditCard(d) => {
                if !d.guarantee_fee_rate.is_zero() || !d.guarantee_fee_tax_rate.is_zero() {
                    return Err(ValidationError::GuaranteeOnCreditCard);
                }
                validate_debt(d)?;
            }
            Draft::Loan(d) => validate_debt(d)?,
            Draft::SavingsGoal(g) => {
                if g.target <= 0 {
                    return Err(ValidationError::NonPositiveTarget);
                }
                if g.current < 0 {
                    return Err(ValidationError::NegativeAmount);
                }
            }
        }
        Ok(())
    }
}

fn validate_debt(d: &DebtDraft) -> Result<(), ValidationError> {
    if d.principal <= 0 {
        return Err(ValidationError::NonPositivePrincipal);
    }
    if d.term_count == 0 {
        return Err(ValidationError::ZeroTerms);
    }
    if d.term_count > MAX_TERM_COUNT {
        return Err(ValidationError::TooManyTerms {
            total: d.term_count,
            max: MAX_TERM_COUNT,
        });
    }
    if d.paid_term_count > d.term_count {
        return Err(ValidationError::PaidTermsExceedTerms {
            paid: d.paid_term_count,
            total: d.term_count,
        });
    }
    validate_rate(d.monthly_rate)?;
    if d.guarantee_fee_rate < Decimal::ZERO || d.guarantee_fee_rate > MAX_GUARANTEE_RATE {
        return Err(ValidationError::GuaranteeFeeOutOfRange(d.guarantee_fee_rate));
    }
    if d.guarantee_fee_tax_rate < Decimal::ZERO || d.guarantee_fee_tax_rate > MAX_GUARANTEE_RATE
    {
        return Err(ValidationError::GuaranteeTaxOutOfRange(
            d.guarantee_fee_tax_rate,
        ));
    }
    Ok(())
}

pub fn validate_rate(rate: Decimal) -> Result<(), ValidationError> {
    if rate <= Decimal::ZERO || rate > MAX_MONTHLY_RATE {
        return Err(ValidationError::RateOutOfRange(rate));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan() -> DebtDraft {
        DebtDraft {
            name: "Car".into(),
            principal: 24_200_000,
            term_count: 60,
            paid_term_count: 0,
            monthly_rate: dec!(0.01842),
            guarantee_fee_rate: Decimal::ZERO,
            guarantee_fee_tax_rate: Decimal::ZERO,
            category: None,
        }
    }

    #[test]
    fn month_key_wraps_year_boundaries() {
        let jan: MonthKey = "2025-01".parse().unwrap();
        assert_eq!(jan.previous().to_string(), "2024-12");
        let dec_: MonthKey = "2024-12".parse().unwrap();
        assert_eq!(dec_.next().to_string(), "2025-01");
        assert_eq!(jan.first_day().to_string(), "2025-01-01");
    }

    #[test]
    fn month_key_rejects_garbage() {
        assert!("2025-13".parse::<MonthKey>().is_err());
        assert!("2025".parse::<MonthKey>().is_err());
        assert!("abcd-ef".parse::<MonthKey>().is_err());
    }

    #[test]
    fn month_keys_order_chronologically() {
        let mut keys: Vec<MonthKey> = ["2025-10", "2024-12", "2025-02"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        keys.sort();
        let out: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(out, ["2024-12", "2025-02", "2025-10"]);
    }

    #[test]
    fn rate_bounds_are_inclusive_at_five_percent() {
        assert!(validate_rate(dec!(0.05)).is_ok());
        assert_eq!(
            validate_rate(dec!(0.0501)),
            Err(ValidationError::RateOutOfRange(dec!(0.0501)))
        );
        assert!(validate_rate(Decimal::ZERO).is_err());
    }

    #[test]
    fn loan_guarantee_limits() {
        let mut d = loan();
        d.guarantee_fee_rate = dec!(0.30);
        d.guarantee_fee_tax_rate = dec!(0.19);
        assert!(Draft::Loan(d.clone()).validate().is_ok());
        d.guarantee_fee_rate = dec!(0.31);
        assert_eq!(
            Draft::Loan(d).validate(),
            Err(ValidationError::GuaranteeFeeOutOfRange(dec!(0.31)))
        );
    }

    #[test]
    fn cards_refuse_guarantee_fee() {
        let mut d = loan();
        d.guarantee_fee_rate = dec!(0.10);
        assert_eq!(
            Draft::CreditCard(d).validate(),
            Err(ValidationError::GuaranteeOnCreditCard)
        );
    }

    #[test]
    fn paid_terms_cannot_exceed_terms() {
        let mut d = loan();
        d.paid_term_count = 61;
        assert!(matches!(
            Draft::Loan(d).validate(),
            Err(ValidationError::PaidTermsExceedTerms { paid: 61, total: 60 })
        ));
    }

    #[test]
    fn term_count_is_capped() {
        let mut d = loan();
        d.term_count = MAX_TERM_COUNT;
        assert!(Draft::Loan(d.clone()).validate().is_ok());
        d.term_count = MAX_TERM_COUNT + 1;
        assert_eq!(
            Draft::CreditCard(d.clone()).validate(),
            Err(ValidationError::TooManyTerms {
                total: MAX_TERM_COUNT + 1,
                max: MAX_TERM_COUNT
            })
        );
        d.term_count = u32::MAX;
        d.paid_term_count = 20_000_000;
        assert!(Draft::Loan(d).validate().is_err());
    }

    #[test]
    fn goals_have_no_default_category() {
        assert_eq!(CollectionKind::SavingsGoals.default_category(), None);
        assert_eq!(CollectionKind::Loans.default_category(), Some("Loan"));
    }

    #[test]
    fn goal_progress() {
        let g = SavingsGoal {
            id: 1,
            name: "Emergencies".into(),
            target: 5_000_000,
            current: 1_200_000,
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        };
        assert_eq!(g.progress_pct(), dec!(24));
    }
}
