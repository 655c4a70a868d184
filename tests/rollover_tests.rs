// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use paydown::error::RolloverError;
use paydown::models::{CollectionKind, DebtDraft, Draft, EntryDraft, GoalDraft, MonthKey};
use paydown::store::MonthStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn key(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn entry(name: &str, amount: i64) -> EntryDraft {
    EntryDraft {
        name: name.into(),
        amount,
        category: None,
        date: None,
    }
}

fn loan(name: &str, terms: u32, paid: u32) -> DebtDraft {
    DebtDraft {
        name: name.into(),
        principal: 24_200_000,
        term_count: terms,
        paid_term_count: paid,
        monthly_rate: dec!(0.01842),
        guarantee_fee_rate: Decimal::ZERO,
        guarantee_fee_tax_rate: Decimal::ZERO,
        category: None,
    }
}

/// August with one of everything; the car loan is paid, the card is not.
fn august(store: &mut MonthStore) -> (u64, u64) {
    let k = key("2025-08");
    store.add(k, Draft::Income(entry("Salary", 3_500_000))).unwrap();
    store.add(k, Draft::FixedExpense(entry("Rent", 1_200_000))).unwrap();
    store.add(k, Draft::Purchase(entry("Groceries", 400_000))).unwrap();
    let car = store.add(k, Draft::Loan(loan("Car", 60, 0))).unwrap();
    let card = store
        .add(
            k,
            Draft::CreditCard(DebtDraft {
                principal: 1_200_000,
                term_count: 12,
                monthly_rate: dec!(0.02),
                ..loan("Visa", 12, 3)
            }),
        )
        .unwrap();
    store
        .add(
            k,
            Draft::SavingsGoal(GoalDraft {
                name: "Emergency fund".into(),
                target: 5_000_000,
                current: 1_200_000,
            }),
        )
        .unwrap();
    assert_eq!(store.toggle_paid(k, CollectionKind::Loans, car), Some(true));
    (car, card)
}

#[test]
fn close_month_advances_only_paid_debts() {
    let mut store = MonthStore::in_memory();
    august(&mut store);

    let next = store.close_month(key("2025-08"), false).unwrap();
    assert_eq!(next, key("2025-09"));

    let sept = store.peek(next).unwrap();
    assert_eq!(sept.loans[0].paid_term_count, 1);
    assert_eq!(sept.credit_cards[0].paid_term_count, 3);
    assert!(sept.all_debts().all(|d| !d.paid_this_month));
    assert_eq!(sept.loans[0].monthly_installment, 669_809);
}

#[test]
fn close_month_drops_purchases_and_keeps_goal_balances() {
    let mut store = MonthStore::in_memory();
    august(&mut store);
    let next = store.close_month(key("2025-08"), false).unwrap();

    let sept = store.peek(next).unwrap();
    assert!(sept.purchases.is_empty());
    assert_eq!(sept.incomes.len(), 1);
    assert_eq!(sept.fixed_expenses.len(), 1);
    assert_eq!(sept.savings_goals[0].current, 1_200_000);
    assert!(sept.incomes.iter().all(|e| e.date == next.first_day()));
}

#[test]
fn closed_month_entities_get_fresh_ids() {
    let mut store = MonthStore::in_memory();
    august(&mut store);
    let aug_ids: Vec<u64> = store
        .peek(key("2025-08"))
        .unwrap()
        .all_debts()
        .map(|d| d.id)
        .collect();
    let next = store.close_month(key("2025-08"), false).unwrap();
    let sept = store.peek(next).unwrap();
    assert!(sept.all_debts().all(|d| !aug_ids.contains(&d.id)));
}

#[test]
fn close_month_refuses_to_clobber_without_overwrite() {
    let mut store = MonthStore::in_memory();
    august(&mut store);
    store
        .add(key("2025-09"), Draft::Purchase(entry("Shoes", 200_000)))
        .unwrap();
    let before = store.peek(key("2025-09")).cloned();

    let err = store.close_month(key("2025-08"), false).unwrap_err();
    assert_eq!(err, RolloverError::Conflict(key("2025-09")));
    assert_eq!(store.peek(key("2025-09")).cloned(), before);

    store.close_month(key("2025-08"), true).unwrap();
    let sept = store.peek(key("2025-09")).unwrap();
    assert!(sept.purchases.is_empty());
    assert_eq!(sept.loans[0].paid_term_count, 1);
}

#[test]
fn close_month_into_empty_existing_month_is_allowed() {
    let mut store = MonthStore::in_memory();
    august(&mut store);
    store.add(key("2025-09"), Draft::Income(entry("Bonus", 1))).unwrap();
    let sept = store.peek(key("2025-09")).unwrap().clone();
    for e in &sept.incomes {
        store.remove(key("2025-09"), CollectionKind::Incomes, e.id);
    }
    for e in &sept.fixed_expenses {
        store.remove(key("2025-09"), CollectionKind::FixedExpenses, e.id);
    }
    for e in &sept.purchases {
        store.remove(key("2025-09"), CollectionKind::Purchases, e.id);
    }
    for d in &sept.credit_cards {
        store.remove(key("2025-09"), CollectionKind::CreditCards, d.id);
    }
    for d in &sept.loans {
        store.remove(key("2025-09"), CollectionKind::Loans, d.id);
    }
    for g in &sept.savings_goals {
        store.remove(key("2025-09"), CollectionKind::SavingsGoals, g.id);
    }
    assert!(store.peek(key("2025-09")).unwrap().is_empty());
    assert!(store.close_month(key("2025-08"), false).is_ok());
}

#[test]
fn close_missing_month_fails() {
    let mut store = MonthStore::in_memory();
    let err = store.close_month(key("2024-12"), false).unwrap_err();
    assert_eq!(err, RolloverError::SourceMissing(key("2024-12")));
    assert!(!store.contains(key("2025-01")));
}

#[test]
fn december_closes_into_january() {
    let mut store = MonthStore::in_memory();
    store
        .add(key("2024-12"), Draft::Income(entry("Salary", 10)))
        .unwrap();
    assert_eq!(
        store.close_month(key("2024-12"), false).unwrap(),
        key("2025-01")
    );
}

#[test]
fn last_paid_term_retires_the_debt() {
    let mut store = MonthStore::in_memory();
    let k = key("2025-08");
    let id = store.add(k, Draft::Loan(loan("Almost done", 12, 11))).unwrap();
    store.toggle_paid(k, CollectionKind::Loans, id);

    let next = store.close_month(k, false).unwrap();
    let d = &store.peek(next).unwrap().loans[0];
    assert_eq!(d.paid_term_count, 12);
    assert_eq!(d.monthly_installment, 0);

    // Paying a retired debt again never pushes it past its term count.
    let id = d.id;
    store.toggle_paid(next, CollectionKind::Loans, id);
    let after = store.close_month(next, false).unwrap();
    assert_eq!(store.peek(after).unwrap().loans[0].paid_term_count, 12);
}
