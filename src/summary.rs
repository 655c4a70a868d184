// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::models::{Debt, Entry, Ledger, Money, MonthKey, MonthRecord};

/// Month totals. Every expense counts whether or not it is marked paid; the
/// unpaid share is reported separately in `pending_expenses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_income: Money,
    pub total_fixed: Money,
    pub total_card_installments: Money,
    pub total_loan_installments: Money,
    pub total_purchases: Money,
    pub total_savings_balance: Money,
    pub total_expenses: Money,
    pub pending_expenses: Money,
    pub free_cash_flow: Money,
    /// Fraction of income left over; 0 without income.
    pub savings_rate: Decimal,
}

fn sum_entries(entries: &[Entry]) -> Money {
    entries.iter().map(|e| e.amount).sum()
}

fn sum_installments(debts: &[Debt]) -> Money {
    debts.iter().map(|d| d.monthly_installment).sum()
}

/// Fold a month into totals. Reads cached installments as they are, so run
/// [`crate::recalc::recalculate`] first.
pub fn summarize(month: &MonthRecord) -> Totals {
    let total_income = sum_entries(&month.incomes);
    let total_fixed = sum_entries(&month.fixed_expenses);
    let total_card_installments = sum_installments(&month.credit_cards);
    let total_loan_installments = sum_installments(&month.loans);
    let total_purchases = sum_entries(&month.purchases);
    let total_savings_balance = month.savings_goals.iter().map(|g| g.current).sum();
    let total_expenses =
        total_fixed + total_card_installments + total_loan_installments + total_purchases;

    let pending_expenses = month
        .fixed_expenses
        .iter()
        .chain(month.purchases.iter())
        .filter(|e| !e.paid_this_month)
        .map(|e| e.amount)
        .sum::<Money>()
        + month
            .all_debts()
            .filter(|d| !d.paid_this_month)
            .map(|d| d.monthly_installment)
            .sum::<Money>();

    let free_cash_flow = total_income - total_expenses;
    let savings_rate = if total_income == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(free_cash_flow) / Decimal::from(total_income)
    };

    Totals {
        total_income,
        total_fixed,
        total_card_installments,
        total_loan_installments,
        total_purchases,
        total_savings_balance,
        total_expenses,
        pending_expenses,
        free_cash_flow,
        savings_rate,
    }
}

/// Totals for every materialized month, oldest first.
pub fn history(ledger: &Ledger) -> Vec<(MonthKey, Totals)> {
    ledger
        .iter()
        .map(|(key, month)| (*key, summarize(month)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub title: String,
    pub detail: String,
}

const TARGET_SAVINGS_RATE: Decimal = dec!(0.10);

/// Short recommendations derived from a month's totals.
pub fn advice(totals: &Totals) -> Vec<Advice> {
    let mut out = Vec::new();
    if totals.free_cash_flow < 0 {
        out.push(Advice {
            title: "Overspending".into(),
            detail: "Expenses exceed income. Cut non-essentials first.".into(),
        });
    }
    if totals.savings_rate < TARGET_SAVINGS_RATE {
        let pct = (totals.savings_rate * Decimal::ONE_HUNDRED).round_dp(1);
        out.push(Advice {
            title: "Save more".into(),
            detail: format!("You are saving {:.1}% of income. Aim for 20%.", pct),
        });
    }
    out.push(Advice {
        title: "50/30/20".into(),
        detail: "50% needs, 30% wants, 20% savings and investment.".into(),
    });
    out.push(Advice {
        title: "Credit cards".into(),
        detail: "Pay the full statement balance to avoid interest.".into(),
    });
    out
}
