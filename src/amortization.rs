// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! French-system (fixed payment) installments.
//!
//! The base installment is `P * i(1 + i)^n / ((1 + i)^n - 1)`, or `P / n` when
//! the rate is zero. Loans may add a guarantee fee spread evenly over the terms,
//! itself taxed. The total is rounded half-up to whole currency units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use serde::Serialize;

use crate::models::{Debt, Money, MAX_TERM_COUNT};

/// Monthly installment for a debt of `principal` over `term_count` terms.
///
/// Returns 0 when `term_count` is 0. Never fails.
pub fn compute_installment(
    principal: Money,
    monthly_rate: Decimal,
    term_count: u32,
    guarantee_fee_rate: Decimal,
    guarantee_fee_tax_rate: Decimal,
) -> Money {
    if term_count == 0 {
        return 0;
    }
    let principal = Decimal::from(principal);
    let base = base_installment(principal, monthly_rate, term_count);
    let (fee, fee_tax) = guarantee_components(
        principal,
        term_count,
        guarantee_fee_rate,
        guarantee_fee_tax_rate,
    );
    to_money(base + fee + fee_tax)
}

/// Installment for `debt` from its current terms, ignoring the cached value and
/// paid progress.
pub fn installment_for(debt: &Debt) -> Money {
    compute_installment(
        debt.principal,
        debt.monthly_rate,
        debt.term_count,
        debt.guarantee_fee_rate,
        debt.guarantee_fee_tax_rate,
    )
}

fn base_installment(principal: Decimal, monthly_rate: Decimal, term_count: u32) -> Decimal {
    let n = Decimal::from(term_count);
    if monthly_rate.is_zero() {
        return principal / n;
    }
    match (Decimal::ONE + monthly_rate).checked_powu(u64::from(term_count)) {
        Some(f) if f > Decimal::ONE => principal * (monthly_rate * f / (f - Decimal::ONE)),
        Some(_) => principal / n,
        // (1 + i)^n beyond decimal range: the factor tends to i.
        None => principal * monthly_rate,
    }
}

fn guarantee_components(
    principal: Decimal,
    term_count: u32,
    fee_rate: Decimal,
    fee_tax_rate: Decimal,
) -> (Decimal, Decimal) {
    let fee = principal * fee_rate / Decimal::from(term_count);
    (fee, fee * fee_tax_rate)
}

fn to_money(d: Decimal) -> Money {
    d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// One line of an amortization table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub term: u32,
    pub installment: Money,
    pub interest: Money,
    pub amortization: Money,
    pub fees: Money,
    pub balance: Money,
}

/// Full payment table for a debt, one row per term. Empty for debts with no
/// terms or more than [`MAX_TERM_COUNT`].
pub fn schedule(debt: &Debt) -> Vec<ScheduleRow> {
    let n = debt.term_count;
    if n == 0 || n > MAX_TERM_COUNT {
        return Vec::new();
    }
    let principal = Decimal::from(debt.principal);
    let base = base_installment(principal, debt.monthly_rate, n);
    let (fee, fee_tax) = guarantee_components(
        principal,
        n,
        debt.guarantee_fee_rate,
        debt.guarantee_fee_tax_rate,
    );
    let installment = to_money(base + fee + fee_tax);
    let fees = to_money(fee + fee_tax);

    let mut balance = principal;
    let mut rows = Vec::with_capacity(n as usize);
    for term in 1..=n {
        let interest = balance * debt.monthly_rate;
        let amortization = base - interest;
        balance = (balance - amortization).max(Decimal::ZERO);
        rows.push(ScheduleRow {
            term,
            installment,
            interest: to_money(interest),
            amortization: to_money(amortization),
            fees,
            balance: to_money(balance),
        });
    }
    rows
}

/// Outstanding principal once `paid_term_count` installments have been paid.
pub fn remaining_balance(debt: &Debt) -> Money {
    if debt.is_retired() || debt.term_count == 0 {
        return 0;
    }
    let principal = Decimal::from(debt.principal);
    let base = base_installment(principal, debt.monthly_rate, debt.term_count);
    let mut balance = principal;
    for _ in 0..debt.paid_term_count.min(MAX_TERM_COUNT) {
        balance -= base - balance * debt.monthly_rate;
    }
    to_money(balance.max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn debt(principal: Money, rate: Decimal, terms: u32, paid: u32) -> Debt {
        Debt {
            id: 1,
            name: "Loan".into(),
            principal,
            term_count: terms,
            paid_term_count: paid,
            monthly_rate: rate,
            guarantee_fee_rate: Decimal::ZERO,
            guarantee_fee_tax_rate: Decimal::ZERO,
            monthly_installment: 0,
            category: "Loan".into(),
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            paid_this_month: false,
        }
    }

    #[test]
    fn zero_terms_yield_zero() {
        assert_eq!(compute_installment(1_000, dec!(0.02), 0, dec!(0), dec!(0)), 0);
        assert_eq!(compute_installment(0, dec!(0), 0, dec!(0), dec!(0)), 0);
    }

    #[test]
    fn zero_rate_divides_evenly() {
        assert_eq!(compute_installment(1_200, dec!(0), 12, dec!(0), dec!(0)), 100);
        assert_eq!(compute_installment(1_000, dec!(0), 3, dec!(0), dec!(0)), 333);
    }

    #[test]
    fn midpoint_rounds_up() {
        // 5 / 2 = 2.5; banker's rounding would give 2.
        assert_eq!(compute_installment(5, dec!(0), 2, dec!(0), dec!(0)), 3);
        assert_eq!(compute_installment(7, dec!(0), 2, dec!(0), dec!(0)), 4);
    }

    #[test]
    fn car_loan_matches_french_formula() {
        assert_eq!(
            compute_installment(24_200_000, dec!(0.01842), 60, dec!(0), dec!(0)),
            669_809
        );
    }

    #[test]
    fn textbook_price_table() {
        // 12,000 at 1 % a month over 12 months: 1,066.19
        assert_eq!(compute_installment(12_000, dec!(0.01), 12, dec!(0), dec!(0)), 1_066);
    }

    #[test]
    fn guarantee_fee_and_tax_are_added() {
        // fee = 1,200,000 * 0.10 / 12 = 10,000; tax = 10,000 * 0.19 = 1,900
        let plain = compute_installment(1_200_000, dec!(0), 12, dec!(0), dec!(0));
        let with_fee = compute_installment(1_200_000, dec!(0), 12, dec!(0.10), dec!(0.19));
        assert_eq!(plain, 100_000);
        assert_eq!(with_fee, 111_900);
    }

    #[test]
    fn installments_recover_principal() {
        for principal in [150_000, 1_000_000, 24_200_000] {
            for rate in [dec!(0.0001), dec!(0.01), dec!(0.0184), dec!(0.05)] {
                for terms in [1u32, 2, 12, 60, 360] {
                    let i = compute_installment(principal, rate, terms, dec!(0), dec!(0));
                    assert!(
                        i * i64::from(terms) >= principal,
                        "{principal} at {rate} over {terms} gave {i}"
                    );
                }
            }
        }
    }

    #[test]
    fn huge_exponent_degrades_to_interest_only() {
        let i = compute_installment(1_000_000, dec!(0.05), 100_000, dec!(0), dec!(0));
        assert_eq!(i, 50_000);
    }

    #[test]
    fn schedule_pays_down_to_zero() {
        let d = debt(12_000, dec!(0.01), 12, 0);
        let rows = schedule(&d);
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].interest, 120);
        assert_eq!(rows[0].installment, 1_066);
        assert_eq!(rows.last().unwrap().balance, 0);
        let paid: Money = rows.iter().map(|r| r.amortization).sum();
        assert!((paid - 12_000).abs() <= 12);
    }

    #[test]
    fn oversized_debts_stay_bounded() {
        let huge = debt(1_000_000, dec!(0.02), u32::MAX, 20_000_000);
        assert!(schedule(&huge).is_empty());
        assert!(remaining_balance(&huge) <= 1_000_000);
        let longest = debt(1_000_000, dec!(0.02), MAX_TERM_COUNT, 0);
        assert_eq!(schedule(&longest).len(), MAX_TERM_COUNT as usize);
    }

    #[test]
    fn remaining_balance_follows_schedule() {
        let fresh = debt(12_000, dec!(0.01), 12, 0);
        assert_eq!(remaining_balance(&fresh), 12_000);
        let six = debt(12_000, dec!(0.01), 12, 6);
        assert_eq!(remaining_balance(&six), schedule(&fresh)[5].balance);
        let done = debt(12_000, dec!(0.01), 12, 12);
        assert_eq!(remaining_balance(&done), 0);
    }
}
