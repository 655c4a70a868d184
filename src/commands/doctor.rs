// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amortization::installment_for;
use crate::models::{validate_rate, Ledger, MAX_GUARANTEE_RATE, MAX_TERM_COUNT};
use crate::percent::format_percent;
use crate::recalc::INSTALLMENT_TOLERANCE;
use crate::store::MonthStore;
use crate::utils::pretty_table;
use anyhow::Result;
use rust_decimal::Decimal;

/// Problems found in stored debts, as (issue, detail) pairs.
pub fn findings(ledger: &Ledger) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for (key, month) in ledger {
        for debt in month.all_debts() {
            let label = format!("{} #{} {}", key, debt.id, debt.name);

            // 1) Cached installment out of line with the terms
            let expected = if debt.is_retired() {
                0
            } else {
                installment_for(debt)
            };
            if (debt.monthly_installment - expected).abs() > INSTALLMENT_TOLERANCE {
                rows.push(vec![
                    "stale_installment".into(),
                    format!("{}: stored {} expected {}", label, debt.monthly_installment, expected),
                ]);
            }

            // 2) Rates that would be refused today
            if validate_rate(debt.monthly_rate).is_err() {
                rows.push(vec![
                    "rate_out_of_range".into(),
                    format!("{}: {}%", label, format_percent(debt.monthly_rate, 3)),
                ]);
            }
            for (what, rate) in [
                ("guarantee_fee_out_of_range", debt.guarantee_fee_rate),
                ("guarantee_tax_out_of_range", debt.guarantee_fee_tax_rate),
            ] {
                if rate < Decimal::ZERO || rate > MAX_GUARANTEE_RATE {
                    rows.push(vec![
                        what.into(),
                        format!("{}: {}%", label, format_percent(rate, 2)),
                    ]);
                }
            }

            // 3) Term counts that could not be entered today
            if debt.term_count > MAX_TERM_COUNT {
                rows.push(vec![
                    "term_count_out_of_range".into(),
                    format!("{}: {} terms", label, debt.term_count),
                ]);
            }

            // 4) Progress beyond the term count
            if debt.paid_term_count > debt.term_count {
                rows.push(vec![
                    "paid_terms_exceed_terms".into(),
                    format!("{}: {}/{}", label, debt.paid_term_count, debt.term_count),
                ]);
            }
        }
    }
    rows
}

pub fn handle(store: &MonthStore) -> Result<()> {
    let rows = findings(store.ledger());
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
