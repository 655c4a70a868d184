// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Refreshing cached installments.
//!
//! Nothing in the crate recalculates on write. Callers run [`recalculate`] on a
//! month before reading `monthly_installment` or computing totals from it.

use crate::amortization::installment_for;
use crate::models::{Debt, Money, MonthRecord};

/// A stored installment is only replaced when it is off by more than this many
/// currency units.
pub const INSTALLMENT_TOLERANCE: Money = 1;

/// Bring every card and loan of `month` in line with its current terms.
pub fn recalculate(month: &mut MonthRecord) {
    for debt in month.all_debts_mut() {
        recalculate_debt(debt);
    }
}

/// Retired debts are pinned to 0. Otherwise the fresh installment wins when the
/// stored one is unset or drifted past [`INSTALLMENT_TOLERANCE`].
pub fn recalculate_debt(debt: &mut Debt) {
    if debt.is_retired() {
        debt.monthly_installment = 0;
        return;
    }
    let candidate = installment_for(debt);
    if debt.monthly_installment == 0
        || (debt.monthly_installment - candidate).abs() > INSTALLMENT_TOLERANCE
    {
        debt.monthly_installment = candidate;
    }
}

/// Unconditional version used when a debt is created, edited or carried into
/// a new month.
pub fn settle_installment(debt: &mut Debt) {
    debt.monthly_installment = if debt.is_retired() {
        0
    } else {
        installment_for(debt)
    };
}
