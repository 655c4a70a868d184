// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::MonthKey;

/// Rejected user input. Raised before any entity is touched so the caller can
/// surface the exact constraint that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid percentage '{0}', expected digits with an optional comma and up to 3 decimals (e.g. 1,84)")]
    MalformedPercent(String),
    #[error("monthly rate {0} is outside (0%, 5%]")]
    RateOutOfRange(Decimal),
    #[error("guarantee fee {0} is outside [0%, 30%]")]
    GuaranteeFeeOutOfRange(Decimal),
    #[error("guarantee fee tax {0} is outside [0%, 30%]")]
    GuaranteeTaxOutOfRange(Decimal),
    #[error("credit cards do not carry a guarantee fee")]
    GuaranteeOnCreditCard,
    #[error("principal must be greater than zero")]
    NonPositivePrincipal,
    #[error("a debt needs at least one term")]
    ZeroTerms,
    #[error("{total} terms exceed the maximum of {max}")]
    TooManyTerms { total: u32, max: u32 },
    #[error("paid terms ({paid}) exceed total terms ({total})")]
    PaidTermsExceedTerms { paid: u32, total: u32 },
    #[error("amount must not be negative")]
    NegativeAmount,
    #[error("savings target must be greater than zero")]
    NonPositiveTarget,
    #[error("deposit must be greater than zero")]
    NonPositiveDeposit,
    #[error("deposit would overflow the goal balance")]
    DepositOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthKeyError {
    #[error("invalid month '{0}', expected YYYY-MM")]
    Invalid(String),
}

/// Reasons a month close is refused. Nothing is written when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RolloverError {
    #[error("month {0} has no data to close")]
    SourceMissing(MonthKey),
    #[error("month {0} already has data; confirm to overwrite it")]
    Conflict(MonthKey),
}
