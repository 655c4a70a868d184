// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Comma-decimal percentages as typed by users (`1,84` means 1.84 %).
//!
//! Only the comma is accepted as a decimal separator. `1.84` is rejected rather
//! than guessed at, since a point is a thousands separator in the same locale.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValidationError;

static PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(,\d{1,3})?$").expect("percent pattern compiles"));

/// Parse `"1,84"` into the fraction `0.0184`.
pub fn parse_percent(text: &str) -> Result<Decimal, ValidationError> {
    let s = text.trim();
    if !PERCENT.is_match(s) {
        return Err(ValidationError::MalformedPercent(text.to_string()));
    }
    let pct = s
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_| ValidationError::MalformedPercent(text.to_string()))?;
    Ok(pct / Decimal::ONE_HUNDRED)
}

/// Render a fraction as a comma-decimal percentage with `decimals` places.
pub fn format_percent(fraction: Decimal, decimals: u32) -> String {
    let pct = (fraction * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimals as usize, pct).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_comma_decimals() {
        assert_eq!(parse_percent("1,84").unwrap(), dec!(0.0184));
        assert_eq!(parse_percent(" 2 ").unwrap(), dec!(0.02));
        assert_eq!(parse_percent("1,842").unwrap(), dec!(0.01842));
        assert_eq!(parse_percent("0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_point_separator() {
        assert_eq!(
            parse_percent("1.84"),
            Err(ValidationError::MalformedPercent("1.84".into()))
        );
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "   ", ",5", "1,", "1,2,3", "1,8421", "-1", "abc", "1 ,5"] {
            assert!(parse_percent(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn formats_with_comma() {
        assert_eq!(format_percent(dec!(0.0184), 2), "1,84");
        assert_eq!(format_percent(dec!(0.5), 2), "50,00");
        assert_eq!(format_percent(Decimal::ZERO, 2), "0,00");
        assert_eq!(format_percent(dec!(0.01842), 3), "1,842");
        assert_eq!(format_percent(dec!(0.000125), 2), "0,01");
        assert_eq!(format_percent(dec!(0.657), 0), "66");
    }

    #[test]
    fn round_trips_within_tolerance() {
        for x in [dec!(0), dec!(0.0001), dec!(0.0185), dec!(0.5)] {
            let back = parse_percent(&format_percent(x, 2)).unwrap();
            assert!((back - x).abs() <= dec!(0.0001), "{x} came back as {back}");
        }
    }
}
