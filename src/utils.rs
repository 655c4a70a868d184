// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;

use crate::models::{Money, MonthKey};
use crate::percent::parse_percent;
use crate::store::MonthStore;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<MonthKey> {
    Ok(s.parse::<MonthKey>()?)
}

pub fn parse_money(s: &str) -> Result<Money> {
    s.trim()
        .replace('_', "")
        .parse::<Money>()
        .with_context(|| format!("Invalid amount '{}', expected whole currency units", s))
}

pub fn parse_rate(s: &str) -> Result<Decimal> {
    Ok(parse_percent(s)?)
}

pub fn parse_id(s: &str) -> Result<u64> {
    s.trim()
        .parse::<u64>()
        .with_context(|| format!("Invalid id '{}'", s))
}

/// `--month` if given, else the selected month, else today's month.
pub fn resolve_month(store: &MonthStore, sub: &clap::ArgMatches) -> Result<MonthKey> {
    if let Some(m) = sub.try_get_one::<String>("month").ok().flatten() {
        return parse_month(m);
    }
    Ok(store
        .current_month()
        .unwrap_or_else(|| MonthKey::of(chrono::Local::now().date_naive())))
}

pub fn fmt_money(amount: Money, ccy: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{} {}{}", ccy, sign, grouped)
}

pub fn fmt_pct(fraction: Decimal) -> String {
    format!("{:.1}%", (fraction * Decimal::ONE_HUNDRED).round_dp(1))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
