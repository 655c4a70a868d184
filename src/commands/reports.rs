// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::recalc::recalculate;
use crate::store::MonthStore;
use crate::summary::{advice, history, summarize, Totals};
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table, resolve_month};
use anyhow::Result;
use serde::Serialize;

pub fn handle(store: &mut MonthStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("history", sub)) => history_report(store, sub)?,
        Some(("advice", sub)) => advice_report(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Totals for a month after refreshing its installments.
pub fn month_totals(store: &mut MonthStore, sub: &clap::ArgMatches) -> Result<Totals> {
    let month = resolve_month(store, sub)?;
    let record = store.get(month);
    recalculate(record);
    let totals = summarize(record);
    store.persist();
    Ok(totals)
}

fn summary(store: &mut MonthStore, sub: &clap::ArgMatches) -> Result<()> {
    let totals = month_totals(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        println!("{}", totals_table(&totals, store.currency()));
    }
    Ok(())
}

pub fn totals_table(t: &Totals, ccy: &str) -> comfy_table::Table {
    let rows = vec![
        vec!["Income".into(), fmt_money(t.total_income, ccy)],
        vec!["Fixed expenses".into(), fmt_money(t.total_fixed, ccy)],
        vec!["Card installments".into(), fmt_money(t.total_card_installments, ccy)],
        vec!["Loan installments".into(), fmt_money(t.total_loan_installments, ccy)],
        vec!["Purchases".into(), fmt_money(t.total_purchases, ccy)],
        vec!["Total expenses".into(), fmt_money(t.total_expenses, ccy)],
        vec!["Still to pay".into(), fmt_money(t.pending_expenses, ccy)],
        vec!["Free cash flow".into(), fmt_money(t.free_cash_flow, ccy)],
        vec!["Savings rate".into(), fmt_pct(t.savings_rate)],
        vec!["Saved in goals".into(), fmt_money(t.total_savings_balance, ccy)],
    ];
    pretty_table(&["", "Amount"], rows)
}

#[derive(Serialize)]
pub struct HistoryRow {
    pub month: String,
    pub income: i64,
    pub expenses: i64,
    pub balance: i64,
    pub savings_rate: String,
}

/// One row per materialized month, oldest first.
pub fn history_rows(store: &mut MonthStore) -> Vec<HistoryRow> {
    store.recalculate_all();
    history(store.ledger())
        .into_iter()
        .map(|(key, t)| HistoryRow {
            month: key.to_string(),
            income: t.total_income,
            expenses: t.total_expenses,
            balance: t.free_cash_flow,
            savings_rate: fmt_pct(t.savings_rate),
        })
        .collect()
}

fn history_report(store: &mut MonthStore, sub: &clap::ArgMatches) -> Result<()> {
    let rows = history_rows(store);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let ccy = store.currency();
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.month.clone(),
                fmt_money(r.income, ccy),
                fmt_money(r.expenses, ccy),
                fmt_money(r.balance, ccy),
                r.savings_rate.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Balance", "Saved"], data)
    );
    Ok(())
}

fn advice_report(store: &mut MonthStore, sub: &clap::ArgMatches) -> Result<()> {
    let tips = advice(&month_totals(store, sub)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tips)? {
        let rows = tips.into_iter().map(|a| vec![a.title, a.detail]).collect();
        println!("{}", pretty_table(&["Advice", ""], rows));
    }
    Ok(())
}
