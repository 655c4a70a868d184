// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::debts::debt_table;
use crate::commands::entries::entry_table;
use crate::commands::goals::goal_table;
use crate::commands::reports::totals_table;
use crate::models::CollectionKind;
use crate::store::MonthStore;
use crate::summary::summarize;
use crate::utils::{maybe_print_json, parse_month, pretty_table, resolve_month};
use anyhow::{Context, Result};

pub fn handle(store: &mut MonthStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub)?,
        Some(("list", _)) => {
            let selected = store.current_month();
            let rows = store
                .ledger()
                .iter()
                .map(|(key, month)| {
                    vec![
                        key.to_string(),
                        month.len().to_string(),
                        if Some(*key) == selected { "*" } else { "" }.to_string(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Month", "Entries", "Selected"], rows));
        }
        Some(("select", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            store.select_month(month);
            let n = store.get(month).len();
            println!("Selected {} ({} entries)", month, n);
        }
        Some(("close", sub)) => {
            let month = resolve_month(store, sub)?;
            let next = store
                .close_month(month, sub.get_flag("force"))
                .with_context(|| format!("Closing {} aborted", month))?;
            store.select_month(next);
            println!("Closed {}; now working on {}", month, next);
        }
        _ => {}
    }
    Ok(())
}

fn show(store: &mut MonthStore, sub: &clap::ArgMatches) -> Result<()> {
    let key = resolve_month(store, sub)?;
    store.get(key);
    store.recalculate(key);
    let ccy = store.currency().to_string();
    let Some(month) = store.peek(key) else {
        return Ok(());
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), month)? {
        return Ok(());
    }
    println!("== {} ==", key);
    for kind in CollectionKind::ALL {
        let table = match kind {
            CollectionKind::Incomes | CollectionKind::FixedExpenses | CollectionKind::Purchases => {
                month.entries(kind).map(|items| entry_table(items, &ccy))
            }
            CollectionKind::CreditCards | CollectionKind::Loans => {
                month.debts(kind).map(|items| debt_table(items, &ccy))
            }
            CollectionKind::SavingsGoals => Some(goal_table(&month.savings_goals, &ccy)),
        };
        if let Some(table) = table {
            println!("{}s", kind.label());
            println!("{}", table);
        }
    }
    println!("{}", totals_table(&summarize(month), &ccy));
    Ok(())
}
