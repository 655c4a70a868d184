// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CollectionKind, Draft, Entry, EntryDraft};
use crate::store::MonthStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_id, parse_money, pretty_table, resolve_month,
};
use anyhow::{bail, Result};

pub fn handle(store: &mut MonthStore, kind: CollectionKind, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, kind, sub)?,
        Some(("list", sub)) => list(store, kind, sub)?,
        Some(("edit", sub)) => edit(store, kind, sub)?,
        Some(("rm", sub)) => {
            let month = resolve_month(store, sub)?;
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            if store.remove(month, kind, id) {
                println!("Removed {} {} from {}", kind.label(), id, month);
            } else {
                println!("No {} {} in {}", kind.label(), id, month);
            }
        }
        Some(("paid", sub)) => {
            let month = resolve_month(store, sub)?;
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            match store.toggle_paid(month, kind, id) {
                Some(true) => println!("Marked {} {} as paid", kind.label(), id),
                Some(false) => println!("{} {} counts as pending again", kind.label(), id),
                None => println!("No {} {} in {}", kind.label(), id, month),
            }
        }
        _ => {}
    }
    Ok(())
}

fn draft_for(kind: CollectionKind, d: EntryDraft) -> Result<Draft> {
    Ok(match kind {
        CollectionKind::Incomes => Draft::Income(d),
        CollectionKind::FixedExpenses => Draft::FixedExpense(d),
        CollectionKind::Purchases => Draft::Purchase(d),
        other => bail!("{} is not a plain entry", other.label()),
    })
}

fn add(store: &mut MonthStore, kind: CollectionKind, sub: &clap::ArgMatches) -> Result<()> {
    let month = resolve_month(store, sub)?;
    let draft = EntryDraft {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        amount: parse_money(sub.get_one::<String>("amount").unwrap())?,
        category: sub.get_one::<String>("category").map(|s| s.to_string()),
        date: sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?,
    };
    let amount = draft.amount;
    let id = store.add(month, draft_for(kind, draft)?)?;
    println!(
        "Added {} {} of {} to {}",
        kind.label(),
        id,
        fmt_money(amount, store.currency()),
        month
    );
    Ok(())
}

fn edit(store: &mut MonthStore, kind: CollectionKind, sub: &clap::ArgMatches) -> Result<()> {
    let month = resolve_month(store, sub)?;
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let Some(current) = store.find_entry(month, kind, id) else {
        println!("No {} {} in {}", kind.label(), id, month);
        return Ok(());
    };
    let mut draft = EntryDraft::from(current);
    if let Some(name) = sub.get_one::<String>("name") {
        draft.name = name.trim().to_string();
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        draft.amount = parse_money(amount)?;
    }
    if let Some(category) = sub.get_one::<String>("category") {
        draft.category = Some(category.to_string());
    }
    if let Some(date) = sub.get_one::<String>("date") {
        draft.date = Some(parse_date(date)?);
    }
    store.update(month, id, draft_for(kind, draft)?)?;
    println!("Updated {} {}", kind.label(), id);
    Ok(())
}

fn list(store: &mut MonthStore, kind: CollectionKind, sub: &clap::ArgMatches) -> Result<()> {
    let month = resolve_month(store, sub)?;
    let ccy = store.currency().to_string();
    let items: Vec<Entry> = store
        .get(month)
        .entries(kind)
        .cloned()
        .unwrap_or_default();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        println!("{}", entry_table(&items, &ccy));
    }
    Ok(())
}

pub fn entry_table(items: &[Entry], ccy: &str) -> comfy_table::Table {
    let rows = items
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.to_string(),
                e.name.clone(),
                e.category.clone(),
                fmt_money(e.amount, ccy),
                if e.paid_this_month { "paid" } else { "" }.to_string(),
            ]
        })
        .collect();
    pretty_table(&["Id", "Date", "Name", "Category", "Amount", "Status"], rows)
}
