// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amortization::{remaining_balance, schedule};
use crate::models::{CollectionKind, Debt, DebtDraft, Draft};
use crate::percent::format_percent;
use crate::store::MonthStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_id, parse_money, parse_rate, pretty_table, resolve_month,
};
use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;

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
                Some(true) => println!("Installment of {} {} marked as paid", kind.label(), id),
                Some(false) => println!("Installment of {} {} is pending again", kind.label(), id),
                None => println!("No {} {} in {}", kind.label(), id, month),
            }
        }
        Some(("schedule", sub)) => show_schedule(store, kind, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_terms(s: &str) -> Result<u32> {
    s.trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid number of installments '{}'", s))
}

fn draft_for(kind: CollectionKind, d: DebtDraft) -> Result<Draft> {
    Ok(match kind {
        CollectionKind::CreditCards => Draft::CreditCard(d),
        CollectionKind::Loans => Draft::Loan(d),
        other => bail!("{} is not a debt", other.label()),
    })
}

/// Guarantee options only exist on the loan subcommands.
fn fee_arg(sub: &clap::ArgMatches, id: &str) -> Result<Option<Decimal>> {
    match sub.try_get_one::<String>(id).ok().flatten() {
        Some(s) => Ok(Some(parse_rate(s)?)),
        None => Ok(None),
    }
}

fn add(store: &mut MonthStore, kind: CollectionKind, sub: &clap::ArgMatches) -> Result<()> {
    let month = resolve_month(store, sub)?;
    let draft = DebtDraft {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        principal: parse_money(sub.get_one::<String>("principal").unwrap())?,
        term_count: parse_terms(sub.get_one::<String>("terms").unwrap())?,
        paid_term_count: sub
            .get_one::<String>("paid")
            .map(|s| parse_terms(s))
            .transpose()?
            .unwrap_or(0),
        monthly_rate: parse_rate(sub.get_one::<String>("rate").unwrap())?,
        guarantee_fee_rate: fee_arg(sub, "fee")?.unwrap_or(Decimal::ZERO),
        guarantee_fee_tax_rate: fee_arg(sub, "fee-tax")?.unwrap_or(Decimal::ZERO),
        category: sub.get_one::<String>("category").map(|s| s.to_string()),
    };
    let id = store.add(month, draft_for(kind, draft)?)?;
    if let Some(debt) = store.find_debt(month, kind, id) {
        println!(
            "Added {} {} to {}: installment {}",
            kind.label(),
            id,
            month,
            fmt_money(debt.monthly_installment, store.currency())
        );
    }
    Ok(())
}

fn edit(store: &mut MonthStore, kind: CollectionKind, sub: &clap::ArgMatches) -> Result<()> {
    let month = resolve_month(store, sub)?;
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let Some(current) = store.find_debt(month, kind, id) else {
        println!("No {} {} in {}", kind.label(), id, month);
        return Ok(());
    };
    let mut draft = DebtDraft::from(current);
    if let Some(name) = sub.get_one::<String>("name") {
        draft.name = name.trim().to_string();
    }
    if let Some(p) = sub.get_one::<String>("principal") {
        draft.principal = parse_money(p)?;
    }
    if let Some(n) = sub.get_one::<String>("terms") {
        draft.term_count = parse_terms(n)?;
    }
    if let Some(n) = sub.get_one::<String>("paid") {
        draft.paid_term_count = parse_terms(n)?;
    }
    if let Some(r) = sub.get_one::<String>("rate") {
        draft.monthly_rate = parse_rate(r)?;
    }
    if let Some(fee) = fee_arg(sub, "fee")? {
        draft.guarantee_fee_rate = fee;
    }
    if let Some(tax) = fee_arg(sub, "fee-tax")? {
        draft.guarantee_fee_tax_rate = tax;
    }
    if let Some(category) = sub.get_one::<String>("category") {
        draft.category = Some(category.to_string());
    }
    store.update(month, id, draft_for(kind, draft)?)?;
    println!("Updated {} {}", kind.label(), id);
    Ok(())
}

fn list(store: &mut MonthStore, kind: CollectionKind, sub: &clap::ArgMatches) -> Result<()> {
    let month = resolve_month(store, sub)?;
    store.get(month);
    store.recalculate(month);
    let ccy = store.currency().to_string();
    let items: Vec<Debt> = store
        .peek(month)
        .and_then(|m| m.debts(kind))
        .cloned()
        .unwrap_or_default();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        println!("{}", debt_table(&items, &ccy));
    }
    Ok(())
}

pub fn debt_table(items: &[Debt], ccy: &str) -> comfy_table::Table {
    let rows = items
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.name.clone(),
                fmt_money(d.principal, ccy),
                format!("{}%", format_percent(d.monthly_rate, 3)),
                format!("{}/{}", d.paid_term_count, d.term_count),
                fmt_money(d.monthly_installment, ccy),
                fmt_money(remaining_balance(d), ccy),
                if d.paid_this_month { "paid" } else { "" }.to_string(),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Id",
            "Name",
            "Principal",
            "Rate",
            "Paid",
            "Installment",
            "Balance",
            "Status",
        ],
        rows,
    )
}

fn show_schedule(store: &mut MonthStore, kind: CollectionKind, sub: &clap::ArgMatches) -> Result<()> {
    let month = resolve_month(store, sub)?;
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let Some(debt) = store.find_debt(month, kind, id) else {
        println!("No {} {} in {}", kind.label(), id, month);
        return Ok(());
    };
    let rows = schedule(debt);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let ccy = store.currency();
    let paid = debt.paid_term_count;
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.term.to_string(),
                fmt_money(r.installment, ccy),
                fmt_money(r.interest, ccy),
                fmt_money(r.amortization, ccy),
                fmt_money(r.fees, ccy),
                fmt_money(r.balance, ccy),
                if r.term <= paid { "paid" } else { "" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Term", "Installment", "Interest", "Principal", "Fees", "Balance", ""],
            data
        )
    );
    Ok(())
}
