// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CollectionKind, Draft, GoalDraft, SavingsGoal};
use crate::store::MonthStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_id, parse_money, pretty_table, resolve_month,
};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(store: &mut MonthStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let month = resolve_month(store, sub)?;
            let draft = GoalDraft {
                name: sub.get_one::<String>("name").unwrap().trim().to_string(),
                target: parse_money(sub.get_one::<String>("target").unwrap())?,
                current: sub
                    .get_one::<String>("current")
                    .map(|s| parse_money(s))
                    .transpose()?
                    .unwrap_or(0),
            };
            let id = store.add(month, Draft::SavingsGoal(draft))?;
            println!("Added savings goal {} to {}", id, month);
        }
        Some(("list", sub)) => {
            let month = resolve_month(store, sub)?;
            let ccy = store.currency().to_string();
            let goals: Vec<SavingsGoal> = store.get(month).savings_goals.clone();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goals)? {
                println!("{}", goal_table(&goals, &ccy));
            }
        }
        Some(("edit", sub)) => {
            let month = resolve_month(store, sub)?;
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let Some(current) = store.find_goal(month, id) else {
                println!("No savings goal {} in {}", id, month);
                return Ok(());
            };
            let mut draft = GoalDraft::from(current);
            if let Some(name) = sub.get_one::<String>("name") {
                draft.name = name.trim().to_string();
            }
            if let Some(t) = sub.get_one::<String>("target") {
                draft.target = parse_money(t)?;
            }
            if let Some(c) = sub.get_one::<String>("current") {
                draft.current = parse_money(c)?;
            }
            store.update(month, id, Draft::SavingsGoal(draft))?;
            println!("Updated savings goal {}", id);
        }
        Some(("rm", sub)) => {
            let month = resolve_month(store, sub)?;
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            if store.remove(month, CollectionKind::SavingsGoals, id) {
                println!("Removed savings goal {} from {}", id, month);
            } else {
                println!("No savings goal {} in {}", id, month);
            }
        }
        Some(("deposit", sub)) => {
            let month = resolve_month(store, sub)?;
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let amount = parse_money(sub.get_one::<String>("amount").unwrap())?;
            if store.deposit(month, id, amount)? {
                println!(
                    "Deposited {} into goal {}",
                    fmt_money(amount, store.currency()),
                    id
                );
            } else {
                println!("No savings goal {} in {}", id, month);
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn goal_table(goals: &[SavingsGoal], ccy: &str) -> comfy_table::Table {
    let rows = goals
        .iter()
        .map(|g| {
            let pct = g.progress_pct().min(Decimal::ONE_HUNDRED);
            vec![
                g.id.to_string(),
                g.name.clone(),
                fmt_money(g.current, ccy),
                fmt_money(g.target, ccy),
                format!("{:.1}%", pct.round_dp(1)),
            ]
        })
        .collect();
    pretty_table(&["Id", "Name", "Saved", "Target", "Progress"], rows)
}
