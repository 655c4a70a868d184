// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use paydown::models::CollectionKind;
use paydown::storage::Storage;
use paydown::store::MonthStore;
use paydown::utils::resolve_month;
use paydown::{cli, commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let storage = match matches.get_one::<String>("data") {
        Some(path) => Storage::at(path),
        None => Storage::open_default()?,
    };
    let mut store = MonthStore::open(storage)?;

    match matches.subcommand() {
        Some(("init", sub)) => {
            if sub.get_flag("sample") {
                let month = resolve_month(&store, sub)?;
                if store.seed_sample(month)? {
                    println!("Seeded sample data into {}", month);
                } else {
                    println!("{} already has data; sample skipped", month);
                }
                store.select_month(month);
            } else {
                store.persist();
            }
            if let Some(path) = store.storage_path() {
                println!("Ledger ready at {}", path.display());
            }
        }
        Some(("month", sub)) => commands::months::handle(&mut store, sub)?,
        Some(("income", sub)) => commands::entries::handle(&mut store, CollectionKind::Incomes, sub)?,
        Some(("fixed", sub)) => {
            commands::entries::handle(&mut store, CollectionKind::FixedExpenses, sub)?
        }
        Some(("purchase", sub)) => {
            commands::entries::handle(&mut store, CollectionKind::Purchases, sub)?
        }
        Some(("card", sub)) => commands::debts::handle(&mut store, CollectionKind::CreditCards, sub)?,
        Some(("loan", sub)) => commands::debts::handle(&mut store, CollectionKind::Loans, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&mut store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&mut store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&mut store, sub)?,
        Some(("config", sub)) => commands::config::handle(&mut store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        Some(("reset", sub)) => {
            if sub.get_flag("yes") {
                store.reset();
                println!("All months deleted");
            } else {
                println!("Refusing to reset without --yes");
            }
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
