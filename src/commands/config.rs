// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::MonthStore;
use crate::utils::pretty_table;
use anyhow::{bail, Result};

pub fn handle(store: &mut MonthStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![
                vec![
                    "data".to_string(),
                    store
                        .storage_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(memory)".into()),
                ],
                vec!["currency".into(), store.currency().to_string()],
                vec![
                    "current_month".into(),
                    store
                        .current_month()
                        .map(|k| k.to_string())
                        .unwrap_or_else(|| "(this month)".into()),
                ],
                vec!["months".into(), store.ledger().len().to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("currency", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_string();
            if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Invalid currency code '{}'", code);
            }
            store.set_currency(&code);
            println!("Display currency set to {}", store.currency());
        }
        _ => {}
    }
    Ok(())
}
