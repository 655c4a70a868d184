// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reports::history_rows;
use crate::models::{Ledger, MonthKey};
use crate::store::MonthStore;
use crate::utils::resolve_month;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Read-only snapshot written by `export --format json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub exported_at: DateTime<Utc>,
    pub current_month: MonthKey,
    pub ledger: &'a Ledger,
}

pub fn export_document(store: &MonthStore, current_month: MonthKey) -> ExportDocument<'_> {
    ExportDocument {
        exported_at: Utc::now(),
        current_month,
        ledger: store.ledger(),
    }
}

pub fn handle(store: &mut MonthStore, m: &clap::ArgMatches) -> Result<()> {
    let fmt = m.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = m.get_one::<String>("out").unwrap().trim().to_string();

    match fmt.as_str() {
        "json" => {
            let month = resolve_month(store, m)?;
            let doc = export_document(store, month);
            std::fs::write(&out, serde_json::to_string_pretty(&doc)?)
                .with_context(|| format!("Write export to {}", out))?;
        }
        "csv" => {
            let rows = history_rows(store);
            let mut wtr = csv::Writer::from_path(&out)
                .with_context(|| format!("Write export to {}", out))?;
            wtr.write_record(["month", "income", "expenses", "balance", "savings_rate"])?;
            for r in rows {
                wtr.write_record([
                    r.month,
                    r.income.to_string(),
                    r.expenses.to_string(),
                    r.balance.to_string(),
                    r.savings_rate,
                ])?;
            }
            wtr.flush()?;
        }
        _ => bail!("Unknown format: {} (use json|csv)", fmt),
    }
    println!("Exported {} to {}", fmt, out);
    Ok(())
}
