// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use paydown::commands::exporter;
use paydown::models::MonthKey;
use paydown::store::MonthStore;
use paydown::{cli, commands::doctor};
use serde_json::Value;
use tempfile::tempdir;

fn key(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn seeded() -> MonthStore {
    let mut store = MonthStore::in_memory();
    store.seed_sample(key("2025-08")).unwrap();
    store
}

fn export(store: &mut MonthStore, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "paydown", "export", "--format", format, "--out", out, "--month", "2025-08",
    ]);
    let sub = matches.subcommand_matches("export").unwrap();
    exporter::handle(store, sub)
}

#[test]
fn json_export_holds_the_whole_ledger() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("ledger.json");
    let mut store = seeded();
    export(&mut store, "json", out.to_str().unwrap()).unwrap();

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["currentMonth"], "2025-08");
    assert!(doc["exportedAt"].is_string());
    let aug = &doc["ledger"]["2025-08"];
    assert_eq!(aug["incomes"][0]["name"], "Salary");
    assert_eq!(aug["loans"][0]["monthlyInstallment"], 669_809);
    assert_eq!(aug["loans"][0]["monthlyRate"], "0.01842");
    assert_eq!(aug["purchases"][0]["date"], "2025-08-10");
}

#[test]
fn csv_export_has_one_row_per_month() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("history.csv");
    let mut store = seeded();
    store.close_month(key("2025-08"), false).unwrap();
    export(&mut store, "CSV", out.to_str().unwrap()).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["month", "income", "expenses", "balance", "savings_rate"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "2025-08");
    assert_eq!(&rows[0][1], "3500000");
    assert_eq!(&rows[1][0], "2025-09");
}

#[test]
fn unknown_format_writes_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("ledger.xml");
    let mut store = seeded();
    assert!(export(&mut store, "xml", out.to_str().unwrap()).is_err());
    assert!(!out.exists());
}

#[test]
fn doctor_flags_stale_and_overrun_debts() {
    let mut store = seeded();
    assert!(doctor::findings(store.ledger()).is_empty());

    let mut state = store.state().clone();
    let loan = &mut state.ledger.get_mut(&key("2025-08")).unwrap().loans[0];
    loan.monthly_installment = 5;
    loan.paid_term_count = 61;

    let tampered = serde_json::to_string(&state).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("paydown.json");
    std::fs::write(&path, tampered).unwrap();
    let store = MonthStore::open(paydown::storage::Storage::at(&path)).unwrap();

    let issues: Vec<String> = doctor::findings(store.ledger())
        .into_iter()
        .map(|row| row[0].clone())
        .collect();
    assert!(issues.contains(&"stale_installment".to_string()));
    assert!(issues.contains(&"paid_terms_exceed_terms".to_string()));
}
