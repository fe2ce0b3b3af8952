// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::engine::transaction::{TransactionDraft, validate};
use pocketbook::models::{PaymentMode, SplitShare, TransactionType};
use pocketbook::{cli, commands::exporter, commands::importer, db};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn seed(conn: &Connection) {
    let today = d(2024, 1, 10);
    let lunch = validate(
        TransactionDraft::new("Lunch, office", dec!(120.50), PaymentMode::Cash, d(2024, 1, 2)),
        today,
    )
    .unwrap();
    let dinner = validate(
        TransactionDraft::new("Dinner", dec!(900), PaymentMode::Upi, d(2024, 1, 5)).split(vec![
            SplitShare::new("Self", dec!(300)),
            SplitShare::new("Raj", dec!(300)),
            SplitShare::new("Priya", dec!(300)),
        ]),
        today,
    )
    .unwrap();
    let loan = validate(
        TransactionDraft::new("Loan", dec!(500), PaymentMode::Upi, d(2024, 1, 7))
            .of_type(TransactionType::Lent)
            .for_whom("Raj")
            .received(true),
        today,
    )
    .unwrap();
    for new in [lunch, dinner, loan] {
        db::insert_transaction(conn, &new).unwrap();
    }
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "pocketbook",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(conn, export_m)
}

#[test]
fn csv_export_is_oldest_first_in_import_layout() {
    let conn = base_conn();
    seed(&conn);
    let snapshot = db::load_snapshot(&conn).unwrap();

    let mut buf = Vec::new();
    exporter::write_csv(&snapshot.transactions, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,title,amount,mode,for,type,received,split");
    assert_eq!(lines[1], "2024-01-02,\"Lunch, office\",120.50,Cash,Self,expense,false,");
    assert_eq!(
        lines[2],
        "2024-01-05,Dinner,900,UPI,Split,expense,false,\"Self=300,Raj=300,Priya=300\""
    );
    assert_eq!(lines[3], "2024-01-07,Loan,500,UPI,Raj,lent,true,");
}

#[test]
fn csv_export_reimports_cleanly() {
    let conn = base_conn();
    seed(&conn);
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();
    export(&conn, "csv", &out_str).unwrap();

    let mut fresh = base_conn();
    let file = std::fs::File::open(&out_path).unwrap();
    let n = importer::import_csv(&mut fresh, file, d(2024, 1, 10)).unwrap();
    assert_eq!(n, 3);

    let before = db::load_snapshot(&conn).unwrap().transactions;
    let after = db::load_snapshot(&fresh).unwrap().transactions;
    let key = |txs: &[pocketbook::models::Transaction]| {
        txs.iter()
            .map(|t| (t.date, t.title.clone(), t.amount, t.for_whom.clone(), t.payment_received))
            .collect::<Vec<_>>()
    };
    assert_eq!(key(&before), key(&after));
}

#[test]
fn json_export_uses_camel_case_fields() {
    let conn = base_conn();
    seed(&conn);
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();
    export(&conn, "json", &out_str).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["title"], json!("Lunch, office"));
    assert_eq!(items[0]["paymentMode"], json!("Cash"));
    assert_eq!(items[0]["forWhom"], json!("Self"));
    assert_eq!(items[2]["transactionType"], json!("lent"));
    assert_eq!(items[2]["paymentReceived"], json!(true));
    assert_eq!(items[1]["splitDetails"][1]["person"], json!("Raj"));
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(export(&conn, "xml", &out_str).is_err());
    assert!(!out_path.exists());
}
