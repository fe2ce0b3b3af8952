// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::models::{PaymentMode, TransactionType};
use pocketbook::{cli, commands::importer, db};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "date,title,amount,mode,for,type,received,split";

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}\n2024-01-03,Shop,20.00,Cash,Self,expense,,", HEADER).unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    let matches =
        cli::build_cli().get_matches_from(["pocketbook", "import", "transactions", "--path", &padded]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(&mut conn, import_m).unwrap();
    } else {
        panic!("no import subcommand");
    }
    assert_eq!(count(&conn), 1);
}

#[test]
fn importer_validates_and_normalizes_rows() {
    let mut conn = base_conn();
    let csv = format!(
        "{}\n\
         2024-01-03,  Movie  ,300,upi,raj,,yes,\n\
         2024-01-04,Loan,500,Cash,Priya,lent,no,\n\
         2024-01-05,Dinner,900,credit card,,expense,,\"Self=300,Raj=300,Priya=\"\n\
         2024-01-06,Snacks,40,,,,,\n",
        HEADER
    );
    let n = importer::import_csv(&mut conn, csv.as_bytes(), today()).unwrap();
    assert_eq!(n, 4);

    let snapshot = db::load_snapshot(&conn).unwrap();
    assert!(snapshot.flagged.is_empty());
    let by_title = |t: &str| {
        snapshot
            .transactions
            .iter()
            .find(|tx| tx.title == t)
            .unwrap()
            .clone()
    };

    let movie = by_title("Movie");
    assert_eq!(movie.payment_mode, PaymentMode::Upi);
    assert_eq!(movie.for_whom, "raj");
    assert!(movie.payment_received);
    assert_eq!(movie.payment_received_date, Some(today()));

    let loan = by_title("Loan");
    assert_eq!(loan.transaction_type, TransactionType::Lent);
    assert!(!loan.payment_received);

    let dinner = by_title("Dinner");
    assert_eq!(dinner.for_whom, "Split");
    let shares = dinner.split_details.unwrap();
    assert_eq!(shares.len(), 3);
    assert_eq!(shares[2].amount, dec!(300));

    let snacks = by_title("Snacks");
    assert_eq!(snacks.payment_mode, PaymentMode::CreditCard);
    assert_eq!(snacks.for_whom, "Self");
    assert_eq!(snacks.transaction_type, TransactionType::Expense);
}

#[test]
fn importer_rejects_invalid_date() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}\n2024-13-03,Shop,abc,Cash,Self,expense,,", HEADER).unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let matches =
        cli::build_cli().get_matches_from(["pocketbook", "import", "transactions", "--path", &path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        let err = importer::handle(&mut conn, import_m).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("row 2"), "{}", chain);
        assert!(chain.contains("Invalid transaction date '2024-13-03'"), "{}", chain);
    } else {
        panic!("no import subcommand");
    }
    assert_eq!(count(&conn), 0);
}

#[test]
fn one_bad_row_imports_nothing() {
    let mut conn = base_conn();
    let csv = format!(
        "{}\n\
         2024-01-03,Shop,20,Cash,Self,expense,,\n\
         2024-01-04,Loan,500,Cash,Self,lent,,\n",
        HEADER
    );
    let err = importer::import_csv(&mut conn, csv.as_bytes(), today()).unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("row 3"), "{}", chain);
    assert!(chain.contains("Lent transactions cannot be for Self"), "{}", chain);
    assert_eq!(count(&conn), 0);
}

#[test]
fn bad_split_column_is_rejected() {
    let mut conn = base_conn();
    let csv = format!(
        "{}\n2024-01-03,Dinner,900,Cash,,expense,,\"Raj=450,Priya=450\"\n",
        HEADER
    );
    let err = importer::import_csv(&mut conn, csv.as_bytes(), today()).unwrap_err();
    assert!(format!("{:#}", err).contains("one share must belong to Self"));
    assert_eq!(count(&conn), 0);
}
