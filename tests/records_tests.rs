// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::commands::doctor;
use pocketbook::db;
use pocketbook::engine::{RawSplitShare, RawTransaction, Snapshot, migrate};
use pocketbook::error::DataContractViolation;
use pocketbook::models::TransactionType;
use rusqlite::Connection;
use rust_decimal_macros::dec;

fn raw(id: i64, amount: &str, mode: &str, date: &str) -> RawTransaction {
    RawTransaction {
        id,
        title: format!(" t{} ", id),
        amount: amount.into(),
        payment_mode: mode.into(),
        for_whom: "Self".into(),
        date: date.into(),
        ..RawTransaction::default()
    }
}

fn jan() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

#[test]
fn migrate_fills_defaults() {
    let mut r = raw(1, "120.50", "upi", "2024-01-05T10:30:00.000Z");
    r.for_whom = "raj".into();
    let tx = migrate(r).unwrap();
    assert_eq!(tx.title, "t1");
    assert_eq!(tx.amount, dec!(120.50));
    assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(tx.transaction_type, TransactionType::Expense);
    assert!(!tx.payment_received);
}

#[test]
fn migrate_drops_received_flag_where_meaningless() {
    let mut r = raw(2, "50", "Cash", "2024-01-05");
    r.payment_received = Some(true);
    r.payment_received_date = Some("2024-01-06".into());
    let tx = migrate(r).unwrap();
    assert!(!tx.payment_received);
    assert_eq!(tx.payment_received_date, None);
}

#[test]
fn migrate_normalizes_split_rows() {
    let mut r = raw(3, "200", "Cash", "2024-01-05");
    r.for_whom = "Someone".into();
    r.split_details = Some(vec![
        RawSplitShare {
            person: "self".into(),
            amount: "100".into(),
            payment_received: Some(true),
            payment_received_date: Some("2024-01-07".into()),
        },
        RawSplitShare {
            person: "Raj".into(),
            amount: "100".into(),
            payment_received: Some(true),
            payment_received_date: Some("2024-01-07".into()),
        },
    ]);
    let tx = migrate(r).unwrap();
    assert_eq!(tx.for_whom, "Split");
    let shares = tx.split_details.unwrap();
    assert_eq!(shares[0].person, "Self");
    assert!(!shares[0].payment_received);
    assert!(shares[1].payment_received);
    assert_eq!(shares[1].payment_received_date, NaiveDate::from_ymd_opt(2024, 1, 7));
}

#[test]
fn violations_name_the_bad_field() {
    assert_eq!(
        migrate(raw(4, "10", "Cheque", "2024-01-05")),
        Err(DataContractViolation::PaymentMode {
            id: 4,
            value: "Cheque".into()
        })
    );
    assert!(matches!(
        migrate(raw(5, "10", "Cash", "05/01/2024")),
        Err(DataContractViolation::Date { id: 5, .. })
    ));
    assert!(matches!(
        migrate(raw(6, "ten", "Cash", "2024-01-05")),
        Err(DataContractViolation::Amount { id: 6, .. })
    ));
    let mut r = raw(7, "10", "Cash", "2024-01-05");
    r.transaction_type = Some("gift".into());
    assert_eq!(migrate(r).unwrap_err().kind(), "transaction_type");
}

#[test]
fn split_sentinel_without_shares_is_a_violation() {
    let mut r = raw(8, "900", "Cash", "2024-01-03");
    r.for_whom = "Split".into();
    r.split_details = Some(Vec::new());
    assert_eq!(migrate(r.clone()), Err(DataContractViolation::Split { id: 8 }));

    r.split_details = None;
    assert_eq!(migrate(r), Err(DataContractViolation::Split { id: 8 }));
}

#[test]
fn stored_split_without_share_rows_is_flagged() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        "INSERT INTO transactions(id, title, amount, payment_mode, for_whom, date, transaction_type, is_split)
         VALUES (1, 'Dinner', '900', 'Cash', 'Split', '2024-01-03', 'expense', 1);",
    )
    .unwrap();

    let snapshot = db::load_snapshot(&conn).unwrap();
    assert!(snapshot.transactions.is_empty());
    assert_eq!(snapshot.flagged.len(), 1);

    let s = snapshot.summary(jan());
    assert_eq!(s.total_pending, dec!(0));
    assert_eq!(s.net_amount, dec!(0));
    assert!(s.money_to_collect.is_empty());
    assert_eq!(s.unparseable.count, 1);
    assert_eq!(s.unparseable.amount, dec!(900));

    let issues = doctor::find_issues(&snapshot);
    let kinds: Vec<(&str, i64)> = issues.iter().map(|(k, id, _)| (k.as_str(), *id)).collect();
    assert_eq!(kinds, vec![("split", 1)]);
}

#[test]
fn flagged_records_are_reported_not_summed() {
    let records = vec![
        raw(1, "500", "Cash", "2024-01-05"),
        raw(2, "70", "Cheque", "2024-01-06"),
        raw(3, "30", "Cash", "not a date"),
        raw(4, "90", "Cheque", "2024-02-01"),
    ];
    let snapshot = Snapshot::from_raw(records, Vec::new());
    assert_eq!(snapshot.transactions.len(), 1);
    assert_eq!(snapshot.flagged.len(), 3);

    let s = snapshot.summary(jan());
    assert_eq!(s.total_spent_by_me, dec!(500));
    assert_eq!(s.net_amount, dec!(500));
    // Record 3 has no readable month, so it is reported for every month.
    assert_eq!(s.unparseable.count, 2);
    assert_eq!(s.unparseable.amount, dec!(100));
    let ids: Vec<i64> = s.unparseable.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn doctor_reports_bad_rows_and_broken_splits() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        "INSERT INTO transactions(id, title, amount, payment_mode, for_whom, date, transaction_type, is_split)
         VALUES (1, 'Odd', '10', 'Barter', 'Self', '2024-01-02', 'expense', 0),
                (2, 'Dinner', '900', 'Cash', 'Split', '2024-01-03', 'expense', 1),
                (3, 'Fine', '50', 'Cash', 'Self', '2024-01-04', NULL, 0);
         INSERT INTO split_shares(transaction_id, position, person, amount)
         VALUES (2, 0, 'Self', '300'), (2, 1, 'Raj', '300');",
    )
    .unwrap();

    let snapshot = db::load_snapshot(&conn).unwrap();
    let issues = doctor::find_issues(&snapshot);
    let kinds: Vec<(&str, i64)> = issues.iter().map(|(k, id, _)| (k.as_str(), *id)).collect();
    assert_eq!(kinds, vec![("payment_mode", 1), ("invalid_split", 2)]);
}
