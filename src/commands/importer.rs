// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Read;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use rusqlite::Connection;
use tracing::info;

use crate::db;
use crate::engine::split::parse_shares;
use crate::engine::transaction::{TransactionDraft, parse_amount, validate};
use crate::error::ValidationError;
use crate::models::{NewTransaction, PaymentMode, SELF_PARTY, TransactionType};
use crate::utils::{parse_date, today};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "1" => Ok(true),
        other => Err(anyhow!("Invalid received flag '{}'", other)),
    }
}

fn parse_record(rec: &csv::StringRecord, today: NaiveDate) -> Result<NewTransaction> {
    let field = |idx: usize| rec.get(idx).map(str::trim).unwrap_or("");

    let date_raw = field(0);
    let date =
        parse_date(date_raw).with_context(|| format!("Invalid transaction date '{}'", date_raw))?;
    let amount = parse_amount(field(2))?;
    let payment_mode = match field(3) {
        "" => PaymentMode::CreditCard,
        m => m.parse::<PaymentMode>()?,
    };
    let transaction_type = match field(5) {
        "" => TransactionType::Expense,
        t => t.parse::<TransactionType>()?,
    };
    let for_whom = match field(4) {
        "" => SELF_PARTY,
        w => w,
    };

    let mut draft = TransactionDraft::new(field(1), amount, payment_mode, date)
        .of_type(transaction_type)
        .for_whom(for_whom)
        .received(parse_bool(field(6))?);
    if !field(7).is_empty() {
        let shares = parse_shares(field(7), amount).map_err(ValidationError::from)?;
        draft = draft.split(shares);
    }
    Ok(validate(draft, today)?)
}

/// Validates every row first and inserts them in one SQLite transaction, so a
/// bad row leaves the store untouched.
pub fn import_csv<R: Read>(conn: &mut Connection, input: R, today: NaiveDate) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = idx + 2;
        let rec = result.with_context(|| format!("row {}", row))?;
        let new = parse_record(&rec, today).with_context(|| format!("row {}", row))?;
        rows.push(new);
    }

    let tx = conn.transaction()?;
    for new in &rows {
        db::insert_transaction(&tx, new)?;
    }
    tx.commit()?;
    Ok(rows.len())
}

fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub
        .get_one::<String>("path")
        .context("--path is required")?
        .trim();
    let file = std::fs::File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let count = import_csv(conn, file, today())?;
    info!(count, path, "imported transactions");
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
