// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use tracing::info;

use crate::db;
use crate::models::{SplitShare, Transaction};

pub const CSV_HEADER: [&str; 8] = [
    "date", "title", "amount", "mode", "for", "type", "received", "split",
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// `Self=300,Raj=300` form accepted by `--split` and the importer.
pub fn format_shares(shares: &[SplitShare]) -> String {
    shares
        .iter()
        .map(|s| format!("{}={}", s.person, s.amount))
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes transactions oldest first in the importer's column layout.
pub fn write_csv<W: Write>(transactions: &[Transaction], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for tx in transactions.iter().rev() {
        wtr.write_record([
            tx.date.to_string(),
            tx.title.clone(),
            tx.amount.to_string(),
            tx.payment_mode.to_string(),
            tx.for_whom.clone(),
            tx.transaction_type.to_string(),
            tx.payment_received.to_string(),
            tx.split_details
                .as_deref()
                .map(format_shares)
                .unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("out").context("--out is required")?;

    let snapshot = db::load_snapshot(conn)?;
    match fmt.as_str() {
        "csv" => {
            let file = std::fs::File::create(out).with_context(|| format!("Create {}", out))?;
            write_csv(&snapshot.transactions, file)?;
        }
        "json" => {
            let mut items = snapshot.transactions.clone();
            items.reverse();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    if !snapshot.flagged.is_empty() {
        eprintln!(
            "Skipped {} unreadable record(s); run `pocketbook doctor`",
            snapshot.flagged.len()
        );
    }
    info!(count = snapshot.transactions.len(), out = %out, "exported transactions");
    println!("Exported transactions to {}", out);
    Ok(())
}
