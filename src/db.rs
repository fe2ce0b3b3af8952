// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config;
use crate::engine::budget::validate_budget_amount;
use crate::engine::{RawSplitShare, RawTransaction, Snapshot, migrate};
use crate::models::{Budget, NewTransaction, SplitShare, Transaction};
use crate::utils::first_of_month;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Pocketbook", "pocketbook"));

/// `POCKETBOOK_DB` if set, else the platform data dir.
pub fn db_path() -> Result<PathBuf> {
    if let Some(path) = config::db_path_from_env() {
        return Ok(path);
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("pocketbook.sqlite"))
}

pub fn open_or_init(path: Option<&Path>) -> Result<Connection> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- transaction_type and payment_received are NULL on rows written before
    -- those fields existed
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        amount TEXT NOT NULL,
        payment_mode TEXT NOT NULL,
        for_whom TEXT NOT NULL,
        date TEXT NOT NULL,
        transaction_type TEXT,
        payment_received INTEGER,
        payment_received_date TEXT,
        is_split INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS split_shares(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        transaction_id INTEGER NOT NULL,
        position INTEGER NOT NULL,
        person TEXT NOT NULL,
        amount TEXT NOT NULL,
        payment_received INTEGER NOT NULL DEFAULT 0,
        payment_received_date TEXT,
        UNIQUE(transaction_id, position),
        FOREIGN KEY(transaction_id) REFERENCES transactions(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        month TEXT NOT NULL UNIQUE, -- first day of the month
        amount TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

fn load_shares(
    conn: &Connection,
    only: Option<i64>,
) -> Result<HashMap<i64, Vec<RawSplitShare>>> {
    let mut stmt = conn.prepare(
        "SELECT transaction_id, person, amount, payment_received, payment_received_date
         FROM split_shares
         WHERE ?1 IS NULL OR transaction_id=?1
         ORDER BY transaction_id, position",
    )?;
    let rows = stmt.query_map(params![only], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            RawSplitShare {
                person: r.get(1)?,
                amount: r.get(2)?,
                payment_received: r.get(3)?,
                payment_received_date: r.get(4)?,
            },
        ))
    })?;
    let mut by_tx: HashMap<i64, Vec<RawSplitShare>> = HashMap::new();
    for row in rows {
        let (tx_id, share) = row?;
        by_tx.entry(tx_id).or_default().push(share);
    }
    Ok(by_tx)
}

fn load_raw(conn: &Connection, only: Option<i64>) -> Result<Vec<RawTransaction>> {
    let mut shares = load_shares(conn, only)?;
    let mut stmt = conn.prepare(
        "SELECT id, title, amount, payment_mode, for_whom, date, transaction_type,
                payment_received, payment_received_date, is_split
         FROM transactions
         WHERE ?1 IS NULL OR id=?1
         ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![only], |r| {
        Ok((
            RawTransaction {
                id: r.get(0)?,
                title: r.get(1)?,
                amount: r.get(2)?,
                payment_mode: r.get(3)?,
                for_whom: r.get(4)?,
                date: r.get(5)?,
                transaction_type: r.get(6)?,
                payment_received: r.get(7)?,
                payment_received_date: r.get(8)?,
                split_details: None,
            },
            r.get::<_, bool>(9)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (mut raw, is_split) = row?;
        if is_split {
            raw.split_details = Some(shares.remove(&raw.id).unwrap_or_default());
        }
        out.push(raw);
    }
    Ok(out)
}

/// Every stored transaction, newest first, exactly as stored.
pub fn load_raw_transactions(conn: &Connection) -> Result<Vec<RawTransaction>> {
    load_raw(conn, None)
}

pub fn load_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, month, amount, created_at, updated_at FROM budgets ORDER BY month",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, NaiveDate>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, DateTime<Utc>>(3)?,
            r.get::<_, DateTime<Utc>>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, month, amount_s, created_at, updated_at) = row?;
        let amount = amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget amount '{}' for {}", amount_s, month))?;
        out.push(Budget {
            id,
            month,
            amount,
            created_at,
            updated_at,
        });
    }
    Ok(out)
}

pub fn load_snapshot(conn: &Connection) -> Result<Snapshot> {
    let raw = load_raw_transactions(conn)?;
    let budgets = load_budgets(conn)?;
    let snapshot = Snapshot::from_raw(raw, budgets);
    for record in &snapshot.flagged {
        warn!(id = record.id, "{}", record.violation);
    }
    debug!(
        transactions = snapshot.transactions.len(),
        budgets = snapshot.budgets.len(),
        flagged = snapshot.flagged.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let raw = load_raw(conn, Some(id))?
        .pop()
        .ok_or_else(|| anyhow!("Transaction {} not found", id))?;
    let tx = migrate(raw).with_context(|| format!("Transaction {} cannot be read", id))?;
    Ok(tx)
}

fn write_shares(conn: &Connection, tx_id: i64, shares: Option<&[SplitShare]>) -> Result<()> {
    conn.execute(
        "DELETE FROM split_shares WHERE transaction_id=?1",
        params![tx_id],
    )?;
    for (pos, share) in shares.unwrap_or_default().iter().enumerate() {
        conn.execute(
            "INSERT INTO split_shares(transaction_id, position, person, amount, payment_received, payment_received_date)
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                tx_id,
                pos as i64,
                share.person,
                share.amount.to_string(),
                share.payment_received,
                share.payment_received_date.map(|d| d.to_string()),
            ],
        )?;
    }
    Ok(())
}

/// Inserts a validated transaction with its shares. Run inside a SQLite
/// transaction so a failure leaves nothing behind.
pub fn insert_transaction(conn: &Connection, new: &NewTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(title, amount, payment_mode, for_whom, date, transaction_type,
                                  payment_received, payment_received_date, is_split)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        params![
            new.title,
            new.amount.to_string(),
            new.payment_mode.label(),
            new.for_whom,
            new.date.to_string(),
            new.transaction_type.as_str(),
            new.payment_received,
            new.payment_received_date.map(|d| d.to_string()),
            new.split_details.is_some(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    write_shares(conn, id, new.split_details.as_deref())?;
    debug!(id, title = %new.title, "inserted transaction");
    Ok(id)
}

pub fn update_transaction(conn: &Connection, tx: &Transaction) -> Result<()> {
    let changed = conn.execute(
        "UPDATE transactions SET title=?2, amount=?3, payment_mode=?4, for_whom=?5, date=?6,
                transaction_type=?7, payment_received=?8, payment_received_date=?9, is_split=?10
         WHERE id=?1",
        params![
            tx.id,
            tx.title,
            tx.amount.to_string(),
            tx.payment_mode.label(),
            tx.for_whom,
            tx.date.to_string(),
            tx.transaction_type.as_str(),
            tx.payment_received,
            tx.payment_received_date.map(|d| d.to_string()),
            tx.is_split(),
        ],
    )?;
    if changed == 0 {
        return Err(anyhow!("Transaction {} not found", tx.id));
    }
    write_shares(conn, tx.id, tx.split_details.as_deref())?;
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(n > 0)
}

pub fn budget_for_month(conn: &Connection, month: NaiveDate) -> Result<Option<Budget>> {
    let month = first_of_month(month);
    let row = conn
        .query_row(
            "SELECT id, amount, created_at, updated_at FROM budgets WHERE month=?1",
            params![month],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, DateTime<Utc>>(2)?,
                    r.get::<_, DateTime<Utc>>(3)?,
                ))
            },
        )
        .optional()?;
    let Some((id, amount_s, created_at, updated_at)) = row else {
        return Ok(None);
    };
    let amount = amount_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid budget amount '{}' for {}", amount_s, month))?;
    Ok(Some(Budget {
        id,
        month,
        amount,
        created_at,
        updated_at,
    }))
}

/// One budget per month: a second call for the same month amends the amount
/// and `updated_at` and keeps `created_at`.
pub fn upsert_budget(
    conn: &Connection,
    month: NaiveDate,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Budget> {
    let amount = validate_budget_amount(amount)?;
    let month = first_of_month(month);
    conn.execute(
        "INSERT INTO budgets(month, amount, created_at, updated_at) VALUES (?1,?2,?3,?3)
         ON CONFLICT(month) DO UPDATE SET amount=excluded.amount, updated_at=excluded.updated_at",
        params![month, amount.to_string(), now],
    )?;
    debug!(%month, %amount, "budget set");
    budget_for_month(conn, month)?.ok_or_else(|| anyhow!("Budget for {} vanished", month))
}

pub fn delete_budget(conn: &Connection, month: NaiveDate) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM budgets WHERE month=?1",
        params![first_of_month(month)],
    )?;
    Ok(n > 0)
}
