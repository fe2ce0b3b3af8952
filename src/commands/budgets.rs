// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::currency;
use crate::db;
use crate::engine::{BudgetStatus, budget_status};
use crate::utils::{
    fmt_money, maybe_print_json, month_key, month_label, parse_decimal, pretty_table,
};

use super::month_or_current;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let raw = sub
        .get_one::<String>("amount")
        .context("--amount is required")?;
    let amount = parse_decimal(raw)?;
    let budget = db::upsert_budget(conn, month, amount, Utc::now())?;
    info!(month = %month_key(budget.month), "budget saved");
    println!(
        "Budget for {} = {}",
        month_label(budget.month),
        fmt_money(budget.amount, &currency(conn)?)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let budgets = db::load_budgets(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        return Ok(());
    }
    let ccy = currency(conn)?;
    let data = budgets
        .iter()
        .rev()
        .map(|b| {
            vec![
                month_key(b.month),
                fmt_money(b.amount, &ccy),
                b.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Budget", "Updated"], data));
    Ok(())
}

/// Budget status for a month, computed from the month's net amount.
pub fn month_status(conn: &Connection, month: chrono::NaiveDate) -> Result<BudgetStatus> {
    let snapshot = db::load_snapshot(conn)?;
    let summary = snapshot.summary(month);
    Ok(budget_status(snapshot.budget_for(month), summary.net_amount))
}

pub fn status_rows(status: &BudgetStatus, ccy: &str) -> Vec<Vec<String>> {
    let money = |v: Option<Decimal>| v.map_or("-".to_string(), |d| fmt_money(d, ccy));
    vec![
        vec!["Budget".into(), money(status.budget)],
        vec!["Spent".into(), fmt_money(status.spent, ccy)],
        vec!["Remaining".into(), money(status.remaining)],
        vec![
            "Used".into(),
            status
                .percentage
                .map_or("-".to_string(), |p| format!("{:.1}%", p)),
        ],
        vec![
            "Status".into(),
            format!("{} ({})", status.tier.as_str(), status.tier.color()),
        ],
    ]
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let status = month_status(conn, month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &status)? {
        return Ok(());
    }
    println!("{}", month_label(month));
    println!(
        "{}",
        pretty_table(&["", "Amount"], status_rows(&status, &currency(conn)?))
    );
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    if db::delete_budget(conn, month)? {
        println!("Removed budget for {}", month_label(month));
    } else {
        println!("No budget for {}", month_label(month));
    }
    Ok(())
}
