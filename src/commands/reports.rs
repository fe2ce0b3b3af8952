// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::config::currency;
use crate::db;
use crate::engine::{
    BudgetStatus, MIN_TREND_MONTHS, MonthlySummary, Trend, budget_status, for_whom_options,
};
use crate::utils::{fmt_money, maybe_print_json, month_label, pretty_table};

use super::budgets::status_rows;
use super::month_or_current;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("collect", sub)) => collect(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        Some(("people", _)) => people(conn)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport {
    summary: MonthlySummary,
    budget: BudgetStatus,
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let snapshot = db::load_snapshot(conn)?;
    let summary = snapshot.summary(month);
    let budget = budget_status(snapshot.budget_for(month), summary.net_amount);

    let report = SummaryReport { summary, budget };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let ccy = currency(conn)?;
    let s = &report.summary;
    let money = |v| fmt_money(v, &ccy);
    let mut rows = vec![
        vec!["Spent by me".to_string(), money(s.total_spent_by_me)],
        vec!["Spent for others".to_string(), money(s.total_spent_for_others)],
        vec!["  received".to_string(), money(s.total_received)],
        vec!["  pending".to_string(), money(s.total_pending)],
        vec!["Income".to_string(), money(s.total_income)],
        vec!["Donations".to_string(), money(s.total_donations)],
        vec!["Lent".to_string(), money(s.total_lent)],
        vec!["  received".to_string(), money(s.received_lent)],
        vec!["  pending".to_string(), money(s.pending_lent)],
        vec!["Net amount".to_string(), money(s.net_amount)],
    ];
    for (mode, total) in &s.payment_mode_totals {
        rows.push(vec![format!("Paid by {}", mode), money(*total)]);
    }
    if s.unparseable.count > 0 {
        rows.push(vec![
            format!("Unreadable records ({})", s.unparseable.count),
            money(s.unparseable.amount),
        ]);
    }

    println!(
        "{} ({} transactions)",
        month_label(s.month),
        s.transaction_count
    );
    println!("{}", pretty_table(&["", "Amount"], rows));
    println!(
        "{}",
        pretty_table(&["Budget", ""], status_rows(&report.budget, &ccy))
    );
    if s.unparseable.count > 0 {
        println!("Run `pocketbook doctor` to see the unreadable records.");
    }
    Ok(())
}

fn collect(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let snapshot = db::load_snapshot(conn)?;
    let groups = snapshot.summary(month).money_to_collect;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &groups)? {
        return Ok(());
    }

    let ccy = currency(conn)?;
    let mut rows = Vec::new();
    for group in &groups {
        rows.push(vec![
            group.person.clone(),
            fmt_money(group.amount, &ccy),
            group.count.to_string(),
            String::new(),
        ]);
        for entry in &group.entries {
            let title = if entry.from_split {
                format!("{} (split)", entry.title)
            } else {
                entry.title.clone()
            };
            rows.push(vec![
                String::new(),
                fmt_money(entry.amount, &ccy),
                entry.date.to_string(),
                format!("#{} {} [{}]", entry.transaction_id, title, entry.transaction_type),
            ]);
        }
    }
    if rows.is_empty() {
        println!("Nothing to collect for {}", month_label(month));
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(&["Person", "Amount", "Count / Date", "Transaction"], rows)
    );
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let trend = db::load_snapshot(conn)?.trend();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &trend)? {
        return Ok(());
    }
    match &trend {
        Trend::NotEnoughData { months_with_data } => {
            println!(
                "Tracked {} of {} months. Track {} more to unlock spending trends.",
                months_with_data,
                MIN_TREND_MONTHS,
                trend.months_needed()
            );
        }
        Trend::Series { points } => {
            let ccy = currency(conn)?;
            let rows = points
                .iter()
                .map(|p| {
                    vec![
                        p.label.clone(),
                        fmt_money(p.total_spent_by_me, &ccy),
                        fmt_money(p.total_pending, &ccy),
                        fmt_money(p.net_amount, &ccy),
                        p.budget.map_or("-".to_string(), |b| fmt_money(b, &ccy)),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Month", "Spent by me", "Pending", "Net", "Budget"], rows)
            );
        }
    }
    Ok(())
}

fn people(conn: &Connection) -> Result<()> {
    let snapshot = db::load_snapshot(conn)?;
    for name in for_whom_options(&snapshot.transactions) {
        println!("{}", name);
    }
    Ok(())
}
