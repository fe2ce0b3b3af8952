// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::info;

use crate::config::currency;
use crate::db;
use crate::engine::split::parse_shares;
use crate::engine::transaction::{
    TransactionDraft, parse_amount, revise, set_payment_received, set_share_received, validate,
};
use crate::engine::{FilterCriteria, filter};
use crate::error::ValidationError;
use crate::models::{PaymentMode, SELF_PARTY, Transaction, TransactionType};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, today};

use super::month_or_current;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("receive", sub)) => receive(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_id(sub: &clap::ArgMatches) -> Result<i64> {
    let raw = sub.get_one::<String>("id").context("--id is required")?;
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", raw))
}

fn opt<'a>(sub: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    sub.get_one::<String>(name).map(|s| s.as_str())
}

fn flag(sub: &clap::ArgMatches, name: &str) -> bool {
    sub.try_get_one::<bool>(name)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

/// Builds a draft from the command line, falling back to `base` for any
/// field that was not given.
pub fn draft_from_args(
    sub: &clap::ArgMatches,
    base: Option<&Transaction>,
    today: NaiveDate,
) -> Result<TransactionDraft> {
    let title = match (opt(sub, "title"), base) {
        (Some(t), _) => t.to_string(),
        (None, Some(b)) => b.title.clone(),
        (None, None) => return Err(ValidationError::EmptyTitle.into()),
    };
    let amount = match (opt(sub, "amount"), base) {
        (Some(a), _) => parse_amount(a)?,
        (None, Some(b)) => b.amount,
        (None, None) => return Err(ValidationError::InvalidAmount(String::new()).into()),
    };
    let payment_mode = match (opt(sub, "mode"), base) {
        (Some(m), _) => m.parse::<PaymentMode>()?,
        (None, Some(b)) => b.payment_mode,
        (None, None) => PaymentMode::CreditCard,
    };
    let date = match (opt(sub, "date"), base) {
        (Some(d), _) => parse_date(d)?,
        (None, Some(b)) => b.date,
        (None, None) => today,
    };
    let transaction_type = match (opt(sub, "type"), base) {
        (Some(t), _) => t.parse::<TransactionType>()?,
        (None, Some(b)) => b.transaction_type,
        (None, None) => TransactionType::Expense,
    };

    let mut draft =
        TransactionDraft::new(title, amount, payment_mode, date).of_type(transaction_type);

    let no_split = flag(sub, "no_split");
    draft.split = match (opt(sub, "split"), base) {
        (Some(input), _) => Some(parse_shares(input, amount).map_err(ValidationError::from)?),
        (None, Some(b)) if !no_split => b.split_details.clone(),
        _ => None,
    };

    draft.for_whom = match (opt(sub, "for"), base) {
        (Some(w), _) => w.to_string(),
        (None, Some(b)) if draft.split.is_none() && b.is_split() => {
            return Err(anyhow!("--no-split needs --for to name the counterparty"));
        }
        (None, Some(b)) => b.for_whom.clone(),
        (None, None) => SELF_PARTY.to_string(),
    };

    draft.payment_received = if flag(sub, "received") {
        true
    } else if flag(sub, "pending") {
        false
    } else {
        base.is_some_and(|b| b.payment_received)
    };
    Ok(draft)
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = today();
    let draft = draft_from_args(sub, None, today)?;
    let new = validate(draft, today)?;

    let tx = conn.transaction()?;
    let id = db::insert_transaction(&tx, &new)?;
    tx.commit()?;

    info!(id, "transaction recorded");
    println!(
        "Recorded #{} {} '{}' on {} ({}, {})",
        id,
        fmt_money(new.amount, &currency(conn)?),
        new.title,
        new.date,
        new.transaction_type,
        new.for_whom
    );
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    let today = today();
    let existing = db::get_transaction(conn, id)?;
    let draft = draft_from_args(sub, Some(&existing), today)?;
    let updated = revise(&existing, draft, today)?;

    let tx = conn.transaction()?;
    db::update_transaction(&tx, &updated)?;
    tx.commit()?;
    println!("Updated #{} '{}'", id, updated.title);
    Ok(())
}

fn remove(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    if db::delete_transaction(conn, id)? {
        println!("Deleted #{}", id);
    } else {
        println!("No transaction #{}", id);
    }
    Ok(())
}

fn receive(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    let received = !sub.get_flag("undo");
    let existing = db::get_transaction(conn, id)?;
    let updated = match sub.get_one::<String>("person") {
        Some(person) => set_share_received(&existing, person, received, today())?,
        None => set_payment_received(&existing, received, today())?,
    };

    let tx = conn.transaction()?;
    db::update_transaction(&tx, &updated)?;
    tx.commit()?;
    println!(
        "#{} marked {}",
        id,
        if received { "received" } else { "pending" }
    );
    Ok(())
}

/// Criteria from `tx list` flags; an empty multi-select means no restriction.
pub fn criteria_from_args(sub: &clap::ArgMatches) -> Result<FilterCriteria> {
    let values = |name: &str| -> Vec<String> {
        sub.get_many::<String>(name)
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default()
    };
    let types = values("type")
        .iter()
        .map(|t| t.parse::<TransactionType>())
        .collect::<Result<Vec<_>, _>>()?;
    let modes = values("mode")
        .iter()
        .map(|m| m.parse::<PaymentMode>())
        .collect::<Result<Vec<_>, _>>()?;
    let people: Vec<String> = values("for")
        .iter()
        .map(|p| crate::engine::canonical_party(p))
        .collect();

    Ok(FilterCriteria::for_month(month_or_current(sub)?)
        .with_types(types)
        .with_modes(modes)
        .with_people(people))
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let criteria = criteria_from_args(sub)?;
    let snapshot = db::load_snapshot(conn)?;
    Ok(filter(&snapshot.transactions, &criteria))
}

pub fn status_label(tx: &Transaction) -> String {
    if let Some(shares) = &tx.split_details {
        let others: Vec<_> = shares.iter().filter(|s| !s.is_self()).collect();
        let got = others.iter().filter(|s| s.payment_received).count();
        return format!("{}/{} received", got, others.len());
    }
    if !tx.is_receivable() {
        return "-".to_string();
    }
    match tx.payment_received_date {
        Some(d) if tx.payment_received => format!("Received {}", d),
        _ if tx.payment_received => "Received".to_string(),
        _ => "Pending".to_string(),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    let ccy = currency(conn)?;
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|tx| {
            vec![
                tx.id.to_string(),
                tx.date.to_string(),
                tx.title.clone(),
                fmt_money(tx.amount, &ccy),
                tx.payment_mode.to_string(),
                tx.for_whom.clone(),
                tx.transaction_type.to_string(),
                status_label(tx),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Title", "Amount", "Mode", "For/From", "Type", "Status"],
            rows,
        )
    );
    Ok(())
}
