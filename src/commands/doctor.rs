// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::db;
use crate::engine::{Snapshot, resolve};
use crate::models::TransactionType;
use crate::utils::pretty_table;

/// One row per problem: (issue kind, transaction id, detail).
pub fn find_issues(snapshot: &Snapshot) -> Vec<(String, i64, String)> {
    let mut issues = Vec::new();

    for record in &snapshot.flagged {
        issues.push((
            record.violation.kind().to_string(),
            record.id,
            record.violation.to_string(),
        ));
    }

    for tx in &snapshot.transactions {
        let Some(shares) = &tx.split_details else {
            continue;
        };
        if tx.transaction_type != TransactionType::Expense {
            issues.push((
                "split_not_expense".into(),
                tx.id,
                format!("split stored on a {} record", tx.transaction_type),
            ));
        }
        if let Err(e) = resolve(shares.clone(), tx.amount) {
            issues.push(("invalid_split".into(), tx.id, e.to_string()));
        }
    }
    issues
}

pub fn handle(conn: &Connection) -> Result<()> {
    let snapshot = db::load_snapshot(conn)?;
    let rows: Vec<Vec<String>> = find_issues(&snapshot)
        .into_iter()
        .map(|(kind, id, detail)| vec![kind, id.to_string(), detail])
        .collect();

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "ID", "Detail"], rows));
    }
    Ok(())
}
