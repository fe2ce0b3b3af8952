// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Split expenses: validation of share lists and their expansion into
//! per-person receivables.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::InvalidSplit;
use crate::models::{PaymentMode, SplitShare, Transaction, TransactionType};

use super::transaction::canonical_party;

/// Largest accepted gap between the total and the sum of its shares.
pub const SPLIT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Validates `shares` against `total` and canonicalizes person names.
///
/// The Self share never carries a received flag.
pub fn resolve(shares: Vec<SplitShare>, total: Decimal) -> Result<Vec<SplitShare>, InvalidSplit> {
    if shares.len() < 2 {
        return Err(InvalidSplit::TooFewShares(shares.len()));
    }

    let mut seen = HashSet::with_capacity(shares.len());
    let mut has_self = false;
    let mut sum = Decimal::ZERO;
    let mut resolved = Vec::with_capacity(shares.len());

    for (idx, mut share) in shares.into_iter().enumerate() {
        let person = canonical_party(&share.person);
        if person.is_empty() {
            return Err(InvalidSplit::EmptyPerson(idx + 1));
        }
        if share.amount < Decimal::ZERO {
            return Err(InvalidSplit::NegativeShare {
                person,
                amount: share.amount,
            });
        }
        if !seen.insert(person.to_lowercase()) {
            return Err(InvalidSplit::DuplicatePerson(person));
        }

        share.person = person;
        if share.is_self() {
            has_self = true;
            share.payment_received = false;
            share.payment_received_date = None;
        } else if !share.payment_received {
            share.payment_received_date = None;
        }
        sum += share.amount;
        resolved.push(share);
    }

    if !has_self {
        return Err(InvalidSplit::MissingSelf);
    }
    if (total - sum).abs() > SPLIT_TOLERANCE {
        return Err(InvalidSplit::SumMismatch { total, sum });
    }
    Ok(resolved)
}

/// Amount left for the last participant once the others are known, floored at 0.
///
/// Advisory only: the result still goes through [`resolve`].
pub fn remaining_share(total: Decimal, others: &[Decimal]) -> Decimal {
    let rest = total - others.iter().copied().sum::<Decimal>();
    rest.max(Decimal::ZERO)
}

/// Parses `Self=300,Raj=300,Priya=` into shares. At most the last entry may
/// leave its amount blank; it is filled with [`remaining_share`].
pub fn parse_shares(input: &str, total: Decimal) -> Result<Vec<SplitShare>, InvalidSplit> {
    let entries: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut shares = Vec::with_capacity(entries.len());
    let mut known = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let (person, raw_amount) = match entry.split_once('=') {
            Some((p, a)) => (p.trim(), a.trim()),
            None => (entry.trim(), ""),
        };
        if person.is_empty() {
            return Err(InvalidSplit::Malformed((*entry).to_string()));
        }
        let amount = if raw_amount.is_empty() {
            if idx + 1 != entries.len() {
                return Err(InvalidSplit::MissingAmount(person.to_string()));
            }
            remaining_share(total, &known)
        } else {
            raw_amount
                .parse::<Decimal>()
                .map_err(|_| InvalidSplit::Malformed((*entry).to_string()))?
        };
        known.push(amount);
        shares.push(SplitShare::new(person, amount));
    }
    Ok(shares)
}

/// Something a counterparty owes back: a whole transaction, or one non-Self
/// share of a split expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    pub transaction_id: i64,
    pub person: String,
    pub amount: Decimal,
    pub payment_received: bool,
    pub payment_received_date: Option<NaiveDate>,
    pub title: String,
    pub date: NaiveDate,
    pub payment_mode: PaymentMode,
    pub transaction_type: TransactionType,
    pub from_split: bool,
}

impl Receivable {
    /// Receivable for a non-split record; `None` for Self-targeted or income records.
    pub fn from_transaction(tx: &Transaction) -> Option<Self> {
        if !tx.is_receivable() {
            return None;
        }
        Some(Self {
            transaction_id: tx.id,
            person: tx.for_whom.clone(),
            amount: tx.amount,
            payment_received: tx.payment_received,
            payment_received_date: tx.payment_received_date,
            title: tx.title.clone(),
            date: tx.date,
            payment_mode: tx.payment_mode,
            transaction_type: tx.transaction_type,
            from_split: false,
        })
    }
}

/// One receivable per non-Self share; empty for non-split records.
pub fn expand(tx: &Transaction) -> Vec<Receivable> {
    let Some(shares) = tx.split_details.as_deref() else {
        return Vec::new();
    };
    shares
        .iter()
        .filter(|share| !share.is_self())
        .map(|share| Receivable {
            transaction_id: tx.id,
            person: share.person.clone(),
            amount: share.amount,
            payment_received: share.payment_received,
            payment_received_date: share.payment_received_date,
            title: tx.title.clone(),
            date: tx.date,
            payment_mode: tx.payment_mode,
            transaction_type: tx.transaction_type,
            from_split: true,
        })
        .collect()
}

/// The user's own portion of a split expense.
pub fn self_share(tx: &Transaction) -> Option<Decimal> {
    tx.split_details
        .as_deref()?
        .iter()
        .find(|share| share.is_self())
        .map(|share| share.amount)
}
