// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The storage-read boundary. Rows come in as loosely typed [`RawTransaction`]s
//! (older rows lack a type or a received flag); [`migrate`] turns each one into
//! a fully populated [`Transaction`] or a [`DataContractViolation`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::DataContractViolation;
use crate::models::{
    Budget, PaymentMode, SELF_PARTY, SPLIT_PARTY, SplitShare, Transaction, TransactionType,
    is_receivable,
};
use crate::utils::{first_of_month, same_month};

use super::summary::{MonthlySummary, aggregate};
use super::transaction::canonical_party;
use super::trend::{Trend, trend};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSplitShare {
    pub person: String,
    pub amount: String,
    pub payment_received: Option<bool>,
    pub payment_received_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTransaction {
    pub id: i64,
    pub title: String,
    pub amount: String,
    pub payment_mode: String,
    pub for_whom: String,
    pub date: String,
    pub transaction_type: Option<String>,
    pub payment_received: Option<bool>,
    pub payment_received_date: Option<String>,
    pub split_details: Option<Vec<RawSplitShare>>,
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // Timestamps written by other tools carry a time part; only the day matters.
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_money(raw: &str) -> Option<Decimal> {
    raw.trim().parse::<Decimal>().ok()
}

pub fn migrate(raw: RawTransaction) -> Result<Transaction, DataContractViolation> {
    let id = raw.id;
    let date = parse_day(&raw.date).ok_or_else(|| DataContractViolation::Date {
        id,
        value: raw.date.clone(),
    })?;
    let amount = parse_money(&raw.amount).ok_or_else(|| DataContractViolation::Amount {
        id,
        value: raw.amount.clone(),
    })?;
    let payment_mode = raw
        .payment_mode
        .parse::<PaymentMode>()
        .map_err(|_| DataContractViolation::PaymentMode {
            id,
            value: raw.payment_mode.clone(),
        })?;
    let transaction_type = match raw.transaction_type.as_deref().map(str::trim) {
        None | Some("") => TransactionType::Expense,
        Some(value) => value
            .parse::<TransactionType>()
            .map_err(|_| DataContractViolation::TransactionType {
                id,
                value: value.to_string(),
            })?,
    };

    let split_details = match raw.split_details {
        Some(shares) if shares.is_empty() => return Err(DataContractViolation::Split { id }),
        Some(shares) => {
            let mut out = Vec::with_capacity(shares.len());
            for share in shares {
                let share_amount =
                    parse_money(&share.amount).ok_or_else(|| DataContractViolation::Amount {
                        id,
                        value: share.amount.clone(),
                    })?;
                let person = canonical_party(&share.person);
                let received = share.payment_received.unwrap_or(false) && person != SELF_PARTY;
                out.push(SplitShare {
                    person,
                    amount: share_amount,
                    payment_received: received,
                    payment_received_date: if received {
                        share.payment_received_date.as_deref().and_then(parse_day)
                    } else {
                        None
                    },
                });
            }
            Some(out)
        }
        None => None,
    };

    let for_whom = if split_details.is_some() {
        SPLIT_PARTY.to_string()
    } else {
        canonical_party(&raw.for_whom)
    };
    // The sentinel without shares would read as a debt owed by "Split".
    if split_details.is_none() && for_whom.eq_ignore_ascii_case(SPLIT_PARTY) {
        return Err(DataContractViolation::Split { id });
    }
    let receivable = split_details.is_none() && is_receivable(transaction_type, &for_whom);
    let payment_received = receivable && raw.payment_received.unwrap_or(false);
    let payment_received_date = if payment_received {
        raw.payment_received_date.as_deref().and_then(parse_day)
    } else {
        None
    };

    Ok(Transaction {
        id,
        title: raw.title.trim().to_string(),
        amount,
        payment_mode,
        for_whom,
        date,
        transaction_type,
        payment_received,
        payment_received_date,
        split_details,
    })
}

/// A stored record that failed migration, with whatever could still be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedRecord {
    pub id: i64,
    pub title: String,
    pub month: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub violation: DataContractViolation,
}

impl FlaggedRecord {
    /// Records with an unknown month could belong to any month.
    pub fn concerns(&self, month: NaiveDate) -> bool {
        self.month.is_none_or(|m| same_month(m, month))
    }
}

/// A consistent view of the store: everything the engine needs for one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub flagged: Vec<FlaggedRecord>,
}

impl Snapshot {
    pub fn from_raw(raw: Vec<RawTransaction>, budgets: Vec<Budget>) -> Self {
        let mut transactions = Vec::with_capacity(raw.len());
        let mut flagged = Vec::new();
        for record in raw {
            let id = record.id;
            let title = record.title.trim().to_string();
            let month = parse_day(&record.date).map(first_of_month);
            let amount = parse_money(&record.amount);
            match migrate(record) {
                Ok(tx) => transactions.push(tx),
                Err(violation) => flagged.push(FlaggedRecord {
                    id,
                    title,
                    month,
                    amount,
                    violation,
                }),
            }
        }
        Self {
            transactions,
            budgets,
            flagged,
        }
    }

    pub fn summary(&self, month: NaiveDate) -> MonthlySummary {
        aggregate(&self.transactions, month).with_flagged(&self.flagged)
    }

    pub fn trend(&self) -> Trend {
        trend(&self.transactions, &self.budgets)
    }

    pub fn budget_for(&self, month: NaiveDate) -> Option<&Budget> {
        super::budget::budget_for_month(&self.budgets, month)
    }
}
