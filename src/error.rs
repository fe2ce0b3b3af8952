// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Rejection of a transaction or budget on the write path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,
    #[error("Invalid amount '{0}', expected a number")]
    InvalidAmount(String),
    #[error("Amount must be greater than 0 (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("Counterparty must not be empty")]
    EmptyCounterparty,
    #[error("Lent transactions cannot be for Self")]
    LentToSelf,
    #[error("'{0}' is reserved for split transactions")]
    ReservedCounterparty(String),
    #[error("Only expense transactions can be split (got {0})")]
    SplitRequiresExpense(String),
    #[error("Unknown payment mode '{0}' (use Credit Card, Debit Card, UPI or Cash)")]
    UnknownPaymentMode(String),
    #[error("Unknown transaction type '{0}' (use expense, income, donation or lent)")]
    UnknownTransactionType(String),
    #[error("Budget amount must be greater than 0 (got {0})")]
    NonPositiveBudget(Decimal),
    #[error("Transaction {0} is not split")]
    NotSplit(i64),
    #[error("Transaction {0} has nothing to collect")]
    NotReceivable(i64),
    #[error("No share for '{person}' on transaction {id}")]
    UnknownParticipant { id: i64, person: String },
    #[error("The Self share is never collected")]
    SelfShareNotCollectible,
    #[error("Invalid split: {0}")]
    InvalidSplit(#[from] InvalidSplit),
}

/// A split share list that breaks one of the split invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidSplit {
    #[error("a split needs at least 2 people (got {0})")]
    TooFewShares(usize),
    #[error("share #{0} has no person")]
    EmptyPerson(usize),
    #[error("share for '{person}' is negative ({amount})")]
    NegativeShare { person: String, amount: Decimal },
    #[error("'{0}' appears more than once")]
    DuplicatePerson(String),
    #[error("one share must belong to Self")]
    MissingSelf,
    #[error("shares add up to {sum} but the total is {total}")]
    SumMismatch { total: Decimal, sum: Decimal },
    #[error("share for '{0}' has no amount")]
    MissingAmount(String),
    #[error("malformed share '{0}', expected NAME=AMOUNT")]
    Malformed(String),
}

/// A stored record that does not fit the transaction shape.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataContractViolation {
    #[error("record {id}: unknown payment mode '{value}'")]
    PaymentMode { id: i64, value: String },
    #[error("record {id}: unknown transaction type '{value}'")]
    TransactionType { id: i64, value: String },
    #[error("record {id}: unparseable date '{value}'")]
    Date { id: i64, value: String },
    #[error("record {id}: unparseable amount '{value}'")]
    Amount { id: i64, value: String },
    #[error("record {id}: split without shares")]
    Split { id: i64 },
}

impl DataContractViolation {
    pub fn kind(&self) -> &'static str {
        match self {
            DataContractViolation::PaymentMode { .. } => "payment_mode",
            DataContractViolation::TransactionType { .. } => "transaction_type",
            DataContractViolation::Date { .. } => "date",
            DataContractViolation::Amount { .. } => "amount",
            DataContractViolation::Split { .. } => "split",
        }
    }
}
