// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Canonical counterparty name for the user themself.
pub const SELF_PARTY: &str = "Self";
/// Sentinel stored in `for_whom` on split transactions.
pub const SPLIT_PARTY: &str = "Split";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Cash")]
    Cash,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 4] = [
        PaymentMode::CreditCard,
        PaymentMode::DebitCard,
        PaymentMode::Upi,
        PaymentMode::Cash,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMode::CreditCard => "Credit Card",
            PaymentMode::DebitCard => "Debit Card",
            PaymentMode::Upi => "UPI",
            PaymentMode::Cash => "Cash",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMode {
    type Err = ValidationError;

    /// Accepts the display label in any case, with or without the separator
    /// ("Credit Card", "credit-card", "creditcard", "upi").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "creditcard" => Ok(PaymentMode::CreditCard),
            "debitcard" => Ok(PaymentMode::DebitCard),
            "upi" => Ok(PaymentMode::Upi),
            "cash" => Ok(PaymentMode::Cash),
            _ => Err(ValidationError::UnknownPaymentMode(s.to_string())),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
    Donation,
    Lent,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Expense,
        TransactionType::Income,
        TransactionType::Donation,
        TransactionType::Lent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::Donation => "donation",
            TransactionType::Lent => "lent",
        }
    }

    /// Types for which money can be owed back by a non-Self counterparty.
    pub fn is_collectible(self) -> bool {
        !matches!(self, TransactionType::Income)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            "donation" => Ok(TransactionType::Donation),
            "lent" => Ok(TransactionType::Lent),
            _ => Err(ValidationError::UnknownTransactionType(s.to_string())),
        }
    }
}

/// One person's portion of a split expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitShare {
    pub person: String,
    pub amount: Decimal,
    #[serde(default)]
    pub payment_received: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_received_date: Option<NaiveDate>,
}

impl SplitShare {
    pub fn new(person: impl Into<String>, amount: Decimal) -> Self {
        Self {
            person: person.into(),
            amount,
            payment_received: false,
            payment_received_date: None,
        }
    }

    pub fn is_self(&self) -> bool {
        self.person == SELF_PARTY
    }
}

/// A validated transaction that has not been assigned a store id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub title: String,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub for_whom: String,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    pub payment_received: bool,
    pub payment_received_date: Option<NaiveDate>,
    pub split_details: Option<Vec<SplitShare>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub for_whom: String,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub payment_received: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_received_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_details: Option<Vec<SplitShare>>,
}

impl Transaction {
    pub fn from_new(id: i64, new: NewTransaction) -> Self {
        Self {
            id,
            title: new.title,
            amount: new.amount,
            payment_mode: new.payment_mode,
            for_whom: new.for_whom,
            date: new.date,
            transaction_type: new.transaction_type,
            payment_received: new.payment_received,
            payment_received_date: new.payment_received_date,
            split_details: new.split_details,
        }
    }

    pub fn is_split(&self) -> bool {
        self.split_details.is_some()
    }

    pub fn is_self(&self) -> bool {
        self.for_whom == SELF_PARTY
    }

    /// Whether `payment_received` carries meaning for this record.
    pub fn is_receivable(&self) -> bool {
        !self.is_split() && is_receivable(self.transaction_type, &self.for_whom)
    }
}

pub fn is_receivable(transaction_type: TransactionType, for_whom: &str) -> bool {
    transaction_type.is_collectible() && for_whom != SELF_PARTY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    /// First day of the month this budget covers.
    pub month: NaiveDate,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
