// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Write-path rules for transactions: what a payload must look like before it
//! is stored, and how received flags move.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::{
    NewTransaction, PaymentMode, SELF_PARTY, SPLIT_PARTY, SplitShare, Transaction,
    TransactionType, is_receivable,
};

use super::split;

/// Trims a counterparty name and maps any casing of "self" to `Self`.
pub fn canonical_party(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(SELF_PARTY) {
        SELF_PARTY.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))
}

/// A transaction as entered, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub title: String,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub for_whom: String,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    pub payment_received: bool,
    pub split: Option<Vec<SplitShare>>,
}

impl TransactionDraft {
    /// An expense for Self; adjust the public fields for anything else.
    pub fn new(
        title: impl Into<String>,
        amount: Decimal,
        payment_mode: PaymentMode,
        date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            payment_mode,
            for_whom: SELF_PARTY.to_string(),
            date,
            transaction_type: TransactionType::Expense,
            payment_received: false,
            split: None,
        }
    }

    pub fn for_whom(mut self, who: impl Into<String>) -> Self {
        self.for_whom = who.into();
        self
    }

    pub fn of_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn received(mut self, received: bool) -> Self {
        self.payment_received = received;
        self
    }

    pub fn split(mut self, shares: Vec<SplitShare>) -> Self {
        self.split = Some(shares);
        self
    }
}

/// Validates a new transaction. Received dates are stamped with `today`.
pub fn validate(draft: TransactionDraft, today: NaiveDate) -> Result<NewTransaction, ValidationError> {
    build(draft, None, today)
}

/// Validates an edit of `existing`, keeping received dates that are still valid.
pub fn revise(
    existing: &Transaction,
    draft: TransactionDraft,
    today: NaiveDate,
) -> Result<Transaction, ValidationError> {
    let new = build(draft, Some(existing), today)?;
    Ok(Transaction::from_new(existing.id, new))
}

fn build(
    draft: TransactionDraft,
    previous: Option<&Transaction>,
    today: NaiveDate,
) -> Result<NewTransaction, ValidationError> {
    let title = draft.title.trim().to_string();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if draft.amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(draft.amount));
    }

    if let Some(shares) = draft.split {
        if draft.transaction_type != TransactionType::Expense {
            return Err(ValidationError::SplitRequiresExpense(
                draft.transaction_type.to_string(),
            ));
        }
        let mut shares = split::resolve(shares, draft.amount)?;
        let previous_shares = previous.and_then(|tx| tx.split_details.as_deref());
        for share in shares.iter_mut().filter(|s| !s.is_self()) {
            let before = previous_shares
                .and_then(|prev| prev.iter().find(|p| p.person == share.person))
                .map(|p| (p.payment_received, p.payment_received_date));
            share.payment_received_date =
                received_date(share.payment_received, before, today);
        }
        return Ok(NewTransaction {
            title,
            amount: draft.amount,
            payment_mode: draft.payment_mode,
            for_whom: SPLIT_PARTY.to_string(),
            date: draft.date,
            transaction_type: draft.transaction_type,
            payment_received: false,
            payment_received_date: None,
            split_details: Some(shares),
        });
    }

    let for_whom = canonical_party(&draft.for_whom);
    if for_whom.is_empty() {
        return Err(ValidationError::EmptyCounterparty);
    }
    if draft.transaction_type == TransactionType::Lent && for_whom == SELF_PARTY {
        return Err(ValidationError::LentToSelf);
    }
    if for_whom.eq_ignore_ascii_case(SPLIT_PARTY) {
        return Err(ValidationError::ReservedCounterparty(for_whom));
    }

    let (payment_received, payment_received_date) =
        if is_receivable(draft.transaction_type, &for_whom) {
            let before = previous
                .filter(|tx| !tx.is_split() && tx.for_whom == for_whom)
                .map(|tx| (tx.payment_received, tx.payment_received_date));
            (
                draft.payment_received,
                received_date(draft.payment_received, before, today),
            )
        } else {
            (false, None)
        };

    Ok(NewTransaction {
        title,
        amount: draft.amount,
        payment_mode: draft.payment_mode,
        for_whom,
        date: draft.date,
        transaction_type: draft.transaction_type,
        payment_received,
        payment_received_date,
        split_details: None,
    })
}

fn received_date(
    received: bool,
    before: Option<(bool, Option<NaiveDate>)>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if !received {
        return None;
    }
    match before {
        Some((true, Some(date))) => Some(date),
        _ => Some(today),
    }
}

/// Marks a whole (non-split) transaction as received or pending.
pub fn set_payment_received(
    tx: &Transaction,
    received: bool,
    today: NaiveDate,
) -> Result<Transaction, ValidationError> {
    if !tx.is_receivable() {
        return Err(ValidationError::NotReceivable(tx.id));
    }
    let mut updated = tx.clone();
    updated.payment_received_date = received_date(
        received,
        Some((tx.payment_received, tx.payment_received_date)),
        today,
    );
    updated.payment_received = received;
    Ok(updated)
}

/// Marks one person's share of a split transaction as received or pending.
pub fn set_share_received(
    tx: &Transaction,
    person: &str,
    received: bool,
    today: NaiveDate,
) -> Result<Transaction, ValidationError> {
    let person = canonical_party(person);
    if person == SELF_PARTY {
        return Err(ValidationError::SelfShareNotCollectible);
    }
    let mut updated = tx.clone();
    let shares = updated
        .split_details
        .as_mut()
        .ok_or(ValidationError::NotSplit(tx.id))?;
    let share = shares
        .iter_mut()
        .find(|s| s.person.eq_ignore_ascii_case(&person))
        .ok_or_else(|| ValidationError::UnknownParticipant {
            id: tx.id,
            person: person.clone(),
        })?;
    share.payment_received_date = received_date(
        received,
        Some((share.payment_received, share.payment_received_date)),
        today,
    );
    share.payment_received = received;
    Ok(updated)
}
