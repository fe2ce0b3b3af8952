// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{PaymentMode, Transaction, TransactionType};
use crate::utils::{first_of_month, same_month};

use super::records::FlaggedRecord;
use super::split::{Receivable, expand, self_share};

/// Everything one person owes back for the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionGroup {
    pub person: String,
    pub amount: Decimal,
    pub count: usize,
    /// Newest first.
    pub entries: Vec<Receivable>,
}

/// Stored records that could not be read, reported next to the totals they
/// are missing from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnparseableBucket {
    pub count: usize,
    /// Sum over records whose amount was still readable.
    pub amount: Decimal,
    pub records: Vec<FlaggedRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: NaiveDate,
    pub transaction_count: usize,
    pub total_spent_by_me: Decimal,
    pub total_spent_for_others: Decimal,
    pub total_received: Decimal,
    pub total_pending: Decimal,
    pub total_income: Decimal,
    pub total_donations: Decimal,
    pub total_lent: Decimal,
    pub received_lent: Decimal,
    pub pending_lent: Decimal,
    pub payment_mode_totals: BTreeMap<PaymentMode, Decimal>,
    pub net_amount: Decimal,
    pub money_to_collect: Vec<CollectionGroup>,
    pub unparseable: UnparseableBucket,
}

impl MonthlySummary {
    pub fn empty(month: NaiveDate) -> Self {
        Self {
            month: first_of_month(month),
            transaction_count: 0,
            total_spent_by_me: Decimal::ZERO,
            total_spent_for_others: Decimal::ZERO,
            total_received: Decimal::ZERO,
            total_pending: Decimal::ZERO,
            total_income: Decimal::ZERO,
            total_donations: Decimal::ZERO,
            total_lent: Decimal::ZERO,
            received_lent: Decimal::ZERO,
            pending_lent: Decimal::ZERO,
            payment_mode_totals: PaymentMode::ALL
                .into_iter()
                .map(|mode| (mode, Decimal::ZERO))
                .collect(),
            net_amount: Decimal::ZERO,
            money_to_collect: Vec::new(),
            unparseable: UnparseableBucket::default(),
        }
    }

    /// Attaches the flagged records that may belong to this month.
    pub fn with_flagged(mut self, flagged: &[FlaggedRecord]) -> Self {
        let records: Vec<FlaggedRecord> = flagged
            .iter()
            .filter(|record| record.concerns(self.month))
            .cloned()
            .collect();
        self.unparseable = UnparseableBucket {
            count: records.len(),
            amount: records.iter().filter_map(|r| r.amount).sum(),
            records,
        };
        self
    }

    pub fn pending_collection(&self) -> Decimal {
        self.money_to_collect.iter().map(|g| g.amount).sum()
    }
}

/// Month-scopes `transactions` and rolls them up. Passing an already scoped
/// slice gives the same result.
pub fn aggregate(transactions: &[Transaction], month: NaiveDate) -> MonthlySummary {
    let month = first_of_month(month);
    fold_month(
        month,
        transactions.iter().filter(|tx| same_month(tx.date, month)),
    )
}

pub(crate) fn fold_month<'a>(
    month: NaiveDate,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> MonthlySummary {
    let mut summary = MonthlySummary::empty(month);
    let mut to_collect: Vec<Receivable> = Vec::new();

    for tx in transactions {
        summary.transaction_count += 1;
        match tx.transaction_type {
            TransactionType::Expense => {
                *summary
                    .payment_mode_totals
                    .entry(tx.payment_mode)
                    .or_insert(Decimal::ZERO) += tx.amount;

                let others = if tx.is_split() {
                    summary.total_spent_by_me += self_share(tx).unwrap_or(Decimal::ZERO);
                    expand(tx)
                } else if tx.is_self() {
                    summary.total_spent_by_me += tx.amount;
                    Vec::new()
                } else {
                    Receivable::from_transaction(tx).into_iter().collect()
                };

                for share in others {
                    summary.total_spent_for_others += share.amount;
                    if share.payment_received {
                        summary.total_received += share.amount;
                    } else {
                        summary.total_pending += share.amount;
                        to_collect.push(share);
                    }
                }
            }
            TransactionType::Income => summary.total_income += tx.amount,
            TransactionType::Donation => {
                summary.total_donations += tx.amount;
                if let Some(owed) = Receivable::from_transaction(tx) {
                    if !owed.payment_received {
                        to_collect.push(owed);
                    }
                }
            }
            TransactionType::Lent => {
                summary.total_lent += tx.amount;
                if tx.payment_received {
                    summary.received_lent += tx.amount;
                } else {
                    summary.pending_lent += tx.amount;
                    to_collect.extend(Receivable::from_transaction(tx));
                }
            }
        }
    }

    summary.net_amount = summary.total_spent_by_me + summary.total_pending + summary.pending_lent
        - summary.total_income;
    summary.money_to_collect = group_by_person(to_collect);
    summary
}

fn group_by_person(receivables: Vec<Receivable>) -> Vec<CollectionGroup> {
    let mut by_person: BTreeMap<String, Vec<Receivable>> = BTreeMap::new();
    for r in receivables {
        by_person.entry(r.person.clone()).or_default().push(r);
    }

    let mut groups: Vec<CollectionGroup> = by_person
        .into_iter()
        .map(|(person, mut entries)| {
            entries.sort_by(|a, b| {
                b.date
                    .cmp(&a.date)
                    .then_with(|| b.transaction_id.cmp(&a.transaction_id))
            });
            CollectionGroup {
                person,
                amount: entries.iter().map(|e| e.amount).sum(),
                count: entries.len(),
                entries,
            }
        })
        .collect();
    groups.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.person.cmp(&b.person)));
    groups
}
