// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{PaymentMode, Transaction, TransactionType};
use crate::utils::{first_of_month, same_month};

/// A multi-select filter value. An empty selection is never stored: it
/// collapses back to `Unrestricted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T: Ord> {
    Unrestricted,
    Only(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Selection::Unrestricted
    }
}

impl<T: Ord> Selection<T> {
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        let set: BTreeSet<T> = values.into_iter().collect();
        if set.is_empty() {
            Selection::Unrestricted
        } else {
            Selection::Only(set)
        }
    }

    pub fn allows(&self, value: &T) -> bool {
        match self {
            Selection::Unrestricted => true,
            Selection::Only(set) => set.contains(value),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Selection::Unrestricted)
    }

    /// Adds `value` if absent, removes it if present.
    pub fn toggle(&mut self, value: T) {
        let next = match std::mem::take(self) {
            Selection::Unrestricted => Selection::only([value]),
            Selection::Only(mut set) => {
                if !set.remove(&value) {
                    set.insert(value);
                }
                Selection::only(set)
            }
        };
        *self = next;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub month: NaiveDate,
    pub transaction_types: Selection<TransactionType>,
    pub payment_modes: Selection<PaymentMode>,
    pub for_whom: Selection<String>,
}

impl FilterCriteria {
    pub fn for_month(month: NaiveDate) -> Self {
        Self {
            month: first_of_month(month),
            transaction_types: Selection::Unrestricted,
            payment_modes: Selection::Unrestricted,
            for_whom: Selection::Unrestricted,
        }
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = TransactionType>) -> Self {
        self.transaction_types = Selection::only(types);
        self
    }

    pub fn with_modes(mut self, modes: impl IntoIterator<Item = PaymentMode>) -> Self {
        self.payment_modes = Selection::only(modes);
        self
    }

    pub fn with_people<S: Into<String>>(mut self, people: impl IntoIterator<Item = S>) -> Self {
        self.for_whom = Selection::only(people.into_iter().map(Into::into));
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        same_month(tx.date, self.month)
            && self.transaction_types.allows(&tx.transaction_type)
            && self.payment_modes.allows(&tx.payment_mode)
            && self.for_whom.allows(&tx.for_whom)
    }
}

pub fn filter(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| criteria.matches(tx))
        .cloned()
        .collect()
}

/// Distinct counterparties, sorted, for populating the person filter.
pub fn for_whom_options(transactions: &[Transaction]) -> Vec<String> {
    transactions
        .iter()
        .map(|tx| tx.for_whom.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
