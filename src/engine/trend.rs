// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Budget, Transaction};
use crate::utils::{first_of_month, month_label};

use super::budget::budget_for_month;
use super::summary::fold_month;

/// Fewest distinct months a trend is drawn for.
pub const MIN_TREND_MONTHS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub month: NaiveDate,
    pub label: String,
    pub total_spent_by_me: Decimal,
    pub total_spent_for_others: Decimal,
    pub total_received: Decimal,
    pub total_pending: Decimal,
    pub net_amount: Decimal,
    pub budget: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Trend {
    NotEnoughData { months_with_data: usize },
    Series { points: Vec<TrendPoint> },
}

impl Trend {
    pub fn months_needed(&self) -> usize {
        match self {
            Trend::NotEnoughData { months_with_data } => {
                MIN_TREND_MONTHS.saturating_sub(*months_with_data)
            }
            Trend::Series { .. } => 0,
        }
    }
}

/// Sorted first-of-month dates that hold at least one transaction.
pub fn months_with_data(transactions: &[Transaction]) -> Vec<NaiveDate> {
    let mut months: Vec<NaiveDate> = transactions
        .iter()
        .map(|tx| first_of_month(tx.date))
        .collect();
    months.sort_unstable();
    months.dedup();
    months
}

/// Per-month rollups over every month with data, in one grouping pass.
pub fn trend(transactions: &[Transaction], budgets: &[Budget]) -> Trend {
    let mut by_month: BTreeMap<NaiveDate, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        by_month.entry(first_of_month(tx.date)).or_default().push(tx);
    }
    if by_month.len() < MIN_TREND_MONTHS {
        return Trend::NotEnoughData {
            months_with_data: by_month.len(),
        };
    }

    let points = by_month
        .into_iter()
        .map(|(month, txs)| {
            let summary = fold_month(month, txs);
            TrendPoint {
                month,
                label: month_label(month),
                total_spent_by_me: summary.total_spent_by_me,
                total_spent_for_others: summary.total_spent_for_others,
                total_received: summary.total_received,
                total_pending: summary.total_pending,
                net_amount: summary.net_amount,
                budget: budget_for_month(budgets, month).map(|b| b.amount),
            }
        })
        .collect();
    Trend::Series { points }
}
