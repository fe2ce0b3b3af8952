// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ValidationError;
use crate::models::Budget;
use crate::utils::{first_of_month, same_month};

const WARNING_AT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const EXCEEDED_AT: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Unset,
    Safe,
    Warning,
    Exceeded,
}

impl BudgetTier {
    /// Below 80% is safe, from 80% warning, from 100% exceeded.
    pub fn classify(percentage: Decimal) -> Self {
        if percentage >= EXCEEDED_AT {
            BudgetTier::Exceeded
        } else if percentage >= WARNING_AT {
            BudgetTier::Warning
        } else {
            BudgetTier::Safe
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            BudgetTier::Unset => "gray",
            BudgetTier::Safe => "green",
            BudgetTier::Warning => "yellow",
            BudgetTier::Exceeded => "red",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BudgetTier::Unset => "unset",
            BudgetTier::Safe => "safe",
            BudgetTier::Warning => "warning",
            BudgetTier::Exceeded => "exceeded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub tier: BudgetTier,
    pub budget: Option<Decimal>,
    pub spent: Decimal,
    pub remaining: Option<Decimal>,
    pub percentage: Option<Decimal>,
    /// `percentage` capped at 100, for progress bars.
    pub bar_percentage: Option<Decimal>,
}

/// Compares a month's net amount with its budget. A zero budget has no
/// percentage and is reported as unset.
pub fn budget_status(budget: Option<&Budget>, net_amount: Decimal) -> BudgetStatus {
    let Some(budget) = budget else {
        return BudgetStatus {
            tier: BudgetTier::Unset,
            budget: None,
            spent: net_amount,
            remaining: None,
            percentage: None,
            bar_percentage: None,
        };
    };

    let percentage = if budget.amount.is_zero() {
        None
    } else {
        Some(net_amount / budget.amount * Decimal::ONE_HUNDRED)
    };
    BudgetStatus {
        tier: percentage.map_or(BudgetTier::Unset, BudgetTier::classify),
        budget: Some(budget.amount),
        spent: net_amount,
        remaining: Some(budget.amount - net_amount),
        percentage,
        bar_percentage: percentage.map(|p| p.min(Decimal::ONE_HUNDRED)),
    }
}

pub fn budget_for_month(budgets: &[Budget], month: NaiveDate) -> Option<&Budget> {
    budgets.iter().find(|b| same_month(b.month, month))
}

pub fn validate_budget_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveBudget(amount));
    }
    Ok(amount)
}

/// Sets the budget for `month` in an in-memory collection: the existing
/// record is amended in place, otherwise one is appended with `next_id`.
/// Stores enforce the same rule with a uniqueness constraint on the month.
pub fn upsert_budget(
    budgets: &mut Vec<Budget>,
    month: NaiveDate,
    amount: Decimal,
    now: DateTime<Utc>,
    next_id: impl FnOnce() -> i64,
) -> Result<&Budget, ValidationError> {
    let amount = validate_budget_amount(amount)?;
    let month = first_of_month(month);
    let idx = match budgets.iter().position(|b| b.month == month) {
        Some(idx) => {
            let existing = &mut budgets[idx];
            existing.amount = amount;
            existing.updated_at = now;
            idx
        }
        None => {
            budgets.push(Budget {
                id: next_id(),
                month,
                amount,
                created_at: now,
                updated_at: now,
            });
            budgets.len() - 1
        }
    };
    Ok(&budgets[idx])
}
