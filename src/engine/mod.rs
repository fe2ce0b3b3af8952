// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure computations over a snapshot of transactions and budgets. Nothing in
//! here touches the database or keeps state between calls.

pub mod budget;
pub mod filter;
pub mod records;
pub mod split;
pub mod summary;
pub mod transaction;
pub mod trend;

pub use budget::{BudgetStatus, BudgetTier, budget_for_month, budget_status, upsert_budget};
pub use filter::{FilterCriteria, Selection, filter, for_whom_options};
pub use records::{FlaggedRecord, RawSplitShare, RawTransaction, Snapshot, migrate};
pub use split::{Receivable, SPLIT_TOLERANCE, expand, remaining_share, resolve};
pub use summary::{CollectionGroup, MonthlySummary, UnparseableBucket, aggregate};
pub use transaction::{TransactionDraft, canonical_party, validate};
pub use trend::{MIN_TREND_MONTHS, Trend, TrendPoint, months_with_data, trend};
