// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod doctor;
pub mod exporter;
pub mod importer;
pub mod reports;
pub mod settings;
pub mod transactions;

use anyhow::Result;
use chrono::NaiveDate;

use crate::utils::{first_of_month, parse_month, today};

/// `--month` if given, else the current month.
pub(crate) fn month_or_current(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m),
        None => Ok(first_of_month(today())),
    }
}
