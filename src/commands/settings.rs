// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::{DEFAULT_CURRENCY, get_setting, set_setting};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").context("key is required")?;
            match get_setting(conn, key)? {
                Some(v) => println!("{}", v),
                None if key == "currency" => println!("{} (default)", DEFAULT_CURRENCY),
                None => println!("(unset)"),
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").context("key is required")?;
            let value = sub
                .get_one::<String>("value")
                .context("value is required")?;
            set_setting(conn, key, value.trim())?;
            println!("{} = {}", key, value.trim());
        }
        _ => {}
    }
    Ok(())
}
