// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{set_setting, AppConfig};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

/// `cfg` is the effective configuration, flag and env overrides included.
pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), cfg)? {
                println!("{}", pretty_table(&["Key", "Value"], cfg.rows()));
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            let stored = set_setting(conn, key.trim(), value)?;
            println!("{} = {}", key.trim(), stored);
        }
        _ => {}
    }
    Ok(())
}
