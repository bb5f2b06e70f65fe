// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::backend::AccountUpdate;
use crate::book::Book;
use crate::currency::format_money;
use crate::ledger::closing_balance;
use crate::utils::{maybe_print_json, pretty_table, require_yes, short_id};
use anyhow::{Context, Result};
use serde::Serialize;

pub fn handle(book: &Book, default_currency: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let ccy = sub
                .get_one::<String>("currency")
                .map(String::as_str)
                .unwrap_or(default_currency);
            let acct = book.create_account(name, ccy)?;
            println!("Added account '{}' ({})", acct.name, acct.currency);
        }
        Some(("list", sub)) => list(book, sub)?,
        Some(("rename", sub)) => {
            let key = sub.get_one::<String>("account").unwrap();
            let new_name = sub.get_one::<String>("new_name").unwrap();
            let acct = book.find_account(key)?;
            let update = AccountUpdate {
                name: Some(new_name.clone()),
                currency: None,
            };
            let renamed = book
                .update_account(&acct.id, update)
                .with_context(|| format!("Rename account '{}'", acct.name))?;
            println!("Renamed '{}' -> '{}'", acct.name, renamed.name);
        }
        Some(("currency", sub)) => {
            let key = sub.get_one::<String>("account").unwrap();
            let code = sub.get_one::<String>("code").unwrap();
            let acct = book.find_account(key)?;
            let update = AccountUpdate {
                name: None,
                currency: Some(code.clone()),
            };
            let updated = book.update_account(&acct.id, update)?;
            println!("Account '{}' now uses {}", updated.name, updated.currency);
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("account").unwrap();
            let acct = book.find_account(key)?;
            require_yes(sub, &format!("delete account '{}'", acct.name))?;
            book.delete_account(&acct.id)?;
            println!("Removed account '{}'", acct.name);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRow {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub entries: usize,
    pub balance: rust_decimal::Decimal,
    pub created_at: Option<chrono::NaiveDate>,
}

pub fn query_rows(book: &Book) -> Result<Vec<AccountRow>> {
    let (ledgers, _) = book.overview()?;
    Ok(ledgers
        .into_iter()
        .map(|a| AccountRow {
            entries: a.transactions.len(),
            balance: closing_balance(&a.transactions),
            id: a.id,
            name: a.name,
            currency: a.currency,
            created_at: a.created_at,
        })
        .collect())
}

fn list(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(book)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    short_id(&r.id).to_string(),
                    r.name.clone(),
                    r.currency.clone(),
                    r.entries.to_string(),
                    format_money(r.balance, &r.currency),
                    r.created_at.map(|d| d.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Currency", "Entries", "Balance", "Created"],
                rows
            )
        );
    }
    Ok(())
}
