// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::currency::format_money;
use crate::ledger::summarize;
use crate::models::Summary;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account: String,
    pub currency: String,
    #[serde(flatten)]
    pub summary: Summary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub accounts: Vec<AccountSummary>,
    /// Never mixes currencies.
    pub by_currency: BTreeMap<String, Summary>,
}

pub fn handle(book: &Book, m: &clap::ArgMatches) -> Result<()> {
    let json = m.get_flag("json");
    let jsonl = m.get_flag("jsonl");
    match m.get_one::<String>("account") {
        Some(key) => {
            let acct = book.find_account(key)?;
            let row = AccountSummary {
                summary: book.summary(&acct.id)?,
                account: acct.name,
                currency: acct.currency,
            };
            if !maybe_print_json(json, jsonl, &row)? {
                println!("{}", summary_table(&[row]));
            }
        }
        None => {
            let overview = query_overview(book)?;
            if !maybe_print_json(json, jsonl, &overview)? {
                println!("{}", summary_table(&overview.accounts));
                let rows = overview
                    .by_currency
                    .iter()
                    .map(|(ccy, s)| {
                        vec![
                            ccy.clone(),
                            format_money(s.total_in, ccy),
                            format_money(s.total_out, ccy),
                            format_money(s.net_balance, ccy),
                            (s.in_count + s.out_count).to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Currency", "Total In", "Total Out", "Net", "Entries"], rows)
                );
            }
        }
    }
    Ok(())
}

pub fn query_overview(book: &Book) -> Result<Overview> {
    let (ledgers, by_currency) = book.overview()?;
    let accounts = ledgers
        .iter()
        .map(|a| AccountSummary {
            account: a.name.clone(),
            currency: a.currency.clone(),
            summary: summarize(&a.transactions),
        })
        .collect();
    Ok(Overview {
        accounts,
        by_currency,
    })
}

fn summary_table(rows: &[AccountSummary]) -> comfy_table::Table {
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.account.clone(),
                format_money(r.summary.total_in, &r.currency),
                format_money(r.summary.total_out, &r.currency),
                format_money(r.summary.net_balance, &r.currency),
                r.summary.in_count.to_string(),
                r.summary.out_count.to_string(),
            ]
        })
        .collect();
    pretty_table(
        &["Account", "Total In", "Total Out", "Net", "# In", "# Out"],
        data,
    )
}
