// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::receipts::{format_size, ReceiptBlobs, ReceiptLibrary};
use crate::utils::{maybe_print_json, pretty_table, require_yes};
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle<B: ReceiptBlobs>(lib: &mut ReceiptLibrary<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let file = sub.get_one::<String>("file").unwrap();
            let path = Path::new(file);
            let bytes = std::fs::read(path).with_context(|| format!("Read {}", file))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(file.as_str());
            let tx = sub.get_one::<String>("tx").map(String::as_str);
            let r = lib.attach(name, bytes, tx)?;
            println!(
                "Attached '{}' ({}, {}) as {}",
                r.name,
                r.kind.as_str(),
                format_size(r.size),
                r.id
            );
        }
        Some(("list", sub)) => {
            let data = match sub.get_one::<String>("tx") {
                Some(tx) => lib.for_transaction(tx)?,
                None => lib.list()?,
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let mut rows = Vec::new();
                for r in &data {
                    rows.push(vec![
                        r.id.clone(),
                        r.name.clone(),
                        r.kind.as_str().to_string(),
                        format_size(r.size),
                        r.date.to_string(),
                        r.transaction_id.clone().unwrap_or_default(),
                        if lib.content(&r.id)?.is_some() { "yes" } else { "no" }.to_string(),
                    ]);
                }
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Name", "Type", "Size", "Date", "Transaction", "Content"],
                        rows
                    )
                );
            }
        }
        Some(("show", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let receipt = lib
                .list()?
                .into_iter()
                .find(|r| &r.id == id)
                .with_context(|| format!("Receipt '{}' not found", id))?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            match lib.content(id)? {
                Some(bytes) => println!(
                    "Content: {} in this session",
                    format_size(bytes.len() as u64)
                ),
                None => println!(
                    "Content: not available (receipt files are kept only for the session \
                     that added them)"
                ),
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            require_yes(sub, &format!("delete receipt {}", id))?;
            let r = lib.remove(id)?;
            println!("Removed receipt '{}'", r.name);
        }
        _ => {}
    }
    Ok(())
}
