// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::currency::format_money;
use crate::filter::{SortKey, TransactionFilter, TransactionPage};
use crate::models::{Account, TransactionType};
use crate::receipts::{ReceiptBlobs, ReceiptLibrary};
use crate::utils::{
    maybe_print_json, parse_date, parse_decimal, pretty_table, require_yes, short_id,
};
use crate::validation::{TransactionDraft, TransactionPatch};
use anyhow::{Context, Result};
use chrono::Local;
use tracing::warn;

pub fn handle<B: ReceiptBlobs>(
    book: &Book,
    receipts: &ReceiptLibrary<B>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(book, sub)?,
        Some(("edit", sub)) => edit(book, sub)?,
        Some(("rm", sub)) => remove(book, receipts, sub)?,
        Some(("list", sub)) => list(book, sub)?,
        _ => {}
    }
    Ok(())
}

fn account_of(book: &Book, sub: &clap::ArgMatches) -> Result<Account> {
    let key = sub.get_one::<String>("account").unwrap();
    Ok(book.find_account(key)?)
}

fn opt_text(sub: &clap::ArgMatches, id: &str) -> Option<String> {
    sub.get_one::<String>(id).map(|s| s.to_string())
}

fn add(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let acct = account_of(book, sub)?;
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let draft = TransactionDraft {
        amount,
        kind,
        date,
        source: opt_text(sub, "source"),
        paid_to: opt_text(sub, "paid-to"),
        description: opt_text(sub, "description"),
    };
    let tx = book.add_transaction(&acct.id, draft)?;
    println!(
        "Recorded {} {} on {} ({}) -> balance {} [{}]",
        tx.kind.label(),
        format_money(tx.amount, &acct.currency),
        tx.date,
        tx.counterparty(),
        format_money(tx.balance, &acct.currency),
        tx.id
    );
    Ok(())
}

pub fn patch_from_matches(sub: &clap::ArgMatches) -> Result<TransactionPatch> {
    Ok(TransactionPatch {
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        kind: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<TransactionType>())
            .transpose()?,
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        source: opt_text(sub, "source"),
        paid_to: opt_text(sub, "paid-to"),
        description: opt_text(sub, "description"),
    })
}

fn edit(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let acct = account_of(book, sub)?;
    let id = sub.get_one::<String>("id").unwrap();
    let patch = patch_from_matches(sub)?;
    let tx = book
        .edit_transaction(&acct.id, id, &patch)
        .with_context(|| format!("Edit transaction {}", id))?;
    println!(
        "Updated {}: {} {} on {} -> balance {}",
        short_id(&tx.id),
        tx.kind.label(),
        format_money(tx.amount, &acct.currency),
        tx.date,
        format_money(tx.balance, &acct.currency)
    );
    Ok(())
}

fn remove<B: ReceiptBlobs>(
    book: &Book,
    receipts: &ReceiptLibrary<B>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let acct = account_of(book, sub)?;
    let ids: Vec<String> = sub
        .get_many::<String>("ids")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();
    require_yes(
        sub,
        &format!("delete {} transaction(s) from '{}'", ids.len(), acct.name),
    )?;
    // unlink as each delete lands, so a later failure leaves no dangling links
    let n = book.delete_transactions(&acct.id, &ids, |id| {
        if let Err(e) = receipts.detach_transaction(id) {
            warn!(id, error = %e, "could not unlink receipts");
        }
    })?;
    println!("Removed {} transaction(s) from '{}'", n, acct.name);
    Ok(())
}

/// Date range, type and search. Used by every command that reads a period.
pub fn period_filter(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    Ok(TransactionFilter {
        from: sub
            .get_one::<String>("from")
            .map(|s| parse_date(s))
            .transpose()?,
        to: sub
            .get_one::<String>("to")
            .map(|s| parse_date(s))
            .transpose()?,
        kind: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<TransactionType>())
            .transpose()?,
        search: opt_text(sub, "search"),
        page: 1,
        ..Default::default()
    })
}

pub fn list_filter(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut filter = period_filter(sub)?;
    if let Some(key) = sub.get_one::<String>("sort") {
        filter.sort = key.parse::<SortKey>()?;
    }
    filter.descending = sub.get_flag("desc");
    filter.page = sub.get_one::<usize>("page").copied().unwrap_or(1);
    filter.per_page = sub.get_one::<usize>("per-page").copied();
    Ok(filter)
}

pub fn query_page(book: &Book, sub: &clap::ArgMatches) -> Result<(Account, TransactionPage)> {
    let acct = account_of(book, sub)?;
    let filter = list_filter(sub)?;
    let page = book.transactions(&acct.id, &filter)?;
    Ok((acct, page))
}

fn list(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let (acct, page) = query_page(book, sub)?;
    if maybe_print_json(sub.get_flag("json"), false, &page)? {
        return Ok(());
    }
    if maybe_print_json(false, sub.get_flag("jsonl"), &page.transactions)? {
        return Ok(());
    }
    let rows = page
        .transactions
        .iter()
        .map(|t| {
            vec![
                short_id(&t.id).to_string(),
                t.date.to_string(),
                t.kind.label().to_string(),
                t.counterparty().to_string(),
                t.description.clone().unwrap_or_default(),
                format_money(t.signed_amount(), &acct.currency),
                format_money(t.balance, &acct.currency),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Type", "Party", "Description", "Amount", "Balance"],
            rows,
        )
    );
    println!(
        "{} of {} entries (page {}) | in {} | out {} | net {}",
        page.transactions.len(),
        page.total,
        page.page,
        format_money(page.summary.total_in, &acct.currency),
        format_money(page.summary.total_out, &acct.currency),
        format_money(page.summary.net_balance, &acct.currency)
    );
    Ok(())
}
