// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Running-balance reconstruction and summaries.
//!
//! Two derived views live here and must not be mixed up:
//!
//! * `balance` on each [`Transaction`] is the running total over the *full*
//!   account sequence. It is recomputed after every add/edit/delete.
//! * [`Summary`] aggregates whatever slice it is given (a filtered view, a
//!   date range) and never touches stored balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Summary, Transaction, TransactionType};

/// Which sequence the balance chain follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceOrder {
    /// Insertion order, regardless of `date`.
    #[default]
    Entry,
    /// By `date`, ties broken by insertion order.
    Chronological,
}

impl BalanceOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Chronological => "chronological",
        }
    }
}

impl fmt::Display for BalanceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BalanceOrder {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" | "insertion" => Ok(Self::Entry),
            "chronological" | "date" => Ok(Self::Chronological),
            other => Err(LedgerError::validation(format!(
                "Unknown balance order '{}', expected entry|chronological",
                other
            ))),
        }
    }
}

pub fn check_amount(tx: &Transaction) -> LedgerResult<()> {
    if tx.amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "transaction '{}' has amount {}, must be greater than zero",
            tx.id, tx.amount
        )));
    }
    Ok(())
}

/// Recompute running balances in entry order.
///
/// `balance[i]` equals the signed sum of entries `0..=i`. Returns fresh
/// records; the input is left untouched.
pub fn recompute_balances(transactions: &[Transaction]) -> LedgerResult<Vec<Transaction>> {
    recompute_balances_by(transactions, BalanceOrder::Entry)
}

/// Like [`recompute_balances`], chaining in the given order. The output is
/// always in entry order.
pub fn recompute_balances_by(
    transactions: &[Transaction],
    order: BalanceOrder,
) -> LedgerResult<Vec<Transaction>> {
    for tx in transactions {
        check_amount(tx)?;
    }

    let mut chain: Vec<usize> = (0..transactions.len()).collect();
    if order == BalanceOrder::Chronological {
        // sort_by_key is stable, so same-day entries keep insertion order
        chain.sort_by_key(|&i| transactions[i].date);
    }

    let mut out = transactions.to_vec();
    let mut running = Decimal::ZERO;
    for i in chain {
        running += transactions[i].signed_amount();
        out[i].balance = running;
    }
    Ok(out)
}

/// Order-independent totals over any view.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut s = Summary::default();
    for tx in transactions {
        match tx.kind {
            TransactionType::In => {
                s.total_in += tx.amount;
                s.in_count += 1;
            }
            TransactionType::Out => {
                s.total_out += tx.amount;
                s.out_count += 1;
            }
        }
    }
    s.net_balance = s.total_in - s.total_out;
    s
}

/// Balance after the last entry; zero for an empty account.
pub fn closing_balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(Transaction::signed_amount).sum()
}

/// Cross-account totals, one bucket per currency code.
pub fn summarize_by_currency(accounts: &[Account]) -> BTreeMap<String, Summary> {
    let mut out: BTreeMap<String, Summary> = BTreeMap::new();
    for acct in accounts {
        let s = summarize(&acct.transactions);
        let entry = out.entry(acct.currency.to_uppercase()).or_default();
        entry.total_in += s.total_in;
        entry.total_out += s.total_out;
        entry.net_balance += s.net_balance;
        entry.in_count += s.in_count;
        entry.out_count += s.out_count;
    }
    out
}
