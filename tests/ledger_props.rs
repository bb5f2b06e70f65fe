// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Property tests for the balance chain and summaries.

use cashbook::db;
use cashbook::backend::{LedgerBackend, LocalBackend};
use cashbook::ledger::{
    closing_balance, recompute_balances, recompute_balances_by, summarize, BalanceOrder,
};
use cashbook::models::{Transaction, TransactionType};
use cashbook::validation::TransactionDraft;
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Positive amounts with two decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn kind_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::In), Just(TransactionType::Out)]
}

fn tx_strategy() -> impl Strategy<Value = Transaction> {
    (amount_strategy(), kind_strategy(), 1u32..=28, 1u32..=12).prop_map(|(amount, kind, d, m)| {
        let (source, paid_to) = match kind {
            TransactionType::In => (Some("in".to_string()), None),
            TransactionType::Out => (None, Some("out".to_string())),
        };
        Transaction {
            id: String::new(),
            amount,
            kind,
            date: NaiveDate::from_ymd_opt(2024, m, d).unwrap(),
            source,
            paid_to,
            description: None,
            balance: Decimal::ZERO,
        }
    })
}

fn ledger_strategy() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(tx_strategy(), 0..40).prop_map(|mut txs| {
        for (i, t) in txs.iter_mut().enumerate() {
            t.id = format!("t{}", i);
        }
        txs
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every balance is the signed prefix sum in entry order.
    #[test]
    fn prop_balance_chain(txs in ledger_strategy()) {
        let out = recompute_balances(&txs).unwrap();
        prop_assert_eq!(out.len(), txs.len());
        let mut running = Decimal::ZERO;
        for (i, t) in out.iter().enumerate() {
            running += t.signed_amount();
            prop_assert_eq!(t.balance, running);
            prop_assert_eq!(&t.id, &txs[i].id);
        }
        prop_assert_eq!(out.last().map(|t| t.balance).unwrap_or_default(), closing_balance(&txs));
    }

    #[test]
    fn prop_recompute_is_idempotent(txs in ledger_strategy()) {
        let once = recompute_balances(&txs).unwrap();
        let twice = recompute_balances(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Chronological chaining changes balances, never amounts or order.
    #[test]
    fn prop_chronological_keeps_entry_order(txs in ledger_strategy()) {
        let out = recompute_balances_by(&txs, BalanceOrder::Chronological).unwrap();
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        let expected: Vec<&str> = txs.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(ids, expected);
        if let Some(latest) = out.iter().max_by_key(|t| t.date) {
            // the last entry on the latest date closes the chain
            let last_on_day = out.iter().rev().find(|t| t.date == latest.date).unwrap();
            prop_assert_eq!(last_on_day.balance, closing_balance(&txs));
        }
    }

    #[test]
    fn prop_summary_is_order_independent(txs in ledger_strategy()) {
        let forward = summarize(&txs);
        let backward = summarize(txs.iter().rev());
        prop_assert_eq!(forward, backward);
        prop_assert_eq!(forward.net_balance, forward.total_in - forward.total_out);
        prop_assert_eq!(forward.in_count + forward.out_count, txs.len());
        prop_assert_eq!(forward.net_balance, closing_balance(&txs));
    }

    /// Removing entry k leaves later balances shifted by its signed amount.
    #[test]
    fn prop_deletion_rechains(txs in ledger_strategy(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!txs.is_empty());
        let k = pick.index(txs.len());
        let before = recompute_balances(&txs).unwrap();
        let mut rest = txs.clone();
        let removed = rest.remove(k);
        let after = recompute_balances(&rest).unwrap();
        for (i, t) in after.iter().enumerate() {
            let orig = if i < k { &before[i] } else { &before[i + 1] };
            let expected = if i < k {
                orig.balance
            } else {
                orig.balance - removed.signed_amount()
            };
            prop_assert_eq!(t.balance, expected);
        }
    }

    /// Non-positive amounts never enter a chain.
    #[test]
    fn prop_non_positive_amounts_rejected(txs in ledger_strategy(), cents in -10_000i64..=0) {
        let mut bad = txs.clone();
        let mut t = bad.first().cloned().unwrap_or_else(|| Transaction {
            id: "x".into(),
            amount: Decimal::ONE,
            kind: TransactionType::In,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            source: Some("x".into()),
            paid_to: None,
            description: None,
            balance: Decimal::ZERO,
        });
        t.amount = Decimal::new(cents, 2);
        bad.push(t);
        prop_assert!(recompute_balances(&bad).is_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Whatever is stored, exactly one counterparty matches the type.
    #[test]
    fn prop_type_invariant_holds_in_storage(txs in prop::collection::vec(tx_strategy(), 1..10)) {
        let conn = db::open_in_memory().unwrap();
        let backend = LocalBackend::new(&conn, BalanceOrder::Entry, "USD");
        let acct = backend.accounts().unwrap().remove(0);
        for t in &txs {
            let draft = match t.kind {
                TransactionType::In => TransactionDraft::cash_in(t.amount, t.date, "payer"),
                TransactionType::Out => TransactionDraft::cash_out(t.amount, t.date, "payee"),
            };
            backend.create_transaction(&acct.id, &draft).unwrap();
        }
        let stored = backend.ledger(&acct.id).unwrap().transactions;
        prop_assert_eq!(stored.len(), txs.len());
        for t in &stored {
            match t.kind {
                TransactionType::In => prop_assert!(t.source.is_some() && t.paid_to.is_none()),
                TransactionType::Out => prop_assert!(t.paid_to.is_some() && t.source.is_none()),
            }
        }
    }
}
