// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The cash book as the commands see it.
//!
//! Input is validated here before the backend is touched. Writes are never
//! applied optimistically: after a backend accepts a change the affected
//! ledger is read back and balances are rebuilt from that copy.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::backend::{AccountUpdate, LedgerBackend};
use crate::error::{LedgerError, LedgerResult};
use crate::filter::{TransactionFilter, TransactionPage};
use crate::ledger::{recompute_balances_by, summarize_by_currency, BalanceOrder};
use crate::models::{Account, Summary, Transaction};
use crate::validation::{
    ensure_can_delete_account, validate_account_name, validate_currency, TransactionDraft,
    TransactionPatch,
};

pub struct Book<'a> {
    backend: Box<dyn LedgerBackend + 'a>,
    order: BalanceOrder,
}

impl<'a> Book<'a> {
    pub fn new(backend: Box<dyn LedgerBackend + 'a>, order: BalanceOrder) -> Self {
        Self { backend, order }
    }

    pub fn accounts(&self) -> LedgerResult<Vec<Account>> {
        self.backend.accounts()
    }

    /// Look an account up by id, (case-insensitive) name, or id prefix.
    pub fn find_account(&self, key: &str) -> LedgerResult<Account> {
        let key = key.trim();
        let accounts = self.accounts()?;
        let named = accounts.iter().find(|a| a.id == key).or_else(|| {
            accounts
                .iter()
                .find(|a| a.name.trim().to_lowercase() == key.to_lowercase())
        });
        match named {
            Some(acct) => Ok(acct.clone()),
            None => by_id(&accounts, key, |a| a.id.as_str(), "account").cloned(),
        }
    }

    pub fn create_account(&self, name: &str, currency: &str) -> LedgerResult<Account> {
        let existing = self.accounts()?;
        let name = validate_account_name(name, &existing, None)?;
        let currency = validate_currency(currency)?;
        let created = self.backend.create_account(&name, &currency)?;
        info!(id = %created.id, name = %created.name, "account created");
        self.find_account(&created.id)
    }

    pub fn update_account(&self, id: &str, update: AccountUpdate) -> LedgerResult<Account> {
        let existing = self.accounts()?;
        if !existing.iter().any(|a| a.id == id) {
            return Err(LedgerError::not_found("account", id));
        }
        let update = AccountUpdate {
            name: update
                .name
                .map(|n| validate_account_name(&n, &existing, Some(id)))
                .transpose()?,
            currency: update.currency.map(|c| validate_currency(&c)).transpose()?,
        };
        if update.name.is_none() && update.currency.is_none() {
            return Err(LedgerError::validation("Nothing to update"));
        }
        self.backend.update_account(id, &update)?;
        self.find_account(id)
    }

    pub fn delete_account(&self, id: &str) -> LedgerResult<()> {
        let existing = self.accounts()?;
        if !existing.iter().any(|a| a.id == id) {
            return Err(LedgerError::not_found("account", id));
        }
        ensure_can_delete_account(existing.len())?;
        self.backend.delete_account(id)?;
        info!(id, "account deleted");
        Ok(())
    }

    /// Full ledger with balances rebuilt locally in the configured order.
    pub fn ledger(&self, account_id: &str) -> LedgerResult<Account> {
        let mut acct = self.backend.ledger(account_id)?;
        acct.transactions = recompute_balances_by(&acct.transactions, self.order)?;
        Ok(acct)
    }

    pub fn summary(&self, account_id: &str) -> LedgerResult<Summary> {
        self.backend.ledger_summary(account_id)
    }

    /// Every ledger plus totals per currency.
    pub fn overview(&self) -> LedgerResult<(Vec<Account>, BTreeMap<String, Summary>)> {
        let ledgers = self
            .accounts()?
            .iter()
            .map(|a| self.ledger(&a.id))
            .collect::<LedgerResult<Vec<_>>>()?;
        let totals = summarize_by_currency(&ledgers);
        Ok((ledgers, totals))
    }

    pub fn transactions(
        &self,
        account_id: &str,
        filter: &TransactionFilter,
    ) -> LedgerResult<TransactionPage> {
        self.backend.transactions(account_id, filter)
    }

    fn reread(&self, account_id: &str, tx_id: &str) -> LedgerResult<Transaction> {
        self.ledger(account_id)?
            .transactions
            .into_iter()
            .find(|t| t.id == tx_id)
            .ok_or_else(|| LedgerError::not_found("transaction", tx_id))
    }

    pub fn add_transaction(
        &self,
        account_id: &str,
        draft: TransactionDraft,
    ) -> LedgerResult<Transaction> {
        let draft = draft.validate()?;
        let created = self.backend.create_transaction(account_id, &draft)?;
        debug!(id = %created.id, account = account_id, "transaction created");
        self.reread(account_id, &created.id)
    }

    pub fn edit_transaction(
        &self,
        account_id: &str,
        tx_id: &str,
        patch: &TransactionPatch,
    ) -> LedgerResult<Transaction> {
        if patch.is_empty() {
            return Err(LedgerError::validation("Nothing to update"));
        }
        let ledger = self.ledger(account_id)?;
        let current = by_id(&ledger.transactions, tx_id, |t| t.id.as_str(), "transaction")?;
        let draft = patch.apply(current).validate()?;
        self.backend.update_transaction(&current.id, &draft)?;
        debug!(id = %current.id, account = account_id, "transaction edited");
        self.reread(account_id, &current.id)
    }

    /// Deletes every transaction named in `keys` from one account. All keys
    /// are resolved first, so a stale id aborts before anything is removed;
    /// repeated keys delete once. `on_deleted` sees each id as soon as the
    /// backend has removed it.
    pub fn delete_transactions<F>(
        &self,
        account_id: &str,
        keys: &[String],
        mut on_deleted: F,
    ) -> LedgerResult<usize>
    where
        F: FnMut(&str),
    {
        let ledger = self.ledger(account_id)?;
        let mut ids: Vec<&str> = Vec::with_capacity(keys.len());
        for key in keys {
            let tx = by_id(&ledger.transactions, key, |t| t.id.as_str(), "transaction")?;
            if !ids.contains(&tx.id.as_str()) {
                ids.push(&tx.id);
            }
        }
        for id in &ids {
            self.backend.delete_transaction(id)?;
            on_deleted(id);
        }
        info!(count = ids.len(), account = account_id, "transactions deleted");
        Ok(ids.len())
    }
}

/// Exact id, or an unambiguous prefix of one such as the short ids the
/// tables print.
fn by_id<'a, T>(
    items: &'a [T],
    key: &str,
    id_of: impl Fn(&T) -> &str,
    what: &str,
) -> LedgerResult<&'a T> {
    let key = key.trim();
    if let Some(item) = items.iter().find(|i| id_of(*i) == key) {
        return Ok(item);
    }
    let mut hits = items
        .iter()
        .filter(|i| !key.is_empty() && id_of(*i).starts_with(key));
    match (hits.next(), hits.next()) {
        (Some(item), None) => Ok(item),
        (Some(_), Some(_)) => Err(LedgerError::validation(format!(
            "{} id '{}' matches more than one {}, give more characters",
            what, key, what
        ))),
        (None, _) => Err(LedgerError::not_found(what, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn id_of(t: &Transaction) -> &str {
        &t.id
    }

    fn entry(id: &str) -> Transaction {
        TransactionDraft::cash_in(
            Decimal::ONE,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Client",
        )
        .into_transaction(id.to_string())
    }

    #[test]
    fn ids_resolve_exactly_or_by_unique_prefix() {
        let txs = vec![entry("44d811c1-aaaa"), entry("44d9-bbbb"), entry("44")];
        let short = by_id(&txs, "44d811c1", id_of, "transaction").unwrap();
        assert_eq!(short.id, "44d811c1-aaaa");
        // an exact match wins over longer ids sharing the prefix
        assert_eq!(by_id(&txs, "44", id_of, "transaction").unwrap().id, "44");
        assert!(matches!(
            by_id(&txs, "44d", id_of, "transaction"),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            by_id(&txs, "ff", id_of, "transaction"),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            by_id(&txs, " ", id_of, "transaction"),
            Err(LedgerError::NotFound(_))
        ));
    }
}
