// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Standalone mode: the whole account array is one JSON document in the
//! local key-value store, rewritten on every change.

use chrono::Local;
use rusqlite::Connection;
use tracing::{debug, info};
use uuid::Uuid;

use super::{AccountUpdate, LedgerBackend};
use crate::db::{kv_get_json, kv_set_json};
use crate::error::{LedgerError, LedgerResult};
use crate::filter::{TransactionFilter, TransactionPage};
use crate::ledger::{recompute_balances_by, summarize, BalanceOrder};
use crate::models::{Account, Summary, Transaction};
use crate::validation::{
    ensure_can_delete_account, validate_account_name, validate_currency, TransactionDraft,
};

pub const LEDGER_KEY: &str = "ledger.accounts";
pub const DEFAULT_ACCOUNT_NAME: &str = "Cash Book";

pub struct LocalBackend<'c> {
    conn: &'c Connection,
    order: BalanceOrder,
    default_currency: String,
}

impl<'c> LocalBackend<'c> {
    pub fn new(conn: &'c Connection, order: BalanceOrder, default_currency: &str) -> Self {
        Self {
            conn,
            order,
            default_currency: default_currency.to_uppercase(),
        }
    }

    fn load(&self) -> LedgerResult<Vec<Account>> {
        if let Some(accounts) = kv_get_json::<Vec<Account>>(self.conn, LEDGER_KEY)? {
            if !accounts.is_empty() {
                return Ok(accounts);
            }
        }
        // at least one account must always exist
        let mut seed = Account::new(
            Uuid::new_v4().to_string(),
            DEFAULT_ACCOUNT_NAME,
            &self.default_currency,
        );
        seed.created_at = Some(Local::now().date_naive());
        let accounts = vec![seed];
        self.save(&accounts)?;
        info!("seeded default account '{}'", DEFAULT_ACCOUNT_NAME);
        Ok(accounts)
    }

    fn save(&self, accounts: &[Account]) -> LedgerResult<()> {
        kv_set_json(self.conn, LEDGER_KEY, &accounts)
    }

    fn rechain(&self, account: &mut Account) -> LedgerResult<()> {
        account.transactions = recompute_balances_by(&account.transactions, self.order)?;
        Ok(())
    }

    fn position(accounts: &[Account], id: &str) -> LedgerResult<usize> {
        accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| LedgerError::not_found("account", id))
    }

    /// (account index, transaction index) of a transaction id.
    fn locate(accounts: &[Account], tx_id: &str) -> LedgerResult<(usize, usize)> {
        accounts
            .iter()
            .enumerate()
            .find_map(|(ai, a)| {
                a.transactions
                    .iter()
                    .position(|t| t.id == tx_id)
                    .map(|ti| (ai, ti))
            })
            .ok_or_else(|| LedgerError::not_found("transaction", tx_id))
    }
}

impl LedgerBackend for LocalBackend<'_> {
    fn accounts(&self) -> LedgerResult<Vec<Account>> {
        let mut accounts = self.load()?;
        for acct in accounts.iter_mut() {
            self.rechain(acct)?;
        }
        Ok(accounts)
    }

    fn create_account(&self, name: &str, currency: &str) -> LedgerResult<Account> {
        let mut accounts = self.load()?;
        let name = validate_account_name(name, &accounts, None)?;
        let currency = validate_currency(currency)?;
        let mut acct = Account::new(Uuid::new_v4().to_string(), name, &currency);
        acct.created_at = Some(Local::now().date_naive());
        accounts.push(acct.clone());
        self.save(&accounts)?;
        debug!(id = %acct.id, "account created");
        Ok(acct)
    }

    fn update_account(&self, id: &str, update: &AccountUpdate) -> LedgerResult<()> {
        let mut accounts = self.load()?;
        let idx = Self::position(&accounts, id)?;
        if let Some(name) = &update.name {
            accounts[idx].name = validate_account_name(name, &accounts, Some(id))?;
        }
        if let Some(ccy) = &update.currency {
            accounts[idx].currency = validate_currency(ccy)?;
        }
        self.save(&accounts)?;
        debug!(id, "account updated");
        Ok(())
    }

    fn delete_account(&self, id: &str) -> LedgerResult<()> {
        let mut accounts = self.load()?;
        let idx = Self::position(&accounts, id)?;
        ensure_can_delete_account(accounts.len())?;
        let removed = accounts.remove(idx);
        self.save(&accounts)?;
        debug!(id, transactions = removed.transactions.len(), "account deleted");
        Ok(())
    }

    fn ledger(&self, account_id: &str) -> LedgerResult<Account> {
        let mut accounts = self.load()?;
        let idx = Self::position(&accounts, account_id)?;
        let mut acct = accounts.swap_remove(idx);
        self.rechain(&mut acct)?;
        Ok(acct)
    }

    fn ledger_summary(&self, account_id: &str) -> LedgerResult<Summary> {
        Ok(summarize(&self.ledger(account_id)?.transactions))
    }

    fn transactions(
        &self,
        account_id: &str,
        filter: &TransactionFilter,
    ) -> LedgerResult<TransactionPage> {
        Ok(filter.apply(&self.ledger(account_id)?.transactions))
    }

    fn create_transaction(
        &self,
        account_id: &str,
        draft: &TransactionDraft,
    ) -> LedgerResult<Transaction> {
        let draft = draft.clone().validate()?;
        let mut accounts = self.load()?;
        let idx = Self::position(&accounts, account_id)?;
        let id = Uuid::new_v4().to_string();
        accounts[idx].transactions.push(draft.into_transaction(id.clone()));
        self.rechain(&mut accounts[idx])?;
        self.save(&accounts)?;
        debug!(%id, account = account_id, "transaction added");
        Self::locate(&accounts, &id).map(|(a, t)| accounts[a].transactions[t].clone())
    }

    fn update_transaction(&self, id: &str, draft: &TransactionDraft) -> LedgerResult<()> {
        let draft = draft.clone().validate()?;
        let mut accounts = self.load()?;
        let (ai, ti) = Self::locate(&accounts, id)?;
        accounts[ai].transactions[ti] = draft.into_transaction(id.to_string());
        self.rechain(&mut accounts[ai])?;
        self.save(&accounts)?;
        debug!(id, "transaction updated");
        Ok(())
    }

    fn delete_transaction(&self, id: &str) -> LedgerResult<()> {
        let mut accounts = self.load()?;
        let (ai, ti) = Self::locate(&accounts, id)?;
        accounts[ai].transactions.remove(ti);
        self.rechain(&mut accounts[ai])?;
        self.save(&accounts)?;
        debug!(id, "transaction deleted");
        Ok(())
    }
}
