// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{AccountUpdate, LedgerBackend};
use crate::api::{ApiClient, Transport};
use crate::error::{LedgerError, LedgerResult};
use crate::filter::{TransactionFilter, TransactionPage};
use crate::ledger::summarize;
use crate::models::{Account, Summary, Transaction};
use crate::validation::TransactionDraft;

/// Servers disagree on whether lists come bare or wrapped.
#[derive(Deserialize)]
#[serde(untagged)]
enum AccountList {
    Wrapped { accounts: Vec<Account> },
    Bare(Vec<Account>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LedgerPayload {
    Split {
        account: Account,
        transactions: Vec<Transaction>,
    },
    Whole(Account),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePage {
    #[serde(alias = "items")]
    transactions: Vec<Transaction>,
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    summary: Option<Summary>,
}

pub struct RemoteBackend<'s, T: Transport> {
    client: ApiClient<'s, T>,
}

impl<'s, T: Transport> RemoteBackend<'s, T> {
    pub fn new(client: ApiClient<'s, T>) -> Self {
        Self { client }
    }
}

impl<T: Transport> LedgerBackend for RemoteBackend<'_, T> {
    fn accounts(&self) -> LedgerResult<Vec<Account>> {
        Ok(match self.client.get::<AccountList>("/accounts", Vec::new())? {
            AccountList::Wrapped { accounts } | AccountList::Bare(accounts) => accounts,
        })
    }

    fn create_account(&self, name: &str, currency: &str) -> LedgerResult<Account> {
        let created: Option<Account> = self
            .client
            .post("/accounts", json!({ "name": name, "currency": currency }))?;
        if let Some(acct) = created {
            return Ok(acct);
        }
        // no body on success; names are unique, so find it by name
        self.accounts()?
            .into_iter()
            .find(|a| a.name.trim().to_lowercase() == name.trim().to_lowercase())
            .ok_or_else(|| LedgerError::not_found("account", name))
    }

    fn update_account(&self, id: &str, update: &AccountUpdate) -> LedgerResult<()> {
        let _: Value = self
            .client
            .put(&format!("/accounts/{}", id), serde_json::to_value(update)?)?;
        Ok(())
    }

    fn delete_account(&self, id: &str) -> LedgerResult<()> {
        self.client.delete(&format!("/accounts/{}", id))
    }

    fn ledger(&self, account_id: &str) -> LedgerResult<Account> {
        let payload: LedgerPayload = self
            .client
            .get(&format!("/ledger/{}", account_id), Vec::new())?;
        Ok(match payload {
            LedgerPayload::Split {
                mut account,
                transactions,
            } => {
                account.transactions = transactions;
                account
            }
            LedgerPayload::Whole(account) => account,
        })
    }

    fn ledger_summary(&self, account_id: &str) -> LedgerResult<Summary> {
        self.client
            .get(&format!("/ledger/{}/summary", account_id), Vec::new())
    }

    fn transactions(
        &self,
        account_id: &str,
        filter: &TransactionFilter,
    ) -> LedgerResult<TransactionPage> {
        let wire: WirePage = self.client.get(
            &format!("/ledger/{}/transactions", account_id),
            filter.to_query(),
        )?;
        let summary = wire
            .summary
            .unwrap_or_else(|| summarize(&wire.transactions));
        Ok(TransactionPage {
            total: wire.total.unwrap_or(wire.transactions.len()),
            page: filter.page.max(1),
            per_page: filter.per_page,
            summary,
            transactions: wire.transactions,
        })
    }

    fn create_transaction(
        &self,
        account_id: &str,
        draft: &TransactionDraft,
    ) -> LedgerResult<Transaction> {
        let mut body = serde_json::to_value(draft)?;
        if let Value::Object(map) = &mut body {
            map.insert("accountId".into(), Value::String(account_id.to_string()));
        }
        self.client.post("/transactions", body)
    }

    fn update_transaction(&self, id: &str, draft: &TransactionDraft) -> LedgerResult<()> {
        let _: Value = self
            .client
            .put(&format!("/transactions/{}", id), serde_json::to_value(draft)?)?;
        Ok(())
    }

    fn delete_transaction(&self, id: &str) -> LedgerResult<()> {
        self.client.delete(&format!("/transactions/{}", id))
    }
}
