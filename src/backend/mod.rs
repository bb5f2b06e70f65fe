// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Where accounts and transactions actually live.

pub mod local;
pub mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

use serde::Serialize;

use crate::error::LedgerResult;
use crate::filter::{TransactionFilter, TransactionPage};
use crate::models::{Account, Summary, Transaction};
use crate::validation::TransactionDraft;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

pub trait LedgerBackend {
    fn accounts(&self) -> LedgerResult<Vec<Account>>;
    fn create_account(&self, name: &str, currency: &str) -> LedgerResult<Account>;
    /// Updates report success only; callers read the record back.
    fn update_account(&self, id: &str, update: &AccountUpdate) -> LedgerResult<()>;
    fn delete_account(&self, id: &str) -> LedgerResult<()>;

    /// Account with its full transaction list in entry order.
    fn ledger(&self, account_id: &str) -> LedgerResult<Account>;
    fn ledger_summary(&self, account_id: &str) -> LedgerResult<Summary>;
    fn transactions(
        &self,
        account_id: &str,
        filter: &TransactionFilter,
    ) -> LedgerResult<TransactionPage>;

    fn create_transaction(
        &self,
        account_id: &str,
        draft: &TransactionDraft,
    ) -> LedgerResult<Transaction>;
    fn update_transaction(&self, id: &str, draft: &TransactionDraft) -> LedgerResult<()>;
    fn delete_transaction(&self, id: &str) -> LedgerResult<()>;
}
