// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Input checks that run before anything is written or sent.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::is_supported;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Transaction, TransactionType};

static CURRENCY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]{3}$").unwrap());

/// User-entered transaction fields, before an id or balance exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn clean(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl TransactionDraft {
    pub fn cash_in(amount: Decimal, date: NaiveDate, source: &str) -> Self {
        Self {
            amount,
            kind: TransactionType::In,
            date,
            source: Some(source.to_string()),
            paid_to: None,
            description: None,
        }
    }

    pub fn cash_out(amount: Decimal, date: NaiveDate, paid_to: &str) -> Self {
        Self {
            amount,
            kind: TransactionType::Out,
            date,
            source: None,
            paid_to: Some(paid_to.to_string()),
            description: None,
        }
    }

    pub fn with_description(mut self, note: &str) -> Self {
        self.description = Some(note.to_string());
        self
    }

    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            amount: tx.amount,
            kind: tx.kind,
            date: tx.date,
            source: tx.source.clone(),
            paid_to: tx.paid_to.clone(),
            description: tx.description.clone(),
        }
    }

    /// Switching type drops the counterparty that belonged to the old type.
    pub fn set_kind(&mut self, kind: TransactionType) {
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        match kind {
            TransactionType::In => self.paid_to = None,
            TransactionType::Out => self.source = None,
        }
    }

    /// Trim text fields and check the draft can enter a ledger.
    pub fn validate(mut self) -> LedgerResult<Self> {
        self.source = clean(self.source);
        self.paid_to = clean(self.paid_to);
        self.description = clean(self.description);

        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::validation("Amount must be greater than zero"));
        }
        if self.amount.normalize().scale() > 2 {
            return Err(LedgerError::validation(format!(
                "Amount {} has more than two decimal places",
                self.amount
            )));
        }
        if self.source.is_some() && self.paid_to.is_some() {
            return Err(LedgerError::validation(
                "A transaction has either a source (cash in) or a recipient (cash out), not both",
            ));
        }
        match self.kind {
            TransactionType::In if self.source.is_none() => {
                Err(LedgerError::validation("Source is required for cash in"))
            }
            TransactionType::Out if self.paid_to.is_none() => {
                Err(LedgerError::validation("Paid to is required for cash out"))
            }
            _ => Ok(self),
        }
    }

    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            kind: self.kind,
            date: self.date,
            source: self.source,
            paid_to: self.paid_to,
            description: self.description,
            balance: Decimal::ZERO,
        }
    }
}

/// Partial edit of an existing transaction; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionType>,
    pub date: Option<NaiveDate>,
    pub source: Option<String>,
    pub paid_to: Option<String>,
    pub description: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.kind.is_none()
            && self.date.is_none()
            && self.source.is_none()
            && self.paid_to.is_none()
            && self.description.is_none()
    }

    pub fn apply(&self, current: &Transaction) -> TransactionDraft {
        let mut draft = TransactionDraft::from_transaction(current);
        if let Some(kind) = self.kind {
            draft.set_kind(kind);
        }
        if let Some(amount) = self.amount {
            draft.amount = amount;
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(source) = &self.source {
            draft.source = Some(source.clone());
        }
        if let Some(paid_to) = &self.paid_to {
            draft.paid_to = Some(paid_to.clone());
        }
        if let Some(note) = &self.description {
            draft.description = Some(note.clone());
        }
        draft
    }
}

/// Trimmed name, unique across `existing` ignoring case. `exclude_id` is the
/// account being renamed.
pub fn validate_account_name(
    name: &str,
    existing: &[Account],
    exclude_id: Option<&str>,
) -> LedgerResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("Account name cannot be empty"));
    }
    let taken = existing
        .iter()
        .filter(|a| Some(a.id.as_str()) != exclude_id)
        .any(|a| a.name.trim().to_lowercase() == name.to_lowercase());
    if taken {
        return Err(LedgerError::validation(format!(
            "An account named '{}' already exists",
            name
        )));
    }
    Ok(name.to_string())
}

pub fn validate_currency(code: &str) -> LedgerResult<String> {
    let code = code.trim();
    if !CURRENCY_CODE.is_match(code) {
        return Err(LedgerError::validation(format!(
            "Invalid currency code '{}', expected three letters like USD",
            code
        )));
    }
    let code = code.to_uppercase();
    if !is_supported(&code) {
        tracing::warn!(code = %code, "no symbol for currency, amounts will show the code");
    }
    Ok(code)
}

pub fn ensure_can_delete_account(account_count: usize) -> LedgerResult<()> {
    if account_count <= 1 {
        return Err(LedgerError::validation(
            "Cannot delete the last account; at least one account must exist",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn draft_requires_counterparty_for_type() {
        let mut d = TransactionDraft::cash_in(Decimal::new(100, 0), day(), "  ");
        assert!(d.clone().validate().is_err());
        d.set_kind(TransactionType::Out);
        d.paid_to = Some("Vendor".into());
        let ok = d.validate().unwrap();
        assert_eq!(ok.source, None);
        assert_eq!(ok.paid_to.as_deref(), Some("Vendor"));
    }

    #[test]
    fn switching_type_clears_other_field() {
        let mut d = TransactionDraft::cash_in(Decimal::new(5, 0), day(), "Client");
        d.set_kind(TransactionType::Out);
        assert_eq!(d.source, None);
        d.paid_to = Some("Shop".into());
        d.set_kind(TransactionType::In);
        assert_eq!(d.paid_to, None);
    }

    #[test]
    fn rejects_both_counterparties_and_bad_amounts() {
        let mut d = TransactionDraft::cash_in(Decimal::new(5, 0), day(), "Client");
        d.paid_to = Some("Shop".into());
        assert!(d.validate().is_err());

        let zero = TransactionDraft::cash_in(Decimal::ZERO, day(), "Client");
        assert!(zero.validate().is_err());
        let negative = TransactionDraft::cash_in(Decimal::new(-1, 0), day(), "Client");
        assert!(negative.validate().is_err());
        let precise = TransactionDraft::cash_in(Decimal::new(1001, 3), day(), "Client");
        assert!(precise.validate().is_err());
        let trailing = TransactionDraft::cash_in(Decimal::new(1500, 3), day(), "Client");
        assert!(trailing.validate().is_ok());
    }

    #[test]
    fn account_names_are_unique_ignoring_case() {
        let existing = vec![Account::new("1", "Petty Cash", "USD")];
        assert!(validate_account_name("petty cash", &existing, None).is_err());
        assert_eq!(
            validate_account_name(" PETTY CASH ", &existing, Some("1")).unwrap(),
            "PETTY CASH"
        );
        assert!(validate_account_name("   ", &existing, None).is_err());
        assert_eq!(validate_account_name("Bank", &existing, None).unwrap(), "Bank");
    }

    #[test]
    fn currency_codes_are_three_letters() {
        assert_eq!(validate_currency("bdt").unwrap(), "BDT");
        assert!(validate_currency("US").is_err());
        assert!(validate_currency("U$D").is_err());
        // well-formed but without a symbol: accepted, only warned about
        assert_eq!(validate_currency("xof").unwrap(), "XOF");
    }

    #[test]
    fn last_account_cannot_be_deleted() {
        assert!(ensure_can_delete_account(1).is_err());
        assert!(ensure_can_delete_account(0).is_err());
        assert!(ensure_can_delete_account(2).is_ok());
    }
}
