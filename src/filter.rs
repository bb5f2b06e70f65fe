// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::ledger::summarize;
use crate::models::{Summary, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    /// Insertion order, i.e. the balance chain order.
    Entry,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Entry => "entry",
        }
    }
}

impl FromStr for SortKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "entry" => Ok(Self::Entry),
            other => Err(LedgerError::validation(format!(
                "Unknown sort key '{}', expected date|amount|entry",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    pub search: Option<String>,
    pub sort: SortKey,
    pub descending: bool,
    /// 1-based.
    pub page: usize,
    pub per_page: Option<usize>,
}

/// One page of a filtered view. `summary` covers every match, not just the
/// page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: usize,
    pub page: usize,
    pub per_page: Option<usize>,
    pub summary: Summary,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.from.is_some_and(|from| tx.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| tx.date > to) {
            return false;
        }
        if self.kind.is_some_and(|k| tx.kind != k) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                [
                    tx.source.as_deref(),
                    tx.paid_to.as_deref(),
                    tx.description.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&q))
                    || tx.amount.to_string().contains(&q)
            }
            _ => true,
        }
    }

    /// Filter, sort and slice. Stored balances pass through untouched.
    pub fn apply(&self, transactions: &[Transaction]) -> TransactionPage {
        let mut hits: Vec<&Transaction> = transactions.iter().filter(|t| self.matches(t)).collect();
        match self.sort {
            SortKey::Date => hits.sort_by_key(|t| t.date),
            SortKey::Amount => hits.sort_by_key(|t| t.amount),
            SortKey::Entry => {}
        }
        if self.descending {
            hits.reverse();
        }

        let summary = summarize(hits.iter().copied());
        let total = hits.len();
        let page = self.page.max(1);
        let transactions: Vec<Transaction> = match self.per_page {
            Some(per) if per > 0 => hits
                .into_iter()
                .skip((page - 1) * per)
                .take(per)
                .cloned()
                .collect(),
            _ => hits.into_iter().cloned().collect(),
        };
        TransactionPage {
            transactions,
            total,
            page,
            per_page: self.per_page,
            summary,
        }
    }

    /// Query pairs for `GET /ledger/{id}/transactions`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q: Vec<(String, String)> = Vec::new();
        if let Some(from) = self.from {
            q.push(("startDate".into(), from.to_string()));
        }
        if let Some(to) = self.to {
            q.push(("endDate".into(), to.to_string()));
        }
        if let Some(kind) = self.kind {
            q.push(("type".into(), kind.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            q.push(("search".into(), search.to_string()));
        }
        q.push(("sortBy".into(), self.sort.as_str().into()));
        q.push((
            "sortOrder".into(),
            if self.descending { "desc" } else { "asc" }.into(),
        ));
        q.push(("page".into(), self.page.max(1).to_string()));
        if let Some(per) = self.per_page {
            q.push(("limit".into(), per.to_string()));
        }
        q
    }
}
