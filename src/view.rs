// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Generation tickets for view state.
//!
//! Each load of a view takes a ticket before it asks the backend. A result
//! is installed only if its ticket is still the newest one issued, so a slow
//! response for an old filter can never replace a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::filter::TransactionPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct View<T> {
    issued: AtomicU64,
    current: Option<(Ticket, T)>,
}

/// The transaction page currently on screen.
pub type LedgerView = View<TransactionPage>;

impl<T> Default for View<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> View<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            current: None,
        }
    }

    /// Start a load; supersedes every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Install `value` if `ticket` is still the newest. Returns whether it
    /// was installed.
    pub fn apply(&mut self, ticket: Ticket, value: T) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "dropping stale view result");
            return false;
        }
        self.current = Some((ticket, value));
        true
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref().map(|(_, v)| v)
    }

    pub fn into_current(self) -> Option<T> {
        self.current.map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_response_for_old_ticket_is_dropped() {
        let mut view: View<&str> = View::new();
        let first = view.begin();
        let second = view.begin();

        assert!(view.apply(second, "newer filter"));
        assert!(!view.apply(first, "older filter"));
        assert_eq!(view.current(), Some(&"newer filter"));
    }

    #[test]
    fn in_order_responses_install() {
        let mut view = View::new();
        let t = view.begin();
        assert!(view.is_current(t));
        assert!(view.apply(t, 1));
        let t2 = view.begin();
        assert!(!view.is_current(t));
        assert!(view.apply(t2, 2));
        assert_eq!(view.into_current(), Some(2));
    }

    #[test]
    fn ledger_view_keeps_the_page_for_the_latest_filter() {
        use crate::filter::TransactionFilter;
        use crate::models::TransactionType;
        use crate::validation::TransactionDraft;
        use chrono::NaiveDate;
        use rust_decimal::Decimal;

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let txs = vec![
            TransactionDraft::cash_in(Decimal::TEN, day, "Client").into_transaction("t1".into()),
            TransactionDraft::cash_out(Decimal::ONE, day, "Vendor").into_transaction("t2".into()),
        ];
        let everything = TransactionFilter {
            page: 1,
            ..Default::default()
        };
        let cash_in = TransactionFilter {
            kind: Some(TransactionType::In),
            page: 1,
            ..Default::default()
        };

        let mut view = LedgerView::new();
        let slow = view.begin();
        let fast = view.begin();
        assert!(view.apply(fast, cash_in.apply(&txs)));
        assert!(!view.apply(slow, everything.apply(&txs)));
        let page = view.current().unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.transactions[0].id, "t1");
    }
}
