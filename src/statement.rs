// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account statements: one account's rows for a period, in date order, with
//! the balances stored on each row.

use chrono::{Local, NaiveDate};
use comfy_table::Table;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

use crate::currency::{format_money, round};
use crate::error::{LedgerError, LedgerResult};
use crate::filter::{SortKey, TransactionFilter};
use crate::ledger::closing_balance;
use crate::models::{Account, Summary, Transaction, TransactionType};
use crate::utils::pretty_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Table,
    Csv,
    Json,
    Html,
}

impl FromStr for StatementFormat {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "html" | "print" => Ok(Self::Html),
            other => Err(LedgerError::validation(format!(
                "Unknown format: {} (use table|csv|json|html)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub account_id: String,
    pub account: String,
    pub currency: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub generated: NaiveDate,
    pub rows: Vec<Transaction>,
    pub summary: Summary,
    /// Balance of the whole account, not just the period.
    pub account_balance: Decimal,
}

impl Statement {
    /// `account` must carry its full ledger. Sorting and paging on `filter`
    /// are ignored; rows are always date order, stable on entry order.
    pub fn build(account: &Account, filter: &TransactionFilter) -> Self {
        let period = TransactionFilter {
            sort: SortKey::Date,
            descending: false,
            page: 1,
            per_page: None,
            ..filter.clone()
        };
        let page = period.apply(&account.transactions);
        let from = filter
            .from
            .or_else(|| page.transactions.first().map(|t| t.date));
        let to = filter.to.or_else(|| page.transactions.last().map(|t| t.date));
        Self {
            account_id: account.id.clone(),
            account: account.name.clone(),
            currency: account.currency.clone(),
            from,
            to,
            generated: Local::now().date_naive(),
            rows: page.transactions,
            summary: page.summary,
            account_balance: closing_balance(&account.transactions),
        }
    }

    pub fn period_label(&self) -> String {
        match (self.from, self.to) {
            (Some(f), Some(t)) => format!("{} to {}", f, t),
            (Some(f), None) => format!("from {}", f),
            (None, Some(t)) => format!("until {}", t),
            (None, None) => "no transactions".to_string(),
        }
    }

    fn money(&self, amount: Decimal) -> String {
        format_money(amount, &self.currency)
    }

    fn split(tx: &Transaction) -> (Option<Decimal>, Option<Decimal>) {
        match tx.kind {
            TransactionType::In => (Some(tx.amount), None),
            TransactionType::Out => (None, Some(tx.amount)),
        }
    }

    pub fn to_table(&self) -> Table {
        let rows = self
            .rows
            .iter()
            .map(|t| {
                let (cash_in, cash_out) = Self::split(t);
                vec![
                    t.date.to_string(),
                    t.kind.label().to_string(),
                    t.counterparty().to_string(),
                    t.description.clone().unwrap_or_default(),
                    cash_in.map(|a| self.money(a)).unwrap_or_default(),
                    cash_out.map(|a| self.money(a)).unwrap_or_default(),
                    self.money(t.balance),
                ]
            })
            .collect();
        pretty_table(
            &["Date", "Type", "Party", "Description", "Cash In", "Cash Out", "Balance"],
            rows,
        )
    }

    /// Footer lines printed under the table.
    pub fn totals_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Total in:  {} ({} entries)",
                self.money(self.summary.total_in),
                self.summary.in_count
            ),
            format!(
                "Total out: {} ({} entries)",
                self.money(self.summary.total_out),
                self.summary.out_count
            ),
            format!("Net:       {}", self.money(self.summary.net_balance)),
            format!("Account balance: {}", self.money(self.account_balance)),
        ]
    }

    pub fn write_csv<W: Write>(&self, out: W) -> LedgerResult<()> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record([
            "date",
            "type",
            "party",
            "description",
            "cash_in",
            "cash_out",
            "balance",
        ])?;
        for t in &self.rows {
            let (cash_in, cash_out) = Self::split(t);
            let plain = |a: Option<Decimal>| {
                a.map(|a| format!("{:.2}", round(a)))
                    .unwrap_or_default()
            };
            wtr.write_record([
                t.date.to_string(),
                t.kind.as_str().to_string(),
                t.counterparty().to_string(),
                t.description.clone().unwrap_or_default(),
                plain(cash_in),
                plain(cash_out),
                format!("{:.2}", round(t.balance)),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_json(&self) -> LedgerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Self-contained printable page.
    pub fn to_html(&self) -> String {
        let mut body = String::new();
        for t in &self.rows {
            let (cash_in, cash_out) = Self::split(t);
            body.push_str(&format!(
                "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td class=\"num\">{}</td><td class=\"num\">{}</td>\
                 <td class=\"num\">{}</td></tr>\n",
                t.date,
                t.kind.label(),
                escape_html(t.counterparty()),
                escape_html(t.description.as_deref().unwrap_or("")),
                cash_in.map(|a| escape_html(&self.money(a))).unwrap_or_default(),
                cash_out.map(|a| escape_html(&self.money(a))).unwrap_or_default(),
                escape_html(&self.money(t.balance)),
            ));
        }
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Statement: {title}</title>
  <style>
    body {{ font-family: sans-serif; margin: 2em; }}
    table {{ border-collapse: collapse; width: 100%; }}
    th, td {{ border: 1px solid #ccc; padding: 4px 8px; }}
    .num {{ text-align: right; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p>Period: {period}<br>Generated: {generated}</p>
  <table>
    <thead>
      <tr>
        <th>Date</th><th>Type</th><th>Party</th><th>Description</th>
        <th>Cash In</th><th>Cash Out</th><th>Balance</th>
      </tr>
    </thead>
    <tbody>
{body}    </tbody>
  </table>
  <p>Total in: {total_in}<br>Total out: {total_out}<br>Net: {net}<br>Account balance: {balance}</p>
</body>
</html>
"#,
            title = escape_html(&self.account),
            period = escape_html(&self.period_label()),
            generated = self.generated,
            body = body,
            total_in = escape_html(&self.money(self.summary.total_in)),
            total_out = escape_html(&self.money(self.summary.total_out)),
            net = escape_html(&self.money(self.summary.net_balance)),
            balance = escape_html(&self.money(self.account_balance)),
        )
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::recompute_balances;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn account() -> Account {
        let raw = vec![
            Transaction {
                id: "1".into(),
                amount: Decimal::new(100, 0),
                kind: TransactionType::In,
                date: day(5),
                source: Some("Client <A>".into()),
                paid_to: None,
                description: None,
                balance: Decimal::ZERO,
            },
            Transaction {
                id: "2".into(),
                amount: Decimal::new(4050, 2),
                kind: TransactionType::Out,
                date: day(2),
                source: None,
                paid_to: Some("Fuel & Co".into()),
                description: Some("diesel".into()),
                balance: Decimal::ZERO,
            },
        ];
        let mut acct = Account::new("a1", "Shop", "usd");
        acct.transactions = recompute_balances(&raw).unwrap();
        acct
    }

    #[test]
    fn rows_are_date_ordered_with_stored_balances() {
        let st = Statement::build(&account(), &TransactionFilter::default());
        assert_eq!(st.rows[0].id, "2");
        // balance chains in entry order, so the earlier-dated row shows 59.50
        assert_eq!(st.rows[0].balance, Decimal::new(5950, 2));
        assert_eq!(st.from, Some(day(2)));
        assert_eq!(st.to, Some(day(5)));
        assert_eq!(st.summary.net_balance, Decimal::new(5950, 2));
    }

    #[test]
    fn period_filter_narrows_rows_not_account_balance() {
        let filter = TransactionFilter {
            from: Some(day(3)),
            ..Default::default()
        };
        let st = Statement::build(&account(), &filter);
        assert_eq!(st.rows.len(), 1);
        assert_eq!(st.summary.total_out, Decimal::ZERO);
        assert_eq!(st.account_balance, Decimal::new(5950, 2));
        assert_eq!(st.period_label(), "2024-03-03 to 2024-03-05");
    }

    #[test]
    fn csv_has_plain_two_decimal_amounts() {
        let st = Statement::build(&account(), &TransactionFilter::default());
        let mut buf = Vec::new();
        st.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,type,party,description,cash_in,cash_out,balance");
        assert_eq!(lines[1], "2024-03-02,out,Fuel & Co,diesel,,40.50,59.50");
        assert_eq!(lines[2], "2024-03-05,in,Client <A>,,100.00,,100.00");
    }

    #[test]
    fn html_escapes_user_text() {
        let html = Statement::build(&account(), &TransactionFilter::default()).to_html();
        assert!(html.contains("Client &lt;A&gt;"));
        assert!(html.contains("Fuel &amp; Co"));
        assert!(!html.contains("<A>"));
        assert!(html.contains("$59.50"));
    }

    #[test]
    fn format_names() {
        assert_eq!("CSV".parse::<StatementFormat>().unwrap(), StatementFormat::Csv);
        assert_eq!("print".parse::<StatementFormat>().unwrap(), StatementFormat::Html);
        assert!("pdf".parse::<StatementFormat>().is_err());
    }
}
