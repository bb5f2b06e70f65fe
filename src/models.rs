// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(alias = "_id", deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(
        default,
        deserialize_with = "de_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDate>,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, currency: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            currency: currency.trim().to_uppercase(),
            transactions: Vec::new(),
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    In,
    Out,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::In => "Cash In",
            Self::Out => "Cash Out",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "in" | "cash_in" | "cashin" => Ok(Self::In),
            "out" | "cash_out" | "cashout" => Ok(Self::Out),
            other => Err(LedgerError::validation(format!(
                "Unknown transaction type '{}', expected in|out",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(alias = "_id", deserialize_with = "de_id")]
    pub id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Running account balance right after this entry; owned by the ledger engine.
    #[serde(default)]
    pub balance: Decimal,
}

impl Transaction {
    /// `+amount` for cash in, `-amount` for cash out.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::In => self.amount,
            TransactionType::Out => -self.amount,
        }
    }

    /// Source for cash in, recipient for cash out.
    pub fn counterparty(&self) -> &str {
        let v = match self.kind {
            TransactionType::In => self.source.as_deref(),
            TransactionType::Out => self.paid_to.as_deref(),
        };
        v.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Summary {
    pub total_in: Decimal,
    pub total_out: Decimal,
    pub net_balance: Decimal,
    pub in_count: usize,
    pub out_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
}

pub fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Ids are opaque: accept both `"abc"` and `42` from the wire.
pub(crate) fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(RawId::deserialize(d)?.into())
}

pub(crate) fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?.map(String::from))
}

fn parse_wire_date<E: serde::de::Error>(s: &str) -> Result<NaiveDate, E> {
    // servers may send a full timestamp; only the calendar date matters here
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|e| E::custom(format!("invalid date '{}': {}", s, e)))
}

pub(crate) fn de_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let s = String::deserialize(d)?;
    parse_wire_date(&s)
}

pub(crate) fn de_opt_date<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(s) if !s.is_empty() => parse_wire_date(&s).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_accepts_numeric_id_and_timestamp_date() {
        let raw = r#"{"id":17,"amount":"12.50","type":"out",
            "date":"2024-03-05T09:30:00.000Z","paidTo":"Vendor"}"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.id, "17");
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(tx.counterparty(), "Vendor");
        assert_eq!(tx.signed_amount(), Decimal::new(-1250, 2));
        assert_eq!(tx.balance, Decimal::ZERO);
    }

    #[test]
    fn transaction_serializes_wire_names() {
        let tx = Transaction {
            id: "t1".into(),
            amount: Decimal::new(40, 0),
            kind: TransactionType::Out,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            source: None,
            paid_to: Some("Vendor B".into()),
            description: None,
            balance: Decimal::new(60, 0),
        };
        let v = serde_json::to_value(&tx).unwrap();
        assert_eq!(v["type"], "out");
        assert_eq!(v["paidTo"], "Vendor B");
        assert_eq!(v["date"], "2024-01-02");
        assert!(v.get("source").is_none());
    }

    #[test]
    fn transaction_type_parses_aliases() {
        assert_eq!("Cash In".parse::<TransactionType>().unwrap(), TransactionType::In);
        assert_eq!("cash-out".parse::<TransactionType>().unwrap(), TransactionType::Out);
        assert!("transfer".parse::<TransactionType>().is_err());
    }
}
