// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persisted settings, overridable from flags/env at startup.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::BalanceOrder;
use crate::validation::validate_currency;

pub const KEYS: &[&str] = &[
    "mode",
    "api_url",
    "timeout_secs",
    "balance_order",
    "default_currency",
];

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Everything lives in the local store; no backend needed.
    #[default]
    Standalone,
    /// Accounts and transactions are owned by the REST API.
    Remote,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standalone => "standalone",
            Self::Remote => "remote",
        })
    }
}

impl FromStr for Mode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standalone" | "local" => Ok(Self::Standalone),
            "remote" | "api" => Ok(Self::Remote),
            other => Err(LedgerError::validation(format!(
                "Unknown mode '{}', expected standalone|remote",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub mode: Mode,
    pub api_url: Option<String>,
    pub timeout_secs: u64,
    pub balance_order: BalanceOrder,
    pub default_currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Standalone,
            api_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            balance_order: BalanceOrder::Entry,
            default_currency: crate::models::default_currency(),
        }
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> LedgerResult<Option<String>> {
    let v = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Validates `value` for `key`, stores the normalised form and returns it.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> LedgerResult<String> {
    let normalised = match key {
        "mode" => value.parse::<Mode>()?.to_string(),
        "api_url" => {
            reqwest::Url::parse(value.trim()).map_err(|e| {
                LedgerError::validation(format!("Invalid api_url '{}': {}", value, e))
            })?;
            value.trim().trim_end_matches('/').to_string()
        }
        "timeout_secs" => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| LedgerError::validation("timeout_secs must be a positive integer"))?
            .to_string(),
        "balance_order" => value.parse::<BalanceOrder>()?.to_string(),
        "default_currency" => validate_currency(value)?,
        other => {
            return Err(LedgerError::validation(format!(
                "Unknown setting '{}', expected one of: {}",
                other,
                KEYS.join(", ")
            )));
        }
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, normalised],
    )?;
    Ok(normalised)
}

impl AppConfig {
    pub fn load(conn: &Connection) -> LedgerResult<Self> {
        let mut cfg = Self::default();
        if let Some(v) = get_setting(conn, "mode")? {
            cfg.mode = v.parse()?;
        }
        cfg.api_url = get_setting(conn, "api_url")?;
        if let Some(v) = get_setting(conn, "timeout_secs")? {
            cfg.timeout_secs = v.parse().unwrap_or(DEFAULT_TIMEOUT_SECS);
        }
        if let Some(v) = get_setting(conn, "balance_order")? {
            cfg.balance_order = v.parse()?;
        }
        if let Some(v) = get_setting(conn, "default_currency")? {
            cfg.default_currency = v;
        }
        Ok(cfg)
    }

    /// Flag/env values win over persisted ones for this run only.
    pub fn with_overrides(
        mut self,
        mode: Option<&str>,
        api_url: Option<&str>,
    ) -> LedgerResult<Self> {
        if let Some(m) = mode {
            self.mode = m.parse()?;
        }
        if let Some(url) = api_url {
            self.api_url = Some(url.trim().trim_end_matches('/').to_string());
        }
        Ok(self)
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        vec![
            vec!["mode".into(), self.mode.to_string()],
            vec!["api_url".into(), self.api_url.clone().unwrap_or_default()],
            vec!["timeout_secs".into(), self.timeout_secs.to_string()],
            vec!["balance_order".into(), self.balance_order.to_string()],
            vec!["default_currency".into(), self.default_currency.clone()],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn defaults_then_persisted_values() {
        let conn = open_in_memory().unwrap();
        assert_eq!(AppConfig::load(&conn).unwrap(), AppConfig::default());

        set_setting(&conn, "mode", "Remote").unwrap();
        set_setting(&conn, "api_url", "https://api.example.com/v1/").unwrap();
        set_setting(&conn, "balance_order", "date").unwrap();
        set_setting(&conn, "default_currency", "bdt").unwrap();
        let cfg = AppConfig::load(&conn).unwrap();
        assert_eq!(cfg.mode, Mode::Remote);
        assert_eq!(cfg.api_url.as_deref(), Some("https://api.example.com/v1"));
        assert_eq!(cfg.balance_order, BalanceOrder::Chronological);
        assert_eq!(cfg.default_currency, "BDT");
    }

    #[test]
    fn rejects_unknown_or_bad_values() {
        let conn = open_in_memory().unwrap();
        assert!(set_setting(&conn, "colour", "blue").is_err());
        assert!(set_setting(&conn, "timeout_secs", "0").is_err());
        assert!(set_setting(&conn, "api_url", "not a url").is_err());
        assert_eq!(get_setting(&conn, "timeout_secs").unwrap(), None);
    }

    #[test]
    fn overrides_apply_for_the_run() {
        let cfg = AppConfig::default()
            .with_overrides(Some("remote"), Some("http://localhost:5000/api/"))
            .unwrap();
        assert_eq!(cfg.mode, Mode::Remote);
        assert_eq!(cfg.api_url.as_deref(), Some("http://localhost:5000/api"));
    }
}
