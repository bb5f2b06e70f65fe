// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Library error type.
//!
//! Command handlers wrap these in `anyhow` with extra context; everything
//! below the command layer returns [`LedgerResult`].

use thiserror::Error;

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Bad user input caught before any write or network call.
    #[error("{0}")]
    Validation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// Backend unreachable or timed out.
    #[error("Network error: {0}")]
    Network(String),
    /// Session missing, expired, or refresh rejected.
    #[error("Authentication required: {0}")]
    Auth(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// Any other failure reported by the server envelope.
    #[error("Server error: {0}")]
    Remote(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: &str, id: &str) -> Self {
        Self::NotFound(format!("{} '{}'", what, id))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {}", err))
        } else {
            Self::Network(err.to_string())
        }
    }
}
