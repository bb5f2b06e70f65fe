// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod auth;
pub mod receipts;
pub mod settings;
pub mod statement;
pub mod summary;
pub mod transactions;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::api::{ApiClient, HttpTransport};
use crate::backend::{LocalBackend, RemoteBackend};
use crate::book::Book;
use crate::config::{AppConfig, Mode};
use crate::session::SessionStore;

pub fn api_client<'s>(
    cfg: &AppConfig,
    store: &'s dyn SessionStore,
) -> Result<ApiClient<'s, HttpTransport>> {
    let url = cfg.api_url.as_deref().context(
        "No backend configured; run `cashbook config set api_url <URL>` or pass --api-url",
    )?;
    Ok(ApiClient::new(HttpTransport::new(url, cfg.timeout_secs)?, store))
}

/// The book for the configured mode.
pub fn open_book<'a>(
    conn: &'a Connection,
    cfg: &AppConfig,
    store: &'a dyn SessionStore,
) -> Result<Book<'a>> {
    let book = match cfg.mode {
        Mode::Standalone => Book::new(
            Box::new(LocalBackend::new(conn, cfg.balance_order, &cfg.default_currency)),
            cfg.balance_order,
        ),
        Mode::Remote => {
            if !store.load()?.is_authenticated() {
                anyhow::bail!("Not signed in; run `cashbook auth login` first");
            }
            Book::new(
                Box::new(RemoteBackend::new(api_client(cfg, store)?)),
                cfg.balance_order,
            )
        }
    };
    tracing::debug!(mode = %cfg.mode, order = %cfg.balance_order, "book opened");
    Ok(book)
}
