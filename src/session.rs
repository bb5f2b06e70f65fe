// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Credentials and cached profile kept between runs.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

use crate::db::{kv_get, kv_get_json, kv_remove, kv_set, kv_set_json};
use crate::error::LedgerResult;
use crate::models::User;

const ACCESS_KEY: &str = "auth.accessToken";
const REFRESH_KEY: &str = "auth.refreshToken";
const USER_KEY: &str = "auth.user";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

pub trait SessionStore {
    fn load(&self) -> LedgerResult<Session>;
    fn save(&self, session: &Session) -> LedgerResult<()>;
    fn clear(&self) -> LedgerResult<()>;
}

/// Session persisted in the local key-value store.
pub struct KvSessionStore<'c> {
    conn: &'c Connection,
}

impl<'c> KvSessionStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl SessionStore for KvSessionStore<'_> {
    fn load(&self) -> LedgerResult<Session> {
        Ok(Session {
            access_token: kv_get(self.conn, ACCESS_KEY)?,
            refresh_token: kv_get(self.conn, REFRESH_KEY)?,
            // a corrupt cached profile is not worth failing over
            user: kv_get_json(self.conn, USER_KEY).ok().flatten(),
        })
    }

    fn save(&self, session: &Session) -> LedgerResult<()> {
        match &session.access_token {
            Some(t) => kv_set(self.conn, ACCESS_KEY, t)?,
            None => kv_remove(self.conn, ACCESS_KEY)?,
        }
        match &session.refresh_token {
            Some(t) => kv_set(self.conn, REFRESH_KEY, t)?,
            None => kv_remove(self.conn, REFRESH_KEY)?,
        }
        match &session.user {
            Some(u) => kv_set_json(self.conn, USER_KEY, u)?,
            None => kv_remove(self.conn, USER_KEY)?,
        }
        Ok(())
    }

    fn clear(&self) -> LedgerResult<()> {
        for key in [ACCESS_KEY, REFRESH_KEY, USER_KEY] {
            kv_remove(self.conn, key)?;
        }
        Ok(())
    }
}

/// Process-lifetime session, never written anywhere.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: RefCell<Session>,
}

impl MemorySessionStore {
    pub fn with(session: Session) -> Self {
        Self {
            inner: RefCell::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> LedgerResult<Session> {
        Ok(self.inner.borrow().clone())
    }

    fn save(&self, session: &Session) -> LedgerResult<()> {
        *self.inner.borrow_mut() = session.clone();
        Ok(())
    }

    fn clear(&self) -> LedgerResult<()> {
        *self.inner.borrow_mut() = Session::default();
        Ok(())
    }
}
