// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Receipt attachments.
//!
//! Metadata is persisted with the rest of the local state. File content is
//! held only in a [`ReceiptBlobs`] store owned by the [`ReceiptLibrary`] and
//! is gone when the process exits.

use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

use crate::db::{kv_get_json, kv_set_json};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{de_date, de_opt_id};

const RECEIPTS_KEY: &str = "receipts.metadata";
pub const MAX_RECEIPT_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    Image,
    Pdf,
    Document,
}

impl ReceiptKind {
    pub fn from_file_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "heic" => Self::Image,
            "pdf" => Self::Pdf,
            _ => Self::Document,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Document => "document",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ReceiptKind,
    pub size: u64,
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub transaction_id: Option<String>,
}

pub trait ReceiptBlobs {
    fn put(&mut self, id: &str, bytes: Vec<u8>);
    fn get(&self, id: &str) -> Option<&[u8]>;
    fn delete(&mut self, id: &str) -> bool;
}

/// In-memory blobs for the life of one session.
#[derive(Debug, Default)]
pub struct SessionBlobs {
    blobs: HashMap<String, Vec<u8>>,
}

impl ReceiptBlobs for SessionBlobs {
    fn put(&mut self, id: &str, bytes: Vec<u8>) {
        self.blobs.insert(id.to_string(), bytes);
    }

    fn get(&self, id: &str) -> Option<&[u8]> {
        self.blobs.get(id).map(Vec::as_slice)
    }

    fn delete(&mut self, id: &str) -> bool {
        self.blobs.remove(id).is_some()
    }
}

pub struct ReceiptLibrary<'c, B: ReceiptBlobs> {
    conn: &'c Connection,
    blobs: B,
}

impl<'c, B: ReceiptBlobs> ReceiptLibrary<'c, B> {
    pub fn new(conn: &'c Connection, blobs: B) -> Self {
        Self { conn, blobs }
    }

    pub fn list(&self) -> LedgerResult<Vec<Receipt>> {
        Ok(kv_get_json(self.conn, RECEIPTS_KEY)?.unwrap_or_default())
    }

    fn save(&self, receipts: &[Receipt]) -> LedgerResult<()> {
        kv_set_json(self.conn, RECEIPTS_KEY, &receipts)
    }

    pub fn for_transaction(&self, tx_id: &str) -> LedgerResult<Vec<Receipt>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.transaction_id.as_deref() == Some(tx_id))
            .collect())
    }

    pub fn attach(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
        transaction_id: Option<&str>,
    ) -> LedgerResult<Receipt> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("Receipt needs a file name"));
        }
        let size = bytes.len() as u64;
        if size > MAX_RECEIPT_BYTES {
            return Err(LedgerError::validation(format!(
                "Receipt '{}' is {}, the limit is {}",
                name,
                format_size(size),
                format_size(MAX_RECEIPT_BYTES)
            )));
        }
        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind: ReceiptKind::from_file_name(name),
            size,
            date: Local::now().date_naive(),
            transaction_id: transaction_id.map(str::to_string),
        };
        let mut all = self.list()?;
        all.push(receipt.clone());
        self.save(&all)?;
        self.blobs.put(&receipt.id, bytes);
        debug!(id = %receipt.id, size, "receipt attached");
        Ok(receipt)
    }

    /// `Ok(None)` when the metadata exists but the content did not survive
    /// the session that uploaded it.
    pub fn content(&self, id: &str) -> LedgerResult<Option<&[u8]>> {
        if !self.list()?.iter().any(|r| r.id == id) {
            return Err(LedgerError::not_found("receipt", id));
        }
        Ok(self.blobs.get(id))
    }

    pub fn remove(&mut self, id: &str) -> LedgerResult<Receipt> {
        let mut all = self.list()?;
        let idx = all
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| LedgerError::not_found("receipt", id))?;
        let removed = all.remove(idx);
        self.save(&all)?;
        self.blobs.delete(id);
        Ok(removed)
    }

    /// Unlink receipts from a deleted transaction; the receipts stay.
    pub fn detach_transaction(&self, tx_id: &str) -> LedgerResult<usize> {
        let mut all = self.list()?;
        let mut n = 0;
        for r in all.iter_mut() {
            if r.transaction_id.as_deref() == Some(tx_id) {
                r.transaction_id = None;
                n += 1;
            }
        }
        if n > 0 {
            self.save(&all)?;
        }
        Ok(n)
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn kind_from_extension() {
        assert_eq!(ReceiptKind::from_file_name("IMG_001.JPG"), ReceiptKind::Image);
        assert_eq!(ReceiptKind::from_file_name("bill.pdf"), ReceiptKind::Pdf);
        assert_eq!(ReceiptKind::from_file_name("notes.docx"), ReceiptKind::Document);
        assert_eq!(ReceiptKind::from_file_name("README"), ReceiptKind::Document);
    }

    #[test]
    fn content_lives_only_as_long_as_the_blob_store() {
        let conn = open_in_memory().unwrap();
        let id = {
            let mut lib = ReceiptLibrary::new(&conn, SessionBlobs::default());
            let r = lib.attach("fuel.png", vec![1, 2, 3], Some("tx-1")).unwrap();
            assert_eq!(lib.content(&r.id).unwrap(), Some(&[1u8, 2, 3][..]));
            r.id
        };
        // new session: metadata survives, content does not
        let lib = ReceiptLibrary::new(&conn, SessionBlobs::default());
        assert_eq!(lib.list().unwrap().len(), 1);
        assert_eq!(lib.content(&id).unwrap(), None);
        assert!(lib.content("missing").is_err());
    }

    #[test]
    fn detach_and_remove() {
        let conn = open_in_memory().unwrap();
        let mut lib = ReceiptLibrary::new(&conn, SessionBlobs::default());
        let a = lib.attach("a.pdf", vec![0; 10], Some("tx-1")).unwrap();
        lib.attach("b.pdf", vec![0; 10], Some("tx-2")).unwrap();
        assert_eq!(lib.detach_transaction("tx-1").unwrap(), 1);
        assert!(lib.for_transaction("tx-1").unwrap().is_empty());
        assert_eq!(lib.for_transaction("tx-2").unwrap().len(), 1);

        lib.remove(&a.id).unwrap();
        assert_eq!(lib.list().unwrap().len(), 1);
        assert!(lib.remove(&a.id).is_err());
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
