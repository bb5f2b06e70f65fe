// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod backend;
pub mod book;
pub mod cli;
pub mod commands;
pub mod config;
pub mod currency;
pub mod db;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod models;
pub mod receipts;
pub mod session;
pub mod statement;
pub mod utils;
pub mod validation;
pub mod view;

pub use error::{LedgerError, LedgerResult};
