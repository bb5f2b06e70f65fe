// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::backend::LocalBackend;
use cashbook::book::Book;
use cashbook::commands::{statement, summary};
use cashbook::ledger::BalanceOrder;
use cashbook::validation::TransactionDraft;
use cashbook::{cli, db};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::tempdir;

fn seeded(conn: &Connection) -> Book<'_> {
    let book = Book::new(
        Box::new(LocalBackend::new(conn, BalanceOrder::Entry, "BDT")),
        BalanceOrder::Entry,
    );
    let acct = book.find_account("Cash Book").unwrap();
    let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
    book.add_transaction(
        &acct.id,
        TransactionDraft::cash_in(Decimal::new(150000, 2), day(1), "Opening float"),
    )
    .unwrap();
    book.add_transaction(
        &acct.id,
        TransactionDraft::cash_out(Decimal::new(25050, 2), day(3), "Tea, \"Stall\"")
            .with_description("staff"),
    )
    .unwrap();
    book.add_transaction(
        &acct.id,
        TransactionDraft::cash_out(Decimal::new(1000, 2), day(20), "Courier"),
    )
    .unwrap();
    book
}

fn run_statement(book: &Book, args: &[&str]) {
    let mut argv = vec!["cashbook", "statement", "--account", "Cash Book"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("statement", sub)) => statement::handle(book, sub).unwrap(),
        _ => panic!("no statement subcommand"),
    }
}

#[test]
fn csv_export_quotes_and_formats() {
    let conn = db::open_in_memory().unwrap();
    let book = seeded(&conn);
    let dir = tempdir().unwrap();
    let out = dir.path().join("may.csv");
    let out_str = out.to_string_lossy().to_string();

    run_statement(&book, &["--format", "csv", "--out", &out_str]);

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][2], "Tea, \"Stall\"");
    assert_eq!(&rows[1][5], "250.50");
    assert_eq!(&rows[1][6], "1249.50");
    assert_eq!(&rows[2][6], "1239.50");
}

#[test]
fn json_export_respects_the_period() {
    let conn = db::open_in_memory().unwrap();
    let book = seeded(&conn);
    let dir = tempdir().unwrap();
    let out = dir.path().join("early-may.json");
    let out_str = out.to_string_lossy().to_string();

    run_statement(
        &book,
        &["--from", "2024-05-01", "--to", "2024-05-10", "--format", "json", "--out", &out_str],
    );

    let v: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["account"], "Cash Book");
    assert_eq!(v["currency"], "BDT");
    assert_eq!(v["rows"].as_array().unwrap().len(), 2);
    assert_eq!(v["summary"]["outCount"], 1);
    assert_eq!(v["from"], "2024-05-01");
}

#[test]
fn html_statement_is_printable_and_escaped() {
    let conn = db::open_in_memory().unwrap();
    let book = seeded(&conn);
    let dir = tempdir().unwrap();
    let out = dir.path().join("print.html");
    let out_str = out.to_string_lossy().to_string();

    run_statement(&book, &["--format", "html", "--out", &out_str]);

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Tea, &quot;Stall&quot;"));
    assert!(html.contains("৳1,239.50"));
}

#[test]
fn overview_keeps_currencies_apart() {
    let conn = db::open_in_memory().unwrap();
    let book = seeded(&conn);
    let usd = book.create_account("Dollars", "USD").unwrap();
    book.add_transaction(
        &usd.id,
        TransactionDraft::cash_in(
            Decimal::new(20, 0),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            "Friend",
        ),
    )
    .unwrap();

    let overview = summary::query_overview(&book).unwrap();
    assert_eq!(overview.accounts.len(), 2);
    assert_eq!(overview.by_currency["BDT"].net_balance, Decimal::new(123950, 2));
    assert_eq!(overview.by_currency["USD"].net_balance, Decimal::new(20, 0));
}
