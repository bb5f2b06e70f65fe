// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use cashbook::config::AppConfig;
use cashbook::receipts::{ReceiptLibrary, SessionBlobs};
use cashbook::session::KvSessionStore;
use cashbook::{cli, commands, db, LedgerError};

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "cashbook=info",
        _ => "cashbook=debug",
    };
    let filter = EnvFilter::try_from_env("CASHBOOK_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    init_tracing(matches.get_count("verbose"));

    let conn = db::open_or_init()?;
    let cfg = AppConfig::load(&conn)?.with_overrides(
        matches.get_one::<String>("mode").map(String::as_str),
        matches.get_one::<String>("api-url").map(String::as_str),
    )?;
    let store = KvSessionStore::new(&conn);

    let result = match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
            Ok(())
        }
        Some(("account", sub)) => commands::open_book(&conn, &cfg, &store)
            .and_then(|book| commands::accounts::handle(&book, &cfg.default_currency, sub)),
        Some(("tx", sub)) => commands::open_book(&conn, &cfg, &store).and_then(|book| {
            let receipts = ReceiptLibrary::new(&conn, SessionBlobs::default());
            commands::transactions::handle(&book, &receipts, sub)
        }),
        Some(("summary", sub)) => commands::open_book(&conn, &cfg, &store)
            .and_then(|book| commands::summary::handle(&book, sub)),
        Some(("statement", sub)) => commands::open_book(&conn, &cfg, &store)
            .and_then(|book| commands::statement::handle(&book, sub)),
        Some(("receipt", sub)) => {
            let mut receipts = ReceiptLibrary::new(&conn, SessionBlobs::default());
            commands::receipts::handle(&mut receipts, sub)
        }
        Some(("auth", sub)) => commands::api_client(&cfg, &store)
            .and_then(|client| commands::auth::handle(&client, sub)),
        Some(("config", sub)) => commands::settings::handle(&conn, &cfg, sub),
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };

    if let Err(err) = &result {
        let expired = err
            .chain()
            .filter_map(|e| e.downcast_ref::<LedgerError>())
            .any(LedgerError::is_auth);
        if expired {
            eprintln!("Your session has ended. Run `cashbook auth login` to sign in again.");
        }
    }
    result
}
