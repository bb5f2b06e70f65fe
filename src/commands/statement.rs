// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::Book;
use crate::commands::transactions::period_filter;
use crate::statement::{Statement, StatementFormat};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

pub fn handle(book: &Book, m: &clap::ArgMatches) -> Result<()> {
    let fmt: StatementFormat = m.get_one::<String>("format").unwrap().parse()?;
    let out = m.get_one::<String>("out");
    let statement = build(book, m)?;

    match out {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Create {}", path))?;
            let mut w = BufWriter::new(file);
            render(&statement, fmt, &mut w)?;
            w.flush()?;
            println!("Exported statement for '{}' to {}", statement.account, path);
        }
        None => render(&statement, fmt, &mut io::stdout().lock())?,
    }
    Ok(())
}

pub fn build(book: &Book, m: &clap::ArgMatches) -> Result<Statement> {
    let key = m.get_one::<String>("account").unwrap();
    let acct = book.find_account(key)?;
    let ledger = book.ledger(&acct.id)?;
    Ok(Statement::build(&ledger, &period_filter(m)?))
}

fn render<W: Write>(st: &Statement, fmt: StatementFormat, w: &mut W) -> Result<()> {
    match fmt {
        StatementFormat::Table => {
            writeln!(w, "{} ({}), {}", st.account, st.currency, st.period_label())?;
            writeln!(w, "{}", st.to_table())?;
            for line in st.totals_lines() {
                writeln!(w, "{}", line)?;
            }
        }
        StatementFormat::Csv => st.write_csv(w)?,
        StatementFormat::Json => writeln!(w, "{}", st.to_json()?)?,
        StatementFormat::Html => w.write_all(st.to_html().as_bytes())?,
    }
    Ok(())
}
