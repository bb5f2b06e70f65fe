// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, value_parser, Arg, ArgAction, Command};

fn account_arg() -> Arg {
    arg!(--account <ACCOUNT> "Account name or id").required(true)
}

fn yes_arg() -> Arg {
    arg!(--yes "Confirm a destructive action")
}

fn json_args() -> [Arg; 2] {
    [
        arg!(--json "Print as pretty JSON"),
        arg!(--jsonl "Print one JSON object per line"),
    ]
}

/// Period and type filters shared by `tx list` and `statement`.
fn filter_args() -> [Arg; 4] {
    [
        arg!(--from <DATE> "Earliest date, YYYY-MM-DD"),
        arg!(--to <DATE> "Latest date, YYYY-MM-DD"),
        arg!(--"type" <TYPE> "in|out"),
        arg!(--search <TEXT> "Case-insensitive match on party, description or amount"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("cashbook")
        .about("Cash book: accounts, cash in/out and running balances")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More log output on stderr (-v info, -vv debug)"),
        )
        .arg(
            arg!(--mode <MODE> "standalone|remote, overrides the saved setting")
                .env("CASHBOOK_MODE")
                .global(true),
        )
        .arg(
            arg!(--"api-url" <URL> "Backend base URL, overrides the saved setting")
                .env("CASHBOOK_API_URL")
                .global(true),
        )
        .subcommand(Command::new("init").about("Create the local store"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(arg!(<name> "Account name"))
                        .arg(arg!(--currency <CCY> "Currency code, e.g. USD")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("rename")
                        .arg(arg!(<account> "Account name or id"))
                        .arg(arg!(<new_name> "New name")),
                )
                .subcommand(
                    Command::new("currency")
                        .arg(arg!(<account> "Account name or id"))
                        .arg(arg!(<code> "Currency code")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(arg!(<account> "Account name or id"))
                        .arg(yes_arg()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Cash in / cash out entries")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(account_arg())
                        .arg(arg!(--"type" <TYPE> "in|out").required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today"))
                        .arg(arg!(--source <SOURCE> "Who paid in (cash in)"))
                        .arg(arg!(--"paid-to" <PAID_TO> "Who was paid (cash out)"))
                        .arg(arg!(--description <TEXT>)),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<id> "Transaction id"))
                        .arg(account_arg())
                        .arg(arg!(--"type" <TYPE> "in|out"))
                        .arg(arg!(--amount <AMOUNT>))
                        .arg(arg!(--date <DATE>))
                        .arg(arg!(--source <SOURCE>))
                        .arg(arg!(--"paid-to" <PAID_TO>))
                        .arg(arg!(--description <TEXT>)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(arg!(<ids> ... "Transaction ids"))
                        .arg(account_arg())
                        .arg(yes_arg()),
                )
                .subcommand(
                    Command::new("list")
                        .arg(account_arg())
                        .args(filter_args())
                        .arg(arg!(--sort <KEY> "date|amount|entry").default_value("date"))
                        .arg(arg!(--desc "Newest / largest first"))
                        .arg(arg!(--page <N>).value_parser(value_parser!(usize)))
                        .arg(arg!(--"per-page" <N>).value_parser(value_parser!(usize)))
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Totals for one account, or every account by currency")
                .arg(arg!(--account <ACCOUNT> "Account name or id"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("statement")
                .about("Print or export an account statement")
                .arg(account_arg())
                .args(filter_args())
                .arg(arg!(--format <FMT> "table|csv|json|html").default_value("table"))
                .arg(arg!(--out <PATH> "Write to a file instead of stdout")),
        )
        .subcommand(
            Command::new("receipt")
                .about("Receipt attachments")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(arg!(<file> "Path to the receipt file"))
                        .arg(arg!(--tx <ID> "Link to a transaction")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(arg!(--tx <ID> "Only receipts linked to this transaction"))
                        .args(json_args()),
                )
                .subcommand(Command::new("show").arg(arg!(<id>)))
                .subcommand(Command::new("rm").arg(arg!(<id>)).arg(yes_arg())),
        )
        .subcommand(
            Command::new("auth")
                .about("Sign in to the backend")
                .subcommand_required(true)
                .subcommand(
                    Command::new("login")
                        .arg(arg!(--email <EMAIL>).required(true))
                        .arg(
                            arg!(--password <PASSWORD>)
                                .env("CASHBOOK_PASSWORD")
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("register")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--email <EMAIL>).required(true))
                        .arg(
                            arg!(--password <PASSWORD>)
                                .env("CASHBOOK_PASSWORD")
                                .required(true),
                        ),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand_required(true)
                .subcommand(Command::new("show").args(json_args()))
                .subcommand(
                    Command::new("set")
                        .arg(arg!(<key>))
                        .arg(arg!(<value>)),
                ),
        )
}
