// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .required(required)
        .help("Month as YYYY-MM (defaults to the current month)")
}

/// Fields shared by `tx add` and `tx edit`.
fn transaction_args(cmd: Command, for_add: bool) -> Command {
    cmd.arg(Arg::new("title").long("title").required(for_add))
        .arg(Arg::new("amount").long("amount").required(for_add))
        .arg(
            Arg::new("mode")
                .long("mode")
                .help("Credit Card | Debit Card | UPI | Cash"),
        )
        .arg(
            Arg::new("for")
                .long("for")
                .help("Counterparty name, or Self"),
        )
        .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
        .arg(
            Arg::new("type")
                .long("type")
                .help("expense | income | donation | lent"),
        )
        .arg(
            Arg::new("received")
                .long("received")
                .action(ArgAction::SetTrue)
                .help("Money already collected from the counterparty"),
        )
        .arg(
            Arg::new("split")
                .long("split")
                .help("Shares as NAME=AMOUNT,...; the last amount may be left blank"),
        )
}

pub fn build_cli() -> Command {
    Command::new("pocketbook")
        .version(crate_version!())
        .about("Track expenses, split bills, money to collect and monthly budgets")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path to the SQLite database (or set POCKETBOOK_DB)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Record and manage transactions")
                .subcommand(transaction_args(
                    Command::new("add").about("Record a transaction"),
                    true,
                ))
                .subcommand(
                    transaction_args(
                        Command::new("edit").about("Change a transaction"),
                        false,
                    )
                    .arg(Arg::new("id").long("id").required(true))
                    .arg(
                        Arg::new("pending")
                            .long("pending")
                            .action(ArgAction::SetTrue)
                            .conflicts_with("received"),
                    )
                    .arg(
                        Arg::new("no_split")
                            .long("no-split")
                            .action(ArgAction::SetTrue)
                            .conflicts_with("split"),
                    ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .about("List a month's transactions")
                        .arg(month_arg(false))
                        .arg(Arg::new("type").long("type").action(ArgAction::Append))
                        .arg(Arg::new("mode").long("mode").action(ArgAction::Append))
                        .arg(Arg::new("for").long("for").action(ArgAction::Append)),
                ))
                .subcommand(
                    Command::new("receive")
                        .about("Mark money as collected")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("person")
                                .long("person")
                                .help("Share holder on a split transaction"),
                        )
                        .arg(
                            Arg::new("undo")
                                .long("undo")
                                .action(ArgAction::SetTrue)
                                .help("Mark as pending again"),
                        ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budgets")
                .subcommand(
                    Command::new("set")
                        .arg(month_arg(false))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(json_args(Command::new("status").arg(month_arg(false))))
                .subcommand(Command::new("rm").arg(month_arg(true))),
        )
        .subcommand(
            Command::new("report")
                .about("Monthly summaries and trends")
                .subcommand(json_args(Command::new("summary").arg(month_arg(false))))
                .subcommand(json_args(Command::new("collect").arg(month_arg(false))))
                .subcommand(json_args(Command::new("trend")))
                .subcommand(Command::new("people")),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions").arg(
                    Arg::new("path")
                        .long("path")
                        .required(true)
                        .help("CSV: date,title,amount,mode,for,type,received"),
                ),
            ),
        )
        .subcommand(Command::new("doctor").about("List stored records that cannot be read"))
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
}
