// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, crate_version, Arg, ArgAction, Command};

fn month_arg() -> Arg {
    arg!(--month <MONTH> "Month as YYYY-MM (defaults to the selected month)")
}

fn id_arg() -> Arg {
    arg!(--id <ID> "Entity id").required(true)
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print JSON").action(ArgAction::SetTrue))
        .arg(arg!(--jsonl "Print JSON lines").action(ArgAction::SetTrue))
}

/// add/list/edit/rm/paid for incomes, fixed expenses and purchases.
fn entry_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(arg!(--name <NAME> "Label").required(true))
                .arg(arg!(--amount <AMOUNT> "Whole currency units").required(true))
                .arg(arg!(--category <CATEGORY> "Category"))
                .arg(arg!(--date <DATE> "YYYY-MM-DD (defaults to the 1st)"))
                .arg(month_arg()),
        )
        .subcommand(json_flags(Command::new("list").arg(month_arg())))
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(arg!(--name <NAME> "Label"))
                .arg(arg!(--amount <AMOUNT> "Whole currency units"))
                .arg(arg!(--category <CATEGORY> "Category"))
                .arg(arg!(--date <DATE> "YYYY-MM-DD"))
                .arg(month_arg()),
        )
        .subcommand(Command::new("rm").arg(id_arg()).arg(month_arg()))
        .subcommand(
            Command::new("paid")
                .about("Toggle the paid flag")
                .arg(id_arg())
                .arg(month_arg()),
        )
}

/// Cards and loans share everything but the guarantee fee.
fn debt_command(name: &'static str, about: &'static str, with_fee: bool) -> Command {
    let fee_args = |cmd: Command| {
        if with_fee {
            cmd.arg(arg!(--fee <PCT> "Guarantee fee over principal, comma decimals"))
                .arg(arg!(--"fee-tax" <PCT> "Tax on the guarantee fee, comma decimals"))
        } else {
            cmd
        }
    };
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(fee_args(
            Command::new("add")
                .arg(arg!(--name <NAME> "Label").required(true))
                .arg(arg!(--principal <AMOUNT> "Amount financed").required(true))
                .arg(arg!(--terms <N> "Number of installments").required(true))
                .arg(arg!(--paid <N> "Installments already paid"))
                .arg(arg!(--rate <PCT> "Monthly rate, comma decimals (e.g. 1,84)").required(true))
                .arg(arg!(--category <CATEGORY> "Category"))
                .arg(month_arg()),
        ))
        .subcommand(json_flags(Command::new("list").arg(month_arg())))
        .subcommand(fee_args(
            Command::new("edit")
                .arg(id_arg())
                .arg(arg!(--name <NAME> "Label"))
                .arg(arg!(--principal <AMOUNT> "Amount financed"))
                .arg(arg!(--terms <N> "Number of installments"))
                .arg(arg!(--paid <N> "Installments already paid"))
                .arg(arg!(--rate <PCT> "Monthly rate, comma decimals"))
                .arg(arg!(--category <CATEGORY> "Category"))
                .arg(month_arg()),
        ))
        .subcommand(Command::new("rm").arg(id_arg()).arg(month_arg()))
        .subcommand(
            Command::new("paid")
                .about("Toggle this month's payment")
                .arg(id_arg())
                .arg(month_arg()),
        )
        .subcommand(json_flags(
            Command::new("schedule")
                .about("Amortization table")
                .arg(id_arg())
                .arg(month_arg()),
        ))
}

pub fn build_cli() -> Command {
    Command::new("paydown")
        .version(crate_version!())
        .about("Monthly budget ledger with installment debt tracking")
        .arg(arg!(--data <PATH> "Ledger file (defaults to the platform data dir)").global(true))
        .subcommand(
            Command::new("init")
                .about("Create the ledger file")
                .arg(arg!(--sample "Seed a demo month").action(ArgAction::SetTrue))
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("month")
                .about("Months and month closing")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("show").arg(month_arg())))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("select").arg(arg!(<month> "YYYY-MM")))
                .subcommand(
                    Command::new("close")
                        .about("Roll the month into the next one")
                        .arg(month_arg())
                        .arg(
                            arg!(--force "Overwrite a next month that already has data")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(entry_command("income", "Monthly incomes"))
        .subcommand(entry_command("fixed", "Recurring fixed expenses"))
        .subcommand(entry_command("purchase", "One-off purchases"))
        .subcommand(debt_command("card", "Credit card installments", false))
        .subcommand(debt_command("loan", "Consumer loans", true))
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME> "Label").required(true))
                        .arg(arg!(--target <AMOUNT> "Target balance").required(true))
                        .arg(arg!(--current <AMOUNT> "Balance so far"))
                        .arg(month_arg()),
                )
                .subcommand(json_flags(Command::new("list").arg(month_arg())))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(arg!(--name <NAME> "Label"))
                        .arg(arg!(--target <AMOUNT> "Target balance"))
                        .arg(arg!(--current <AMOUNT> "Balance so far"))
                        .arg(month_arg()),
                )
                .subcommand(Command::new("rm").arg(id_arg()).arg(month_arg()))
                .subcommand(
                    Command::new("deposit")
                        .arg(id_arg())
                        .arg(arg!(--amount <AMOUNT> "Amount to add").required(true))
                        .arg(month_arg()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Totals, history and advice")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("summary").arg(month_arg())))
                .subcommand(json_flags(Command::new("history")))
                .subcommand(json_flags(Command::new("advice").arg(month_arg()))),
        )
        .subcommand(
            Command::new("export")
                .about("Write the ledger or its history to a file")
                .arg(arg!(--format <FORMAT> "json|csv").default_value("json"))
                .arg(arg!(--out <PATH> "Output file").required(true))
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("config")
                .about("Settings stored with the ledger")
                .subcommand_required(true)
                .subcommand(Command::new("show"))
                .subcommand(Command::new("currency").arg(arg!(<code> "Display currency code"))),
        )
        .subcommand(Command::new("doctor").about("Check debts for inconsistencies"))
        .subcommand(
            Command::new("reset")
                .about("Delete every month")
                .arg(arg!(--yes "Confirm").action(ArgAction::SetTrue)),
        )
}
