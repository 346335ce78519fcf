//! Command line front end for the village debt ledger.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use debt_ledger_rs::{
    history_to_json_pretty, parse_payment_date, CsvTableStore, DebtManager, DebtorSummaryView,
    LedgerConfig, LedgerError, Money, Payment, PaymentEdit, ReceiptDocument, SafeTimeProvider,
    SessionContext, TimeSource, YearlySummary,
};
use tracing_subscriber::{fmt, EnvFilter};

/// `debt-ledger` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "debt-ledger",
    about = "Track village loans, yearly repayment targets, late fines and receipts",
    version
)]
struct Cli {
    /// Directory holding `customers.csv` and `pay.csv`; defaults to `data`.
    #[arg(long, value_name = "dir", global = true)]
    data: Option<PathBuf>,
    /// JSON configuration file; the village preset is used when omitted.
    #[arg(long, value_name = "path", global = true)]
    config: Option<PathBuf>,
    /// Evaluate as of this day instead of the system clock.
    #[arg(long, value_name = "date", value_parser = parse_date, global = true)]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the data directory and empty tables.
    Init,
    /// List every debtor with their remaining balance.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a debtor.
    Add {
        name: String,
        #[arg(value_parser = parse_amount)]
        total_loan: Money,
    },
    /// Change a debtor's total loan.
    SetLoan {
        name: String,
        #[arg(value_parser = parse_amount)]
        total_loan: Money,
    },
    /// Delete a debtor and every payment they made.
    Delete {
        name: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Record a payment and write its receipt.
    Pay {
        name: String,
        #[arg(value_parser = parse_amount)]
        amount: Money,
        /// Payment day; defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        note: String,
        /// Directory to write the receipt into.
        #[arg(long, value_name = "dir")]
        receipt_dir: Option<PathBuf>,
    },
    /// Show a debtor's yearly schedule and fines.
    Summary {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Show a debtor's payments, most recent first.
    History {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Replace the values of one recorded payment.
    EditPayment {
        #[command(flatten)]
        original: PaymentArgs,
        #[arg(long, value_parser = parse_date)]
        new_date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_amount)]
        new_amount: Option<Money>,
        #[arg(long)]
        new_note: Option<String>,
    },
    /// Write the receipt for one recorded payment.
    Receipt {
        #[command(flatten)]
        payment: PaymentArgs,
        #[arg(long, value_name = "dir", default_value = ".")]
        out: PathBuf,
    },
}

/// A recorded payment, identified by its values.
#[derive(Debug, Args)]
struct PaymentArgs {
    name: String,
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
    #[arg(long, value_parser = parse_amount)]
    amount: Money,
    #[arg(long, default_value = "")]
    note: String,
}

impl PaymentArgs {
    fn to_payment(&self) -> Payment {
        Payment::new(self.name.clone(), self.date, self.amount, self.note.clone())
    }
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => LedgerConfig::from_json_file(path)?,
        None => LedgerConfig::village_default("data"),
    };
    if let Some(dir) = &cli.data {
        config.store.directory = dir.clone();
    }

    let time = match cli.today {
        Some(day) => {
            let noon = day
                .and_hms_opt(12, 0, 0)
                .context("invalid --today")?;
            SafeTimeProvider::new(TimeSource::Test(Utc.from_utc_datetime(&noon)))
        }
        None => SafeTimeProvider::new(TimeSource::System),
    };

    if let Command::Init = cli.command {
        let tables = &config.tables;
        CsvTableStore::create(
            &config.store.directory,
            &[
                (tables.debtors_table.as_str(), tables.debtor_columns.ordered()),
                (tables.payments_table.as_str(), tables.payment_columns.ordered()),
            ],
        )?;
        println!("tables ready in {}", config.store.directory.display());
        return Ok(());
    }

    let store = CsvTableStore::open(&config.store.directory)?;
    let mut manager = DebtManager::new(store, config)?;
    let mut session = SessionContext::new();

    let outcome = run(cli.command, &mut manager, &mut session, &time);
    if let Err(LedgerError::RecordNotFound { .. }) = &outcome {
        eprintln!("the payment was not found; it may have been changed by someone else, check `history` and retry");
    }
    Ok(outcome?)
}

fn run(
    command: Command,
    manager: &mut DebtManager<CsvTableStore>,
    session: &mut SessionContext,
    time: &SafeTimeProvider,
) -> debt_ledger_rs::Result<()> {
    match command {
        Command::Init => {}
        Command::List { json } => {
            let summaries = manager.summaries(time)?;
            if json {
                let views: Vec<DebtorSummaryView> = summaries
                    .iter()
                    .map(|(debtor, summary)| DebtorSummaryView::new(debtor, summary))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                for (debtor, summary) in &summaries {
                    println!(
                        "{:>3}  {}  loan {}  remaining {}",
                        debtor.sequence_number,
                        debtor.name,
                        debtor.total_loan.format_grouped(2),
                        summary.remaining_with_fines.format_grouped(2),
                    );
                }
            }
        }
        Command::Add { name, total_loan } => {
            let debtor = manager.add_debtor(&name, total_loan, time)?;
            println!("added {} as #{}", debtor.name, debtor.sequence_number);
        }
        Command::SetLoan { name, total_loan } => {
            let old = manager.update_loan(&name, total_loan, time)?;
            println!(
                "{}: {} -> {}",
                name,
                old.format_grouped(2),
                total_loan.format_grouped(2)
            );
        }
        Command::Delete { name, yes } => {
            if !yes {
                println!("deleting {} also deletes all of their payments; rerun with --yes", name);
                return Ok(());
            }
            let report = manager.delete_debtor(session, &name, time)?;
            println!(
                "deleted {} and {} payment rows",
                report.debtor.name, report.payments_removed
            );
        }
        Command::Pay {
            name,
            amount,
            date,
            note,
            receipt_dir,
        } => {
            let paid_on = date.unwrap_or_else(|| time.now().date_naive());
            manager.record_payment(session, Payment::new(name, paid_on, amount, note), time)?;
            println!("payment recorded");
            if let Some(dir) = receipt_dir {
                let receipt = manager.receipt_for_latest(session, time)?;
                write_receipt(&dir, &receipt)?;
            }
        }
        Command::Summary { name, json } => {
            let summary = manager.summary(&name, time)?;
            if json {
                let ledger = manager.ledger(time)?;
                let debtor = ledger.require_debtor(&name)?;
                println!("{}", DebtorSummaryView::new(debtor, &summary).to_json_pretty()?);
            } else {
                print_summary(&summary);
            }
        }
        Command::History { name, json } => {
            let history = manager.payment_history(&name, time)?;
            if json {
                println!("{}", history_to_json_pretty(&history)?);
            } else if history.is_empty() {
                println!("no payments");
            } else {
                for payment in &history {
                    println!(
                        "{}  {:>14}  {}",
                        payment.date_cell(),
                        payment.amount.format_grouped(2),
                        payment.note
                    );
                }
            }
        }
        Command::EditPayment {
            original,
            new_date,
            new_amount,
            new_note,
        } => {
            let original = original.to_payment();
            let edit = PaymentEdit {
                paid_on: new_date.unwrap_or(original.paid_on),
                amount: new_amount.unwrap_or(original.amount),
                note: new_note.unwrap_or_else(|| original.note.clone()),
            };
            manager.begin_edit(session, &original)?;
            let updated = manager.submit_edit(session, &edit, time)?;
            println!(
                "updated: {} {} {}",
                updated.date_cell(),
                updated.amount.format_grouped(2),
                updated.note
            );
        }
        Command::Receipt { payment, out } => {
            let receipt = manager.receipt_for_payment(&payment.to_payment(), time)?;
            write_receipt(&out, &receipt)?;
        }
    }
    Ok(())
}

fn print_summary(summary: &YearlySummary) {
    println!("{}", summary.debtor_name);
    for period in &summary.periods {
        println!(
            "  {}  target {:>12}  paid {:>12}  short {:>12}  {} {}",
            period.label,
            period.target.format_grouped(0),
            period.paid.format_grouped(0),
            period.shortfall.format_grouped(0),
            period.fine_status.symbol(),
            period.fine_status,
        );
    }
    println!("  total paid            {}", summary.total_paid.format_grouped(2));
    println!("  total fines           {}", summary.total_fines.format_grouped(2));
    println!(
        "  remaining with fines  {}",
        summary.remaining_with_fines.format_grouped(2)
    );
}

fn write_receipt(dir: &Path, receipt: &ReceiptDocument) -> debt_ledger_rs::Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&receipt.file_name);
    fs::write(&path, &receipt.body)?;
    println!("receipt written to {}", path.display());
    Ok(())
}

fn parse_amount(raw: &str) -> Result<Money, String> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
    let amount = Money::from_str_exact(cleaned.trim())
        .map_err(|error| format!("invalid amount '{raw}': {error}"))?;
    if amount.is_negative() {
        return Err(format!("amount must not be negative: {raw}"));
    }
    Ok(amount)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_payment_date(raw).ok_or_else(|| format!("unrecognised date '{raw}'"))
}
