//! CLI binary for browsing a ledger snapshot file.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use pocket_ledger::aggregate::{AggregateResult, aggregate};
use pocket_ledger::draft::TransactionDraft;
use pocket_ledger::filter::{FilterSpec, filter};
use pocket_ledger::models::{
    DateTime, EXPENSE_CATEGORIES, NaiveDate, TransactionId, TransactionKind, TransactionRecord, Utc,
};
use pocket_ledger::period::{self, Period};
use pocket_ledger::snapshot::{Snapshot, SnapshotFile};

/// Environment variable naming the snapshot file.
const FILE_ENV: &str = "POCKET_LEDGER_FILE";

/// Personal ledger CLI: filter, total and chart income and expenses.
#[derive(Debug, Parser)]
#[command(name = "pocket-ledger", version, about)]
struct Cli {
    /// Snapshot file (default: $POCKET_LEDGER_FILE, then the XDG data dir).
    #[arg(long, global = true, value_name = "FILE")]
    file: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// List transactions matching the filter.
    List(FilterArgs),
    /// Show totals, monthly buckets and the category breakdown.
    Summary(FilterArgs),
    /// List the expense categories.
    Categories,
    /// Record a new transaction.
    Add(AddArgs),
    /// Delete a transaction by ID.
    Delete {
        /// Transaction ID.
        id: String,
    },
}

/// Filter arguments shared by `list` and `summary`.
#[derive(Debug, Args)]
struct FilterArgs {
    /// Named period: daily, weekly, monthly or yearly (unknown values mean
    /// daily).
    #[arg(long)]
    period: Option<String>,
    /// First day to include (YYYY-MM-DD). Switches to a custom range.
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD). Switches to a custom range.
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    /// `income`, `expense`, or an expense category.
    #[arg(long)]
    category: Option<String>,
    /// Case-insensitive description search.
    #[arg(long)]
    search: Option<String>,
    /// Reference day for named periods (default: today, UTC).
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Ignore dates and show every transaction.
    #[arg(long, conflicts_with_all = ["period", "from", "to"])]
    all: bool,
}

/// Arguments for the `add` subcommand.
#[derive(Debug, Args)]
struct AddArgs {
    /// Amount, e.g. 12.50.
    #[arg(long)]
    amount: String,
    /// `income` or `expense`.
    #[arg(long, default_value = "expense", value_parser = parse_kind)]
    kind: TransactionKind,
    /// Expense category.
    #[arg(long)]
    category: Option<String>,
    /// What the transaction was for.
    #[arg(long)]
    description: String,
    /// Day of the transaction (default: now).
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a transaction kind label for clap.
fn parse_kind(s: &str) -> Result<TransactionKind, String> {
    TransactionKind::from_label(s).ok_or_else(|| format!("expected income or expense, got {s:?}"))
}

/// Resolves the snapshot file from the flag, the environment, or the
/// default data directory.
fn snapshot_file(flag: Option<PathBuf>) -> pocket_ledger::error::Result<SnapshotFile> {
    if let Some(path) = flag {
        return Ok(SnapshotFile::new(path));
    }
    match std::env::var(FILE_ENV) {
        Ok(val) if !val.is_empty() => Ok(SnapshotFile::new(PathBuf::from(val))),
        _ => SnapshotFile::default_path().map(SnapshotFile::new),
    }
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let file = match snapshot_file(cli.file) {
        Ok(file) => file,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to locate snapshot: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let spinner = make_spinner("Loading transactions...");
    let loaded = file.load();
    spinner.finish_and_clear();
    let snapshot = match loaded {
        Ok(snapshot) => snapshot,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to read {}: {err}",
                "error:".red().bold(),
                file.path().display()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    dispatch(&file, snapshot, cli.command, Utc::now())
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch(
    file: &SnapshotFile,
    snapshot: Snapshot,
    command: Command,
    now: DateTime<Utc>,
) -> io::Result<ExitCode> {
    match command {
        Command::List(args) => cmd_list(&snapshot, &build_filter(&args, now)),
        Command::Summary(args) => cmd_summary(&snapshot, &build_filter(&args, now)),
        Command::Categories => cmd_categories(),
        Command::Add(args) => cmd_add(file, snapshot, &args, now),
        Command::Delete { id } => cmd_delete(file, snapshot, &TransactionId::new(id)),
    }
}

/// Builds a [`FilterSpec`] from CLI arguments.
///
/// Without `--all`, the view starts from the named period (daily by
/// default) around `--today`; explicit `--from`/`--to` then override the
/// resolved bounds.
fn build_filter(args: &FilterArgs, now: DateTime<Utc>) -> FilterSpec {
    let reference = args.today.map_or(now, period::start_of_day);
    let mut spec = if args.all {
        FilterSpec::new()
    } else {
        let named = args
            .period
            .as_deref()
            .map_or(Period::Daily, Period::from_token);
        FilterSpec::for_period(named, reference)
    };
    if let Some(from) = args.from {
        spec = spec.start_date(from);
    }
    if let Some(to) = args.to {
        spec = spec.end_date(to);
    }
    if let Some(category) = args.category.as_deref() {
        spec = spec.category(category);
    }
    if let Some(search) = args.search.as_deref() {
        spec = spec.search(search);
    }
    spec
}

/// Executes the `list` subcommand.
fn cmd_list(snapshot: &Snapshot, spec: &FilterSpec) -> io::Result<ExitCode> {
    let matched = filter(snapshot.records(), spec);
    print_records_table(&matched)?;
    if let Some(summary) = spec.summary(matched.len()) {
        writeln!(io::stdout().lock(), "{}", summary.dimmed())?;
    }
    if matched.is_empty() && !snapshot.is_empty() {
        writeln!(
            io::stdout().lock(),
            "  {} try adjusting your filters or search query",
            "hint:".cyan()
        )?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `summary` subcommand.
fn cmd_summary(snapshot: &Snapshot, spec: &FilterSpec) -> io::Result<ExitCode> {
    let matched = filter(snapshot.records(), spec);
    let result = aggregate(matched.iter().copied());
    print_totals(&result)?;
    print_buckets_table(&result)?;
    print_breakdown_table(&result)?;
    if let Some(summary) = spec.summary(matched.len()) {
        writeln!(io::stdout().lock(), "{}", summary.dimmed())?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `categories` subcommand.
fn cmd_categories() -> io::Result<ExitCode> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Transaction Types".green().bold())?;
    writeln!(out, "  {}", TransactionKind::Income)?;
    writeln!(out, "  {}", TransactionKind::Expense)?;
    writeln!(out)?;
    writeln!(out, "{}", "Expense Categories".green().bold())?;
    for category in EXPENSE_CATEGORIES {
        writeln!(out, "  {category}")?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `add` subcommand: validates the entry and saves the next
/// snapshot.
fn cmd_add(
    file: &SnapshotFile,
    snapshot: Snapshot,
    args: &AddArgs,
    now: DateTime<Utc>,
) -> io::Result<ExitCode> {
    let draft = TransactionDraft {
        amount: args.amount.clone(),
        kind: args.kind,
        category: args.category.clone(),
        description: args.description.clone(),
    };
    let occurred_at = args.date.map_or(now, period::start_of_day);
    let id = TransactionId::new(format!("tx-{}", now.timestamp_millis()));
    let record = match draft.validate(id, occurred_at) {
        Ok(record) => record,
        Err(err) => {
            writeln!(io::stderr().lock(), "{} {err}", "error:".red().bold())?;
            return Ok(ExitCode::FAILURE);
        }
    };
    let id = record.id.clone();
    if let Err(err) = file.save(&snapshot.with_record(record)) {
        writeln!(
            io::stderr().lock(),
            "{} failed to save transaction: {err}",
            "error:".red().bold()
        )?;
        return Ok(ExitCode::FAILURE);
    }
    writeln!(io::stdout().lock(), "{} {id}", "Added".green().bold())?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `delete` subcommand.
fn cmd_delete(file: &SnapshotFile, snapshot: Snapshot, id: &TransactionId) -> io::Result<ExitCode> {
    let (next, removed) = snapshot.without_record(id);
    if !removed {
        writeln!(
            io::stderr().lock(),
            "{} transaction not found: {id}",
            "error:".red().bold()
        )?;
        return Ok(ExitCode::FAILURE);
    }
    if let Err(err) = file.save(&next) {
        writeln!(
            io::stderr().lock(),
            "{} failed to delete transaction: {err}",
            "error:".red().bold()
        )?;
        return Ok(ExitCode::FAILURE);
    }
    writeln!(io::stdout().lock(), "{} {id}", "Deleted".green().bold())?;
    Ok(ExitCode::SUCCESS)
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints transactions in a table.
fn print_records_table(records: &[&TransactionRecord]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if records.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Expense").fg(Color::Cyan),
        Cell::new("Income").fg(Color::Cyan),
        Cell::new("ID").fg(Color::Cyan),
    ]);

    for record in records {
        let date = record.occurred_at.map_or_else(
            || "\u{2014}".to_owned(),
            |at| at.format("%Y-%m-%d %H:%M").to_string(),
        );
        let category = record.expense_category().unwrap_or("\u{2014}");
        let amount = format!("{:.2}", record.effective_amount());
        let (expense_cell, income_cell) = match record.kind {
            TransactionKind::Expense => (
                Cell::new(amount).fg(Color::Red),
                Cell::new("\u{2014}").fg(Color::DarkGrey),
            ),
            TransactionKind::Income => (
                Cell::new("\u{2014}").fg(Color::DarkGrey),
                Cell::new(amount).fg(Color::Green),
            ),
        };

        _ = table.add_row(vec![
            Cell::new(date),
            Cell::new(&record.description),
            Cell::new(category),
            expense_cell,
            income_cell,
            Cell::new(&record.id).fg(Color::DarkGrey),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Transactions".green().bold(),
        format_args!("({})", records.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints income, expense and net totals.
fn print_totals(result: &AggregateResult) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Totals".green().bold())?;
    writeln!(out)?;
    writeln!(out, "  {} {:.2}", "Income: ".bold(), result.total_income.green())?;
    writeln!(out, "  {} {:.2}", "Expense:".bold(), result.total_expense.red())?;
    if result.net < 0.0_f64 {
        writeln!(out, "  {} {:.2}", "Net:    ".bold(), result.net.red())?;
    } else {
        writeln!(out, "  {} {:.2}", "Net:    ".bold(), result.net.green())?;
    }
    writeln!(out)?;
    Ok(())
}

/// Prints per-month buckets in a table.
fn print_buckets_table(result: &AggregateResult) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if result.buckets.is_empty() {
        writeln!(out, "{}", "No dated transactions to chart.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Month").fg(Color::Cyan),
        Cell::new("Income").fg(Color::Cyan),
        Cell::new("Expense").fg(Color::Cyan),
        Cell::new("Net").fg(Color::Cyan),
    ]);

    for bucket in &result.buckets {
        let net = bucket.net();
        let net_color = if net < 0.0_f64 { Color::Red } else { Color::Green };
        _ = table.add_row(vec![
            Cell::new(&bucket.label),
            Cell::new(format!("{:.2}", bucket.income)),
            Cell::new(format!("{:.2}", bucket.expense)),
            Cell::new(format!("{net:.2}")).fg(net_color),
        ]);
    }

    writeln!(out, "{}", "By Month".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the expense breakdown by category.
fn print_breakdown_table(result: &AggregateResult) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if result.category_breakdown.is_empty() {
        writeln!(out, "{}", "No categorised expenses.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Spent").fg(Color::Cyan),
    ]);

    for entry in &result.category_breakdown {
        _ = table.add_row(vec![
            Cell::new(&entry.category),
            Cell::new(format!("{:.2}", entry.amount)).fg(Color::Red),
        ]);
    }

    writeln!(out, "{}", "By Category".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output; if stderr itself failed, nothing
            // we can do.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
