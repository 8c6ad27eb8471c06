use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tally_core::NormalizedTransaction;
use tally_finance::{
    ManualEntry, SortDirection, SortKey, Statement, Summary, combine, import_statement, latest,
    paginate, sort_transactions, summarize, summarize_month,
};
use tally_ingest::{normalize_batch, read_table};
use tracing::{debug, info};

mod config;
mod logging;
mod state;

use config::{BudgetSection, init_config, load_config};
use state::{Store, manual_id, statement_id};

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Bank statement normalizer and ledger")]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every row of a statement as normalized JSON (nothing is stored)
    Normalize {
        #[arg(long)]
        csv: PathBuf,

        /// Id prefix for the rows (default: a fresh statement id)
        #[arg(long)]
        batch_id: Option<String>,
    },

    /// Store a statement and import its usable rows
    Import {
        #[arg(long)]
        csv: PathBuf,

        /// Rows to consider (default: import.max_rows from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Record a transaction by hand
    Add {
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        amount: String,

        /// Income or Expense (default: Expense)
        #[arg(long = "type")]
        txn_type: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a manually added transaction
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Show manual and imported transactions, newest first
    List {
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Zero-based page
        #[arg(long, default_value_t = 0)]
        page: usize,

        #[arg(long)]
        per_page: Option<usize>,

        /// Show every row of the latest statement instead of imported rows
        #[arg(long)]
        from_statement: bool,
    },

    /// Income, expense and per-category totals for one month
    Summary {
        /// YYYY-MM (default: the current month)
        #[arg(long)]
        month: Option<String>,

        /// Every transaction ever recorded; budgets are not applied
        #[arg(long, conflicts_with = "month")]
        all: bool,
    },

    /// List stored statements
    Statements,

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Amount,
    Type,
    Category,
}

impl From<SortArg> for SortKey {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Date => SortKey::Date,
            SortArg::Amount => SortKey::Amount,
            SortArg::Type => SortKey::Type,
            SortArg::Category => SortKey::Category,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match cli.command {
        Command::Normalize { csv, batch_id } => normalize(csv, batch_id)?,
        Command::Import { csv, limit } => import(csv, limit)?,
        Command::Add {
            date,
            amount,
            txn_type,
            category,
            description,
        } => {
            let entry = ManualEntry {
                date,
                txn_type,
                category,
                amount: Some(amount),
                description,
            };
            add(entry)?;
        }
        Command::Delete { id } => delete(&id)?,
        Command::List {
            sort,
            asc,
            page,
            per_page,
            from_statement,
        } => list(sort, asc, page, per_page, from_statement)?,
        Command::Summary { month, all } => summary(month, all)?,
        Command::Statements => statements()?,
        Command::Config { command } => match command {
            ConfigCommand::Init => init_config()?,
            ConfigCommand::Show => {
                let cfg = load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn ensure_exists(csv: &Path) -> Result<()> {
    if !csv.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv.display());
    }
    Ok(())
}

fn normalize(csv: PathBuf, batch_id: Option<String>) -> Result<()> {
    ensure_exists(&csv)?;
    let cfg = load_config()?;
    let table = read_table(&csv, cfg.import.delimiter_byte()?)
        .with_context(|| format!("parsing {}", csv.display()))?;

    let batch_id = batch_id.unwrap_or_else(|| statement_id(Utc::now()));
    let txns: Vec<NormalizedTransaction> = normalize_batch(&table.rows, &batch_id).collect();
    debug!(rows = txns.len(), batch = %batch_id, "normalized statement");

    println!("{}", serde_json::to_string_pretty(&txns)?);
    Ok(())
}

fn import(csv: PathBuf, limit: Option<usize>) -> Result<()> {
    ensure_exists(&csv)?;
    let cfg = load_config()?;
    let store = Store::open_default()?;

    let now = Utc::now();
    let statement = Statement::read(
        statement_id(now),
        &csv,
        cfg.import.delimiter_byte()?,
        cfg.import.limits(),
        now,
    )
    .with_context(|| format!("parsing {}", csv.display()))?;
    store.save_statement(&statement)?;

    let mut policy = cfg.import.policy();
    if let Some(limit) = limit {
        policy.max_rows = limit;
    }

    let outcome = import_statement(&statement, policy);
    let total = store.append_imported(&outcome.accepted)?;

    println!(
        "Statement {} ({}): {} rows, {} kept",
        statement.id,
        statement.file_name,
        statement.row_count,
        statement.rows.len()
    );
    println!(
        "Imported {} transactions, skipped {} ({} imported in total)",
        outcome.accepted.len(),
        outcome.skipped.len(),
        total
    );
    for s in &outcome.skipped {
        println!("  row {}: {:?}", s.row_index, s.reason);
    }
    if outcome.accepted.is_empty() && statement.row_count > 0 {
        println!("\nNo rows imported. Check the column names (date, amount/debit/credit).");
    }
    Ok(())
}

fn add(mut entry: ManualEntry) -> Result<()> {
    if entry.date.is_none() {
        entry = entry.with_date(Utc::now().date_naive());
    }
    entry.validate()?;

    let store = Store::open_default()?;
    let txn = entry.into_transaction(manual_id(Utc::now()));
    info!(id = %txn.id, "recorded manual transaction");
    println!(
        "Added {} | {} | {} | {} | {:.2}",
        txn.id, txn.date, txn.txn_type, txn.category, txn.amount
    );
    store.append_manual(txn)?;
    Ok(())
}

fn delete(id: &str) -> Result<()> {
    let store = Store::open_default()?;
    if !store.remove_manual(id)? {
        bail!("no manual transaction with id {id} (imported rows cannot be deleted)");
    }
    info!(id, "deleted manual transaction");
    println!("Deleted {id}");
    Ok(())
}

fn ledger(store: &Store, from_statement: bool) -> Result<Vec<NormalizedTransaction>> {
    let manual = store.manual()?;
    let statement_rows = if from_statement {
        let statements = store.load_statements()?;
        match latest(&statements) {
            Some(s) => s.transactions().collect(),
            None => Vec::new(),
        }
    } else {
        store.imported()?
    };
    Ok(combine(manual, statement_rows))
}

fn list(
    sort: Option<SortArg>,
    asc: bool,
    page: usize,
    per_page: Option<usize>,
    from_statement: bool,
) -> Result<()> {
    let cfg = load_config()?;
    let store = Store::open_default()?;
    let mut txns = ledger(&store, from_statement)?;

    let dir = if asc { SortDirection::Asc } else { SortDirection::Desc };
    if sort.is_some() || asc {
        let key = sort.map(SortKey::from).unwrap_or_default();
        sort_transactions(&mut txns, key, dir);
    }

    let p = paginate(&txns, page, per_page.unwrap_or(cfg.ledger.page_size));
    for t in p.items {
        println!(
            "{:<12} {:<8} {:<14} {:>12.2}  {}  [{}]",
            if t.date.is_empty() { "-" } else { t.date.as_str() },
            t.txn_type,
            t.category,
            t.amount,
            t.description,
            t.id
        );
    }
    println!("\nPage {}/{} ({} transactions)", p.page + 1, p.pages, p.total);
    Ok(())
}

fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("--month must be YYYY-MM, got {s:?}"))?;
    Ok((d.year(), d.month()))
}

/// Budgets are monthly, so they only apply when `month` is set.
fn build_summary(
    txns: &[NormalizedTransaction],
    month: Option<(i32, u32)>,
    budget: &BudgetSection,
) -> Summary {
    let Some((year, month)) = month else {
        return summarize(txns);
    };
    let s = summarize_month(txns, year, month).with_category_limits(&budget.categories);
    match budget.monthly {
        Some(limit) => s.with_budget(limit),
        None => s,
    }
}

fn summary(month: Option<String>, all: bool) -> Result<()> {
    let cfg = load_config()?;
    let store = Store::open_default()?;
    let txns = ledger(&store, false)?;

    let scope = match month.as_deref() {
        _ if all => None,
        Some(m) => Some(parse_month(m)?),
        None => {
            let today = Utc::now().date_naive();
            Some((today.year(), today.month()))
        }
    };
    let s = build_summary(&txns, scope, &cfg.budget);

    match scope {
        Some((year, month)) => println!("Month:        {year}-{month:02}"),
        None => println!("Month:        all"),
    }
    println!("Transactions: {}", s.count);
    println!("Income:       {:.2}", s.income);
    println!("Expenses:     {:.2}", s.expenses);
    println!("Net:          {:.2}", s.net);
    if let Some(rate) = s.savings_rate() {
        println!("Savings rate: {rate}%");
    }
    if let Some(remaining) = s.budget_remaining {
        println!("Budget left:  {remaining:.2}");
    }
    if !s.by_category.is_empty() {
        println!("\nExpenses by category:");
        for (cat, total) in &s.by_category {
            println!("  {cat:<16} {total:>12.2}");
        }
    }
    if !s.category_budgets.is_empty() {
        println!("\nCategory budgets:");
        for b in &s.category_budgets {
            println!(
                "  {:<16} {:>12.2} of {:>12.2}  left {:>12.2}",
                b.category, b.spent, b.limit, b.remaining
            );
        }
        for b in s.exceeded_categories() {
            println!("You have exceeded your budget for {} by {:.2}", b.category, -b.remaining);
        }
    }
    if let Some((cat, total)) = s.top_category() {
        println!("\nLargest category: {cat} ({total:.2})");
    }
    Ok(())
}

fn statements() -> Result<()> {
    let store = Store::open_default()?;
    let all = store.load_statements()?;
    if all.is_empty() {
        println!("No statements stored. Run: tally import --csv <file>");
        return Ok(());
    }
    for s in &all {
        println!(
            "{}  {}  {}  rows={} kept={} columns={}",
            s.id,
            s.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
            s.file_name,
            s.row_count,
            s.rows.len(),
            s.headers.join("|")
        );
    }
    Ok(())
}
