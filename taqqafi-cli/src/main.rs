use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taqqafi_core::{Category, CurrencyCode, StaticRates};
use taqqafi_finance::{export_csv, process_batch, InboxOutcome, ManualEntry};
use taqqafi_ingest::{InboundSms, SmsParser};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "taqqafi", version, about = "Bank SMS transaction tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config to ~/.taqqafi/config.toml
    Init,

    /// Report whether a message looks like a bank notification
    Check {
        text: String,
    },

    /// Parse one message and print the outcome as JSON
    Parse {
        #[arg(long, default_value = "")]
        sender: String,
        text: String,
    },

    /// Run messages through the parser into the review inbox
    Ingest {
        /// JSON Lines file, one {"sender": .., "body": ..} per line
        #[arg(long, conflicts_with_all = ["sender", "body"])]
        file: Option<PathBuf>,

        #[arg(long, requires = "body")]
        sender: Option<String>,

        #[arg(long)]
        body: Option<String>,
    },

    /// List transactions awaiting review
    Pending,

    /// Approve a pending transaction
    Approve {
        id: String,
    },

    /// Discard a pending transaction
    Dismiss {
        id: String,
    },

    /// Spend by category for a month, in the configured primary currency
    Report {
        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Write approved transactions to a CSV file
    Export {
        #[arg(long)]
        out: PathBuf,
    },

    /// Record a cash or otherwise unnotified expense as approved
    Add {
        #[arg(long)]
        amount: f64,

        #[arg(long)]
        merchant: String,

        #[arg(long)]
        category: Category,

        /// Defaults to the configured primary currency
        #[arg(long)]
        currency: Option<CurrencyCode>,

        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Change an approved transaction
    Edit {
        id: String,

        #[arg(long)]
        amount: Option<f64>,

        #[arg(long)]
        merchant: Option<String>,

        #[arg(long)]
        category: Option<Category>,
    },

    /// Remove an approved transaction
    Delete {
        id: String,
    },

    /// Monthly spending limits per category
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// List supported currencies
    Currencies,
}

#[derive(Subcommand, Debug)]
enum BudgetAction {
    /// Set a limit, in the primary currency, for one category and month
    Add {
        #[arg(long)]
        category: Category,

        #[arg(long)]
        limit: f64,

        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Show each budget of a month against approved spending
    List {
        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Remove a budget
    Rm {
        id: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Init => {
            config::init_config()?;
        }

        Command::Check { text } => {
            let parser = SmsParser::default();
            if parser.is_financial(&text) {
                println!("financial");
            } else {
                println!("not financial");
            }
        }

        Command::Parse { sender, text } => {
            let cfg = config::load_config()?;
            let outcome = SmsParser::new(cfg.parser).parse(&text, &sender);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::Ingest { file, sender, body } => {
            let messages = match (file, body) {
                (Some(path), _) => read_jsonl(&path)?,
                (None, Some(body)) => vec![InboundSms::new(sender.unwrap_or_default(), body)],
                (None, None) => bail!("pass --file <JSONL> or --body <TEXT>"),
            };
            ingest(messages).await?;
        }

        Command::Pending => {
            let cfg = config::load_config()?;
            let inbox = state::load_inbox(cfg.inbox)?;
            if inbox.pending().is_empty() {
                println!("No pending transactions.");
            }
            for p in inbox.pending() {
                println!(
                    "{} | {} | {} {:.2} | {} | {} | {}",
                    p.id,
                    p.received_at.format("%Y-%m-%d"),
                    p.currency,
                    p.amount,
                    p.merchant,
                    p.category,
                    p.direction
                );
            }
        }

        Command::Approve { id } => {
            let cfg = config::load_config()?;
            let mut inbox = state::load_inbox(cfg.inbox)?;
            let tx = inbox.approve(&id, Utc::now())?;
            state::save_inbox(&inbox)?;
            println!("Approved {} {:.2} at {} ({})", tx.currency, tx.amount, tx.merchant, tx.category);
        }

        Command::Dismiss { id } => {
            let cfg = config::load_config()?;
            let mut inbox = state::load_inbox(cfg.inbox)?;
            let dropped = inbox.dismiss(&id)?;
            state::save_inbox(&inbox)?;
            println!("Dismissed {} {:.2} at {}", dropped.currency, dropped.amount, dropped.merchant);
        }

        Command::Report { month, year } => {
            let cfg = config::load_config()?;
            let inbox = state::load_inbox(cfg.inbox)?;
            let (month, year) = month_or_current(month, year)?;

            let target = cfg.report.primary_currency;
            let spend = inbox.spend_by_category(month, year, target, &StaticRates);
            println!("# Spend for {month:02}/{year} ({target}, {})\n", target.name());
            if spend.is_empty() {
                println!("No approved debits.");
            }
            for (category, total) in &spend {
                println!("{:<14} {:>12.2}", category.as_str(), total);
            }
            if !spend.is_empty() {
                println!("{:<14} {:>12.2}", "Total", spend.values().sum::<f64>());
            }
        }

        Command::Export { out } => {
            let cfg = config::load_config()?;
            let inbox = state::load_inbox(cfg.inbox)?;
            export_csv(&out, inbox.approved())?;
            println!("Wrote {} transactions to {}", inbox.approved().len(), out.display());
        }

        Command::Add {
            amount,
            merchant,
            category,
            currency,
            date,
        } => {
            let cfg = config::load_config()?;
            let mut inbox = state::load_inbox(cfg.inbox)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Utc::now(),
            };
            let tx = inbox.add_manual(ManualEntry {
                amount,
                currency: currency.unwrap_or(cfg.report.primary_currency),
                merchant,
                category,
                date,
            })?;
            state::save_inbox(&inbox)?;
            println!("Added {} {} {:.2} at {} ({})", tx.id, tx.currency, tx.amount, tx.merchant, tx.category);
        }

        Command::Edit {
            id,
            amount,
            merchant,
            category,
        } => {
            let cfg = config::load_config()?;
            let mut inbox = state::load_inbox(cfg.inbox)?;
            let Some(mut tx) = inbox.approved().iter().find(|t| t.id == id).cloned() else {
                bail!("no approved transaction with id {id}");
            };
            if let Some(amount) = amount {
                tx.amount = amount;
            }
            if let Some(merchant) = merchant {
                tx.merchant = merchant;
            }
            if let Some(category) = category {
                tx.category = category;
            }
            inbox.update_approved(tx.clone())?;
            state::save_inbox(&inbox)?;
            println!("Updated {} {:.2} at {} ({})", tx.currency, tx.amount, tx.merchant, tx.category);
        }

        Command::Delete { id } => {
            let cfg = config::load_config()?;
            let mut inbox = state::load_inbox(cfg.inbox)?;
            let tx = inbox.delete_approved(&id)?;
            state::save_inbox(&inbox)?;
            println!("Deleted {} {:.2} at {}", tx.currency, tx.amount, tx.merchant);
        }

        Command::Budget { action } => budget(action)?,

        Command::Currencies => {
            for code in CurrencyCode::ALL {
                println!("{:<4} {:<6} {:<22} {}", code.as_str(), code.symbol(), code.name(), code.name_ar());
            }
        }
    }

    Ok(())
}

fn month_or_current(month: Option<u32>, year: Option<i32>) -> Result<(u32, i32)> {
    let now = Utc::now();
    let month = month.unwrap_or_else(|| now.month());
    let year = year.unwrap_or_else(|| now.year());
    if !(1..=12).contains(&month) {
        bail!("month must be 1-12, got {month}");
    }
    Ok((month, year))
}

/// Noon UTC on the given day, so the month survives any local offset.
fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM-DD, got {s}"))?;
    day.and_hms_opt(12, 0, 0)
        .map(|t| t.and_utc())
        .with_context(|| format!("invalid date {s}"))
}

fn budget(action: BudgetAction) -> Result<()> {
    let cfg = config::load_config()?;
    let mut book = state::load_budgets()?;
    let target = cfg.report.primary_currency;

    match action {
        BudgetAction::Add {
            category,
            limit,
            month,
            year,
        } => {
            let (month, year) = month_or_current(month, year)?;
            let b = book.add(category, limit, month, year)?;
            state::save_budgets(&book)?;
            println!("Budget {} set: {} {target} {:.2} for {month:02}/{year}", b.id, b.category, b.monthly_limit);
        }

        BudgetAction::List { month, year } => {
            let (month, year) = month_or_current(month, year)?;
            let inbox = state::load_inbox(cfg.inbox)?;
            let summaries = book.summaries(&inbox, month, year, target, &StaticRates);
            println!("# Budgets for {month:02}/{year} ({target})\n");
            if summaries.is_empty() {
                println!("No budgets.");
            }
            for s in &summaries {
                println!(
                    "{} | {:<14} {:>10.2} / {:>10.2} | left {:>10.2} | {:>3.0}%{}",
                    s.budget.id,
                    s.budget.category.as_str(),
                    s.spent,
                    s.budget.monthly_limit,
                    s.remaining,
                    s.percent * 100.0,
                    if s.is_over_budget { " OVER" } else { "" }
                );
            }
        }

        BudgetAction::Rm { id } => {
            let b = book.delete(&id)?;
            state::save_budgets(&book)?;
            println!("Removed {} budget for {:02}/{}", b.category, b.month, b.year);
        }
    }
    Ok(())
}

fn read_jsonl(path: &Path) -> Result<Vec<InboundSms>> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    s.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("{}:{}: expected {{\"sender\", \"body\"}}", path.display(), i + 1))
        })
        .collect()
}

async fn ingest(messages: Vec<InboundSms>) -> Result<()> {
    let cfg = config::load_config()?;
    let inbox = Arc::new(Mutex::new(state::load_inbox(cfg.inbox)?));
    let parser = SmsParser::new(cfg.parser);

    let total = messages.len();
    let outcomes = process_batch(inbox.clone(), parser, messages, Utc::now()).await?;

    let mut accepted = 0;
    let mut duplicates = 0;
    let mut skipped = 0;
    for outcome in &outcomes {
        match outcome {
            InboxOutcome::Accepted(id) => {
                accepted += 1;
                println!("pending {id}");
            }
            InboxOutcome::Duplicate => duplicates += 1,
            InboxOutcome::NotFinancial | InboxOutcome::Unparseable | InboxOutcome::IgnoredCredit => {
                skipped += 1
            }
        }
    }

    state::save_inbox(&*inbox.lock().await)?;
    info!(total, accepted, duplicates, skipped, "ingest finished");
    println!("{total} messages: {accepted} new, {duplicates} duplicate, {skipped} skipped");
    Ok(())
}
