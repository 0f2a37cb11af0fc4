use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use taqqafi_finance::{BudgetBook, Inbox, InboxConfig};

/// `$TAQQAFI_HOME`, or `~/.taqqafi` when unset.
pub fn taqqafi_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("TAQQAFI_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taqqafi"))
}

pub fn ensure_taqqafi_home() -> Result<PathBuf> {
    let dir = taqqafi_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn inbox_path() -> Result<PathBuf> {
    Ok(ensure_taqqafi_home()?.join("inbox.json"))
}

/// Load pending/approved records and the processed ledger. A missing file is an empty inbox.
pub fn load_inbox(config: InboxConfig) -> Result<Inbox> {
    let p = inbox_path()?;
    if !p.exists() {
        return Ok(Inbox::new(config));
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let inbox: Inbox =
        serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    Ok(inbox.with_config(config))
}

pub fn save_inbox(inbox: &Inbox) -> Result<()> {
    let p = inbox_path()?;
    let json = serde_json::to_string_pretty(inbox)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn budgets_path() -> Result<PathBuf> {
    Ok(ensure_taqqafi_home()?.join("budgets.json"))
}

pub fn load_budgets() -> Result<BudgetBook> {
    let p = budgets_path()?;
    if !p.exists() {
        return Ok(BudgetBook::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_budgets(book: &BudgetBook) -> Result<()> {
    let p = budgets_path()?;
    let json = serde_json::to_string_pretty(book)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
