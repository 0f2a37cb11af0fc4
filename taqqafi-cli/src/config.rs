use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use taqqafi_core::CurrencyCode;
use taqqafi_finance::InboxConfig;
use taqqafi_ingest::ParserConfig;

use crate::state::ensure_taqqafi_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub inbox: InboxConfig,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    /// Currency that spend reports are converted into.
    pub primary_currency: CurrencyCode,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            primary_currency: CurrencyCode::Sar,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_taqqafi_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let cfg: Config = toml::from_str("[parser]\ndefault_currency = \"JOD\"\n").unwrap();
        assert_eq!(cfg.parser.default_currency, CurrencyCode::Jod);
        assert!(!cfg.inbox.accept_credits);
        assert_eq!(cfg.report.primary_currency, CurrencyCode::Sar);
    }

    #[test]
    fn test_default_round_trips() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(s.contains("default_currency = \"SAR\""));
        assert!(s.contains("accept_credits = false"));
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.report.primary_currency, CurrencyCode::Sar);
    }
}
